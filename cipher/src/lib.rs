mod error;
pub use error::CipherError;

mod rand;
pub use rand::{DefaultRand, Rand};

pub mod rsa;

pub trait Encrypt {
    // does not clear `ciphertext` before writing
    fn encrypt(&self, plaintext: &[u8], ciphertext: &mut Vec<u8>) -> Result<(), CipherError>;
}

pub trait Decrypt {
    // does not clear `plaintext` before writing
    fn decrypt(&self, ciphertext: &[u8], plaintext: &mut Vec<u8>) -> Result<(), CipherError>;
}
