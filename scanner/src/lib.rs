//! Pairwise common-factor scan over a corpus of RSA public keys.
//!
//! Independently generated moduli that share a prime factor surrender both
//! private keys to a single gcd. The scanner enumerates unordered corpus
//! pairs, rebuilds the private keys from every shared factor it finds, and
//! feeds the paired ciphertexts to a decryption capability.

mod error;
pub use error::ScanError;

mod scan;
pub use scan::{
    CorpusEntry, Decryptor, KeyId, Pkcs1Decryptor, RecoveredPlaintext, ScanObserver, Scanner,
};

mod collate;
pub use collate::collate;
