//! RSA
//!
//! - two primes $p \neq q$ give the modulus $n = p \cdot q$;
//! - the public exponent $e$ satisfies $\gcd(e, (p-1)(q-1)) = 1$;
//! - the private exponent $d$ satisfies $d \cdot e \equiv 1 \mod (p-1)(q-1)$;
//!
//! encrypt: $c = m^e \mod n$;
//!
//! decrypt: $m = c^d \mod n$;

mod key;
pub use key::{PrivateKey, PublicKey};

mod pkcs1;
pub use pkcs1::{PKCS1Decrypt, PKCS1Encrypt};
