//! = RFC 8017
//!
//! == PKCS #1: RSA Cryptography Specification Version 2.2
//!
//! === PKCS1(Public Key Cryptography Standards v1.5) encryption padding
//!

use crate::rsa::{PrivateKey, PublicKey};
use crate::{CipherError, Decrypt, Encrypt, Rand};
use num_bigint::BigUint;
use std::cell::RefCell;

pub struct PKCS1Encrypt<R: Rand> {
    key: PublicKey,
    rng: RefCell<R>,
}

pub struct PKCS1Decrypt {
    key: PrivateKey,
}

fn byte_len(n: &BigUint) -> usize {
    (n.bits() as usize + 7) >> 3
}

impl<R: Rand> PKCS1Encrypt<R> {
    pub fn new(key: PublicKey, rng: R) -> Result<Self, CipherError> {
        if byte_len(key.modules()) <= 11 {
            return Err(CipherError::InvalidPublicKey(
                "rsa: the public key is too short".to_string(),
            ));
        }

        key.is_valid()?;

        Ok(Self {
            key,
            rng: RefCell::new(rng),
        })
    }

    pub fn key_len(&self) -> usize {
        byte_len(self.key.modules())
    }

    pub fn max_msg_len(&self) -> usize {
        self.key_len() - 11
    }

    fn encrypt_inner(&self, msg: &[u8], cipher: &mut Vec<u8>) -> Result<(), CipherError> {
        if msg.len() > self.max_msg_len() {
            return Err(CipherError::Other(
                "rsa: the message length is too big".to_string(),
            ));
        }

        let klen = self.key_len();
        // em = 0x00 || 0x02 || ps || 0x00 || msg
        let (mut em, mut idx, ps_len) = (vec![0u8; klen], 1, klen - msg.len() - 3);
        em[idx] = 0x02;
        idx += 1;
        let ps = &mut em[idx..(idx + ps_len)];
        let mut rng = self.rng.borrow_mut();
        loop {
            rng.rand(ps);
            if !ps.iter().any(|&x| x == 0) {
                break;
            }
        }
        idx += ps_len + 1;
        em[idx..].copy_from_slice(msg);

        let m = BigUint::from_bytes_be(em.as_slice());
        let c = self.key.rsaep(&m)?.to_bytes_be();
        // fixed width output
        cipher.resize(cipher.len() + klen - c.len(), 0);
        cipher.extend_from_slice(&c);

        Ok(())
    }
}

impl PKCS1Decrypt {
    pub fn new(key: PrivateKey) -> Result<Self, CipherError> {
        if byte_len(key.public_key().modules()) <= 11 {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: the private key is too short".to_string(),
            ));
        }

        key.is_valid()?;
        Ok(Self { key })
    }

    pub fn key_len(&self) -> usize {
        byte_len(self.key.public_key().modules())
    }

    fn decrypt_inner(&self, cipher: &[u8], msg: &mut Vec<u8>) -> Result<(), CipherError> {
        let klen = self.key_len();
        if cipher.len() > klen {
            return Err(CipherError::ValidateFailed(
                "rsa: invalid cipher length".to_string(),
            ));
        }

        let c = BigUint::from_bytes_be(cipher);
        // em = 0x00 || 0x02 || ps || 0x00 || msg
        let mut em = self.key.rsadp(&c)?.to_bytes_be();
        let len = em.len();
        em.resize(klen, 0);
        em.rotate_right(klen - len);

        if em[0] != 0x00 || em[1] != 0x02 {
            return Err(CipherError::ValidateFailed(
                "rsa: invalid message encoding format".to_string(),
            ));
        }

        // ps is at least 8 bytes of nonzero filler
        let idx = em
            .iter()
            .enumerate()
            .skip(2)
            .find(|x| *x.1 == 0)
            .map(|x| x.0)
            .unwrap_or_default();
        if idx < 10 {
            return Err(CipherError::ValidateFailed(
                "rsa: invalid message encoding format".to_string(),
            ));
        }

        msg.extend_from_slice(&em[(idx + 1)..]);
        Ok(())
    }
}

impl<R: Rand> Encrypt for PKCS1Encrypt<R> {
    fn encrypt(&self, plaintext: &[u8], ciphertext: &mut Vec<u8>) -> Result<(), CipherError> {
        self.encrypt_inner(plaintext, ciphertext)
    }
}

impl Decrypt for PKCS1Decrypt {
    fn decrypt(&self, ciphertext: &[u8], plaintext: &mut Vec<u8>) -> Result<(), CipherError> {
        self.decrypt_inner(ciphertext, plaintext)
    }
}

#[cfg(test)]
mod tests {
    use crate::rsa::{PKCS1Decrypt, PKCS1Encrypt, PrivateKey};
    use crate::{CipherError, Decrypt, DefaultRand, Encrypt};
    use encode::base::Base64;
    use encode::Decode;
    use num_bigint::BigUint;
    use num_traits::Num;

    fn key() -> PrivateKey {
        let (p, q) = (
            BigUint::from_str_radix("98920366548084643601728869055592650835572950932266967461790948584315647051443", 10).unwrap(),
            BigUint::from_str_radix("94560208308847015747498523884063394671606671904944666360068158221458669711639", 10).unwrap(),
        );

        PrivateKey::from_common_factor(&p, &q, &BigUint::from(65537u32)).unwrap()
    }

    #[test]
    fn pkcs1_decrypt_known_vectors() {
        // (ciphertext, decrypt_msg)
        let cases = [
            ("gIcUIoVkD6ATMBk/u/nlCZCCWRKdkfjCgFdo35VpRXLduiKXhNz1XupLLzTXAybEq15juc+EgY5o0DHv/nt3yg==", "x"),
            ("Y7TOCSqofGhkRb+jaVRLzK8xw2cSo1IVES19utzv6hwvx+M8kFsoWQm5DzBeJCZTCVDPkTpavUuEbgp8hnUGDw==", "testing."),
            ("arReP9DJtEVyV2Dg3dDp4c/PSk1O6lxkoJ8HcFupoRorBZG+7+1fDAwT1olNddFnQMjmkb8vxwmNMoTAT/BFjQ==", "testing.\n"),
            ("WtaBXIoGC54+vH0NH0CHHE+dRDOsMc/6BrfFu2lEqcKL9+uDuWaf+Xj9mrbQCjjZcpQuX733zyok/jsnqe/Ftw==", "01234567890123456789012345678901234567890123456789012"),
        ];

        let pkcsd = PKCS1Decrypt::new(key()).unwrap();
        for (i, (cipher, msg)) in cases.into_iter().enumerate() {
            let (mut cipher, mut ct) = (cipher.as_bytes(), Vec::new());
            Base64::new(true).decode(&mut cipher, &mut ct).unwrap();

            let mut pt = Vec::new();
            pkcsd.decrypt(ct.as_slice(), &mut pt).unwrap();
            assert_eq!(pt, msg.as_bytes(), "case {i} failed");
        }
    }

    #[test]
    fn pkcs1_encrypt_decrypt() {
        let key = key();
        let pkcse = PKCS1Encrypt::new(key.public_key().clone(), DefaultRand::default()).unwrap();
        let pkcsd = PKCS1Decrypt::new(key).unwrap();

        for msg in ["x", "testing.", "a bit longer message under the 53 byte limit"] {
            let (mut ct, mut pt) = (Vec::new(), Vec::new());
            pkcse.encrypt(msg.as_bytes(), &mut ct).unwrap();
            assert_eq!(ct.len(), pkcse.key_len());

            pkcsd.decrypt(ct.as_slice(), &mut pt).unwrap();
            assert_eq!(pt, msg.as_bytes(), "round trip for `{msg}`");
        }
    }

    #[test]
    fn pkcs1_rejects_bad_padding() {
        let key = key();
        let pkcsd = PKCS1Decrypt::new(key.clone()).unwrap();
        let klen = pkcsd.key_len();

        // block type 0x01 instead of 0x02
        let mut em = vec![0xffu8; klen];
        (em[0], em[1], em[klen - 6]) = (0x00, 0x01, 0x00);
        let c = key
            .public_key()
            .rsaep(&BigUint::from_bytes_be(&em))
            .unwrap()
            .to_bytes_be();
        let mut pt = Vec::new();
        assert!(matches!(
            pkcsd.decrypt(c.as_slice(), &mut pt),
            Err(CipherError::ValidateFailed(_))
        ));

        // filler shorter than 8 bytes
        let mut em = vec![0xffu8; klen];
        (em[0], em[1], em[5]) = (0x00, 0x02, 0x00);
        let c = key
            .public_key()
            .rsaep(&BigUint::from_bytes_be(&em))
            .unwrap()
            .to_bytes_be();
        pt.clear();
        assert!(matches!(
            pkcsd.decrypt(c.as_slice(), &mut pt),
            Err(CipherError::ValidateFailed(_))
        ));

        // no zero separator at all
        let mut em = vec![0xffu8; klen];
        (em[0], em[1]) = (0x00, 0x02);
        let c = key
            .public_key()
            .rsaep(&BigUint::from_bytes_be(&em))
            .unwrap()
            .to_bytes_be();
        pt.clear();
        assert!(matches!(
            pkcsd.decrypt(c.as_slice(), &mut pt),
            Err(CipherError::ValidateFailed(_))
        ));
    }

    #[test]
    fn pkcs1_rejects_oversized_input() {
        let key = key();
        let pkcse = PKCS1Encrypt::new(key.public_key().clone(), DefaultRand::default()).unwrap();
        let pkcsd = PKCS1Decrypt::new(key).unwrap();

        let mut out = Vec::new();
        assert!(pkcse.encrypt(&[0u8; 54], &mut out).is_err());
        assert!(pkcsd.decrypt(&[0u8; 65], &mut out).is_err());
    }
}
