use crate::CipherError;
use num_bigint::{BigInt, BigUint};
use num_traits::{Euclid, One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use utils::BigUintExt;

#[derive(Clone, Debug, PartialOrd, PartialEq, Ord, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    // n = p * q
    n: BigUint,
    // public exponent, gcd(e, (p-1)(q-1)) = 1
    e: BigUint,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrivateKey {
    pk: PublicKey,
    // d * e = 1 % (p-1)(q-1)
    d: BigUint,
    factor: Option<PrimeFactor>,
}

// n = p * q
#[derive(Clone, Debug, Serialize, Deserialize)]
struct PrimeFactor {
    p: BigInt,
    q: BigInt,
    // speeds up the private key operation
    pre: PrecomputedValues,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PrecomputedValues {
    // $e \cdot d_p \equiv 1 \mod (p-1)$
    // d % (p - 1)
    d_p: BigInt,
    // $e \cdot d_q \equiv 1 \mod (q-1)$
    // d % (q - 1)
    d_q: BigInt,
    // $q \cdot q_{inv} \equiv 1 \mod p$
    q_inv: BigInt,
}

impl PublicKey {
    /// n: RSA modulus
    /// e: public key exponent
    /// note: not to check the `n` and `exp` are right RSA parameters
    pub fn new_uncheck(n: BigUint, exp: BigUint) -> Self {
        Self { e: exp, n }
    }

    /// note: not to check the `n` and `exp` are right RSA parameters
    pub fn from_be_bytes(n: &[u8], exp: &[u8]) -> Self {
        Self {
            e: BigUint::from_bytes_be(exp),
            n: BigUint::from_bytes_be(n),
        }
    }

    /// n
    pub fn modules(&self) -> &BigUint {
        &self.n
    }

    /// e
    pub fn exponent(&self) -> &BigUint {
        &self.e
    }

    /// $m^e \mod n, m \lt n$
    fn rsaep_uncheck(&self, m: &BigUint) -> BigUint {
        m.modpow(&self.e, &self.n)
    }

    /// RSAEP: RSA Encrypt primitive
    pub fn rsaep(&self, m: &BigUint) -> Result<BigUint, CipherError> {
        if m < &self.n {
            Ok(self.rsaep_uncheck(m))
        } else {
            Err(CipherError::Other(format!(
                "rsaep: invalid message that need less than {:#x}",
                self.n
            )))
        }
    }

    pub fn is_valid(&self) -> Result<(), CipherError> {
        if self.e < BigUint::from(2u8) {
            Err(CipherError::InvalidPublicKey(format!(
                "rsa: public exponent {:#x} is too small",
                self.e
            )))
        } else if self.e > BigUint::from(u32::MAX - 1) {
            Err(CipherError::InvalidPublicKey(format!(
                "rsa: public exponent {:#x} is too large",
                self.e
            )))
        } else {
            Ok(())
        }
    }
}

impl PrivateKey {
    pub fn new_uncheck(modulus: BigUint, public_exp: BigUint, private_exp: BigUint) -> Self {
        Self {
            pk: PublicKey::new_uncheck(modulus, public_exp),
            d: private_exp,
            factor: None,
        }
    }

    /// Rebuilds the whole private key from a recovered prime factor pair,
    /// $n = p \cdot q$ and $d = e^{-1} \mod (p-1)(q-1)$.
    ///
    /// An exponent that shares a factor with the totient means the claimed
    /// factorization cannot carry a working key; the arithmetic error is
    /// returned to the caller instead of being swallowed.
    pub fn from_common_factor(
        p: &BigUint,
        q: &BigUint,
        e: &BigUint,
    ) -> Result<Self, CipherError> {
        let n = p * q;
        let t = (p - 1u32) * (q - 1u32);
        let d = BigUintExt(e).modinv(&t)?;
        let pre = PrecomputedValues::new(p, q, &d)?;

        Ok(Self {
            pk: PublicKey::new_uncheck(n, e.clone()),
            d,
            factor: Some(PrimeFactor {
                p: BigInt::from(p.clone()),
                q: BigInt::from(q.clone()),
                pre,
            }),
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.pk
    }

    /// d
    pub fn exponent(&self) -> &BigUint {
        &self.d
    }

    /// RSADP: RSA Decrypt primitive
    pub fn rsadp(&self, c: &BigUint) -> Result<BigUint, CipherError> {
        if c < &self.pk.n {
            Ok(self.rsadp_uncheck(c))
        } else {
            Err(CipherError::Other(format!(
                "rsadp: invalid cipher message {:#x} that need less than {:#x}",
                c, self.pk.n
            )))
        }
    }

    // m1 = c^{dp} % p, m2 = c^{dq} % q
    // h = (m1 - m2) * qinv % p
    // m = m2 + q * h
    fn rsadp_uncheck(&self, c: &BigUint) -> BigUint {
        match self.factor.as_ref() {
            Some(factor) => {
                let c = BigInt::from(c.clone());
                let (mut m1, m2) = (
                    c.modpow(&factor.pre.d_p, &factor.p),
                    c.modpow(&factor.pre.d_q, &factor.q),
                );
                // h * q
                m1 -= &m2;
                m1 *= &factor.pre.q_inv;
                let (mut h, mut m) = (m1.rem_euclid(&factor.p), m2);
                h *= &factor.q;
                m += h;

                m.to_biguint()
                    .expect("this always can be converted to biguint")
            }
            None => c.modpow(&self.d, &self.pk.n),
        }
    }

    pub fn is_valid(&self) -> Result<(), CipherError> {
        let factor = self
            .factor
            .as_ref()
            .ok_or(CipherError::Other("rsa: factor doesn't exist".to_string()))?;

        let mut n = BigInt::one();
        for prime in [&factor.p, &factor.q] {
            if prime.is_zero() || prime.is_one() {
                return Err(CipherError::InvalidPrivateKey(
                    "rsa: invalid prime value".to_string(),
                ));
            }

            n *= prime;
        }

        if n != self.pk.n.clone().into() {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: invalid modulus".to_string(),
            ));
        }

        // d*e
        let de: BigInt = (&self.d * &self.pk.e).into();
        for prime in [&factor.p, &factor.q] {
            let pm1 = prime - 1u8;
            let m = &de % pm1;
            if !m.is_one() {
                return Err(CipherError::InvalidPrivateKey(
                    "rsa: invalid exponent".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl PrecomputedValues {
    fn new(p: &BigUint, q: &BigUint, d: &BigUint) -> Result<Self, CipherError> {
        let one = BigUint::one();
        let (d_p, d_q) = (d % (p - &one), d % (q - &one));
        let q_inv = BigUintExt(q).modinv(p)?;

        Ok(Self {
            d_p: BigInt::from(d_p),
            d_q: BigInt::from(d_q),
            q_inv: BigInt::from(q_inv),
        })
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{n={:#x}, e={:#x}}}", self.n, self.e)
    }
}

impl Display for PrimeFactor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{p:{:#x}, q:{:#x}}}", self.p, self.q)
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.factor.as_ref() {
            Some(factor) => {
                write!(
                    f,
                    "{{pk: {}, d: {:#x}, factor: {}}}",
                    self.pk, self.d, factor
                )
            }
            None => {
                write!(f, "{{pk: {}, d: {:#x}, factor: []}}", self.pk, self.d)
            }
        }
    }
}
