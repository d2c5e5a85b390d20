use crate::{ArithError, BigIntExt};
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use std::borrow::Borrow;
use std::ops::Deref;

pub struct BigUintExt<T: Borrow<BigUint>>(pub T);

impl<T: Borrow<BigUint>> Deref for BigUintExt<T> {
    type Target = BigUint;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl<T: Borrow<BigUint>> BigUintExt<T> {
    /// $\gcd(self, other)$, $\gcd(0, y) = y$.
    pub fn gcd(&self, other: &BigUint) -> BigUint {
        let (mut x, mut y) = (self.deref().clone(), other.clone());
        while !x.is_zero() {
            let r = &y % &x;
            y = std::mem::replace(&mut x, r);
        }

        y
    }

    /// $self \cdot r \equiv 1 \mod modulus$, routed through the signed kernel.
    pub fn modinv(&self, modulus: &BigUint) -> Result<BigUint, ArithError> {
        let n = BigInt::from(modulus.clone());
        let a = BigInt::from(self.deref().clone());
        let r = BigIntExt(a).modinv(&n)?;

        Ok(r.to_biguint()
            .expect("a residue in [0, n) is never negative"))
    }
}
