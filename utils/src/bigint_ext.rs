use crate::ArithError;
use num_bigint::BigInt;
use num_traits::{Euclid, One, Signed, Zero};
use std::borrow::Borrow;
use std::ops::Deref;

pub struct BigIntExt<T: Borrow<BigInt>>(pub T);

impl<T: Borrow<BigInt>> Deref for BigIntExt<T> {
    type Target = BigInt;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl<T: Borrow<BigInt>> BigIntExt<T> {
    /// Euclid remainder chain, $\gcd(0, y) = |y|$.
    pub fn gcd(&self, other: &BigInt) -> BigInt {
        let (mut x, mut y) = (self.deref().clone(), other.clone());
        while !x.is_zero() {
            let r = &y % &x;
            y = std::mem::replace(&mut x, r);
        }

        y.abs()
    }

    /// Extended Euclid. Returns (x, y, g) such that $a \cdot x + b \cdot y = g = \gcd(a, b)$,
    /// with the conventional boundary values (0, 1, b) for a = 0 and (1, 0, a) for b = 0.
    pub fn extended_gcd(&self, other: &BigInt) -> (BigInt, BigInt, BigInt) {
        let (mut a, mut b) = (self.deref().clone(), other.clone());
        if a.is_zero() {
            return (BigInt::zero(), BigInt::one(), b);
        }
        if b.is_zero() {
            return (BigInt::one(), BigInt::zero(), a);
        }

        let (mut px, mut ppx) = (BigInt::zero(), BigInt::one());
        let (mut py, mut ppy) = (BigInt::one(), BigInt::zero());
        while !b.is_zero() {
            let q = &a / &b;
            let r = &a - &q * &b;
            a = std::mem::replace(&mut b, r);
            let x = &ppx - &q * &px;
            ppx = std::mem::replace(&mut px, x);
            let y = &ppy - &q * &py;
            ppy = std::mem::replace(&mut py, y);
        }

        (ppx, ppy, a)
    }

    /// $self \cdot r \equiv 1 \mod n$, r normalized into [0, n).
    /// The operand is reduced into [0, n) before the extended gcd runs, so the
    /// returned gcd is non-negative and the coprimality check is exact.
    pub fn modinv(&self, modulus: &BigInt) -> Result<BigInt, ArithError> {
        if modulus < &BigInt::from(2) {
            return Err(ArithError::InvalidModulus);
        }

        let a = self.rem_euclid(modulus);
        let (x, _, g) = BigIntExt(a).extended_gcd(modulus);
        if !g.is_one() {
            return Err(ArithError::NotInvertible);
        }

        Ok(x.rem_euclid(modulus))
    }
}
