use std::{error::Error, fmt::Display};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithError {
    /// the modulus of a modular inverse must be greater than 1
    InvalidModulus,

    /// gcd(a, n) != 1, no inverse of a exists modulo n
    NotInvertible,
}

impl Display for ArithError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidModulus => f.write_str("modulus must be greater than 1"),
            Self::NotInvertible => f.write_str("no modular inverse for the given operands"),
        }
    }
}

impl Error for ArithError {}
