use std::{error::Error, fmt::Display};
use utils::ArithError;

#[derive(Clone, Debug)]
pub enum CipherError {
    InvalidPublicKey(String),

    InvalidPrivateKey(String),

    /// structure or padding checks failed on decryption
    ValidateFailed(String),

    /// modular arithmetic refused the operands
    Arith(ArithError),

    Other(String),
}

impl Display for CipherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPublicKey(s) => write!(f, "{s}"),
            Self::InvalidPrivateKey(s) => write!(f, "{s}"),
            Self::ValidateFailed(s) => write!(f, "{s}"),
            Self::Arith(e) => write!(f, "{e}"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

impl Error for CipherError {}

impl From<ArithError> for CipherError {
    fn from(e: ArithError) -> Self {
        Self::Arith(e)
    }
}
