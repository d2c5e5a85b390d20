use std::{error::Error, fmt::Display};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// byte that is not part of the code table
    InvalidSymbol(char),

    /// input length that no valid encoding produces
    InvalidLength(usize),

    InvalidPem(String),

    InvalidDer(String),

    Io(String),
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSymbol(c) => write!(f, "Invalid symbol `{c}` in encoded data"),
            Self::InvalidLength(l) => write!(f, "Invalid encoded data length `{l}`"),
            Self::InvalidPem(s) => write!(f, "Invalid PEM: {s}"),
            Self::InvalidDer(s) => write!(f, "Invalid DER: {s}"),
            Self::Io(s) => write!(f, "{s}"),
        }
    }
}

impl Error for EncodeError {}

impl From<std::io::Error> for EncodeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
