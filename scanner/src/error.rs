use crate::KeyId;
use cipher::CipherError;
use std::{error::Error, fmt::Display};

#[derive(Clone, Debug)]
pub enum ScanError {
    /// private key reconstruction failed for `id` after its modulus shared a
    /// factor with `peer`'s; the discovered factorization was unusable
    Reconstruct {
        id: KeyId,
        peer: KeyId,
        source: CipherError,
    },
}

impl Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reconstruct { id, peer, source } => write!(
                f,
                "reconstructing the private key of `{id}` (factor shared with `{peer}`): {source}"
            ),
        }
    }
}

impl Error for ScanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Reconstruct { source, .. } => Some(source),
        }
    }
}
