use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CrackError {
    #[error("The path {0} is not an existing directory")]
    PathNotExist(String),

    #[error("Invalid key file `{0}`: {1}")]
    InvalidKeyFile(String, String),

    #[error("The file name `{0}` has no numeric stem to order by")]
    InvalidStem(String),

    #[error("Missing or unreadable ciphertext `{0}`: {1}")]
    MissingCiphertext(String, String),

    #[error("{0}: {1}")]
    Io(String, String),
}
