/// Error type definitions
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignerError {
    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, SignerError>;

impl From<serde_json::Error> for SignerError {
    fn from(err: serde_json::Error) -> Self {
        SignerError::Serialization(err.to_string())
    }
}
