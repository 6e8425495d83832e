//! Error types for Sealroll Core.

use std::path::PathBuf;

use thiserror::Error;

/// Core errors that can occur while hashing, signing, or encoding records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("key not found at {}: {hint}", path.display())]
    KeyNotFound { path: PathBuf, hint: &'static str },

    #[error("invalid key at {}: {reason}", path.display())]
    InvalidKey { path: PathBuf, reason: String },

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("key storage error: {0}")]
    KeyStorage(#[from] std::io::Error),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Validation errors raised before a payload is encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("user {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("export payload is missing the public key")]
    MissingPublicKey,
}

impl CoreError {
    /// Actionable message shown when a key file is absent.
    pub const KEYGEN_HINT: &'static str = "run `sealroll-keygen` first";

    /// Build a `KeyNotFound` for the given path.
    pub fn key_not_found(path: impl Into<PathBuf>) -> Self {
        CoreError::KeyNotFound {
            path: path.into(),
            hint: Self::KEYGEN_HINT,
        }
    }

    /// Whether this error means the keypair has not been provisioned.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, CoreError::KeyNotFound { .. })
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
