//! Error types for the panel.

use sealroll_core::record::UnknownVariant;
use sealroll_core::{CoreError, ValidationError};
use sealroll_store::StoreError;
use thiserror::Error;

/// Errors that can occur during panel operations.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Key loading, signing, or codec error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A create or update request omitted a required field.
    #[error("missing required field `{0}`")]
    MissingInput(&'static str),

    /// A role or status that is not one of the known values.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] UnknownVariant),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// A blocking verification task did not complete.
    #[error("verification task failed: {0}")]
    Task(String),
}

impl PanelError {
    /// Whether the keypair has not been provisioned.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, PanelError::Core(e) if e.is_key_not_found())
    }

    /// Whether the caller sent a bad request (missing or invalid input, or a
    /// duplicate email).
    pub fn is_client_error(&self) -> bool {
        match self {
            PanelError::MissingInput(_) | PanelError::InvalidInput(_) => true,
            PanelError::Store(e) => e.is_duplicate_email(),
            _ => false,
        }
    }
}

impl From<ValidationError> for PanelError {
    fn from(e: ValidationError) -> Self {
        PanelError::Core(CoreError::Validation(e))
    }
}

/// Result type for panel operations.
pub type Result<T> = std::result::Result<T, PanelError>;
