//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Another record already uses this email.
    #[error("email already exists: {0}")]
    DuplicateEmail(String),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// A lock holder panicked.
    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Whether this is a uniqueness violation on the email column.
    pub fn is_duplicate_email(&self) -> bool {
        matches!(self, StoreError::DuplicateEmail(_))
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
