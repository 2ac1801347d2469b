//! Storage error types.
//!
//! Used by credential store implementations and converted into
//! [`relay_core::RelayError::Storage`] at the component boundary.

use relay_core::RelayError;
use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    /// A stored row exists but cannot be turned back into a credential.
    #[error("Corrupt record for identity {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

impl From<StorageError> for RelayError {
    fn from(e: StorageError) -> Self {
        RelayError::Storage(e.to_string())
    }
}
