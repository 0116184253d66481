/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for cadence_core::CadenceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Database(e) => cadence_core::CadenceError::Database(e.to_string()),
            other => cadence_core::CadenceError::storage(other.to_string()),
        }
    }
}
