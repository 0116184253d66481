/// Core error types for Cadence
use thiserror::Error;

/// Result type alias using `CadenceError`
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Core error type for Cadence
#[derive(Error, Debug)]
pub enum CadenceError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// Track payload encoding errors
    #[error("Codec error: {0}")]
    Codec(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CadenceError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a codec error
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for CadenceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
