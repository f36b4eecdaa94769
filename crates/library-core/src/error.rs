//! Error types for library core operations.
//!
//! Every catalog, directory and loan operation surfaces one of these variants
//! rather than a generic fault. The CLI layer maps them to user-facing
//! messages and exit codes.

use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Core error type for library operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Malformed input, or a duplicate key on create
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation references a key that does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation would break a referential invariant
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Borrow requested with no free copies
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Operation is not allowed in the record's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Record file could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LibraryError {
    /// Short machine-readable name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            LibraryError::Validation(_) => "validation",
            LibraryError::NotFound(_) => "not_found",
            LibraryError::Conflict(_) => "conflict",
            LibraryError::Unavailable(_) => "unavailable",
            LibraryError::InvalidState(_) => "invalid_state",
            LibraryError::Storage(_) => "storage",
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::Storage(err.to_string())
    }
}
