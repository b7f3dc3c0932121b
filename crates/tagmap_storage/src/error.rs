//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur when the backing location is created, read, or
/// written.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backing location is unavailable.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Description of why the location cannot be used.
        message: String,
    },
}

impl StorageError {
    /// Creates a storage unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
