//! Error types for the store.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] tagmap_storage::StorageError),

    /// Envelope codec error.
    #[error("codec error: {0}")]
    Codec(#[from] tagmap_codec::CodecError),

    /// The backing file decoded to something other than a map envelope.
    #[error("invalid store format: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },

    /// The writer task is no longer running.
    #[error("writer task is no longer running")]
    WriterClosed,
}

impl StoreError {
    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}
