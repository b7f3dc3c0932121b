//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during envelope encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Encode or decode was called with no input and no held default.
    #[error("no input was provided")]
    MissingInput,

    /// The envelope text is not a valid sealed `[tag, payload]` pair.
    #[error("invalid envelope: {message}")]
    InvalidEnvelope {
        /// Description of what made the envelope unreadable.
        message: String,
    },

    /// The payload does not match the shape the tag requires.
    #[error("invalid payload for tag {tag:?}: {message}")]
    InvalidPayload {
        /// The kind tag carried by the envelope.
        tag: String,
        /// Description of the shape mismatch.
        message: String,
    },

    /// The envelope carries a tag the decoder does not recognize.
    ///
    /// Only raised in strict mode; lenient decoding falls back to a
    /// best-effort conversion of the raw payload.
    #[error("unknown envelope tag: {tag:?}")]
    UnknownTag {
        /// The unrecognized tag.
        tag: String,
    },
}

impl CodecError {
    /// Create an invalid envelope error.
    pub fn invalid_envelope(message: impl Into<String>) -> Self {
        Self::InvalidEnvelope {
            message: message.into(),
        }
    }

    /// Create an invalid payload error.
    pub fn invalid_payload(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// Create an unknown tag error.
    pub fn unknown_tag(tag: impl Into<String>) -> Self {
        Self::UnknownTag { tag: tag.into() }
    }
}
