//! Storage backend trait definition.

use crate::error::StorageResult;

/// A whole-file text store backing one persistent map.
///
/// Backends are **opaque text stores**. They hold the full encoded
/// content of one backing location and do not interpret it; the store
/// owns all envelope-format interpretation.
///
/// # Invariants
///
/// - `ensure_exists` is idempotent and creates an empty location if absent
/// - `read_all` returns exactly the text of the last successful
///   `write_all`, or empty text for an empty location
/// - `write_all` replaces the full content or fails; a failed write is an
///   error, never a silent success
/// - Backends must be `Send + Sync` so the writer task can share them
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing and ephemeral stores
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Ensures the backing location exists, creating it empty if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be created.
    fn ensure_exists(&self) -> StorageResult<()>;

    /// Reads the full text content of the backing location.
    ///
    /// Returns empty text if the location is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the location is unreachable or its content is
    /// not valid UTF-8 text.
    fn read_all(&self) -> StorageResult<String>;

    /// Overwrites the full content of the backing location.
    ///
    /// After this returns successfully, `read_all` observes exactly
    /// `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn write_all(&self, text: &str) -> StorageResult<()>;
}
