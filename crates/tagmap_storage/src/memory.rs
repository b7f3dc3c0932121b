//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;

/// An in-memory storage backend.
///
/// Holds the backing content in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// Reading before [`StorageBackend::ensure_exists`] or the first write
/// fails, mirroring a missing file.
///
/// # Example
///
/// ```rust
/// use tagmap_storage::{StorageBackend, InMemoryBackend};
///
/// let backend = InMemoryBackend::new();
/// backend.ensure_exists().unwrap();
/// backend.write_all("content").unwrap();
/// assert_eq!(backend.read_all().unwrap(), "content");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    content: RwLock<Option<String>>,
}

impl InMemoryBackend {
    /// Creates a new backend with no backing content.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend with pre-existing content.
    ///
    /// Useful for testing load-from-existing-file scenarios.
    #[must_use]
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: RwLock::new(Some(content.into())),
        }
    }

    /// Returns a copy of the current content, if the location exists.
    ///
    /// Useful for testing and debugging.
    #[must_use]
    pub fn content(&self) -> Option<String> {
        self.content.read().clone()
    }
}

impl StorageBackend for InMemoryBackend {
    fn ensure_exists(&self) -> StorageResult<()> {
        let mut content = self.content.write();
        if content.is_none() {
            *content = Some(String::new());
        }
        Ok(())
    }

    fn read_all(&self) -> StorageResult<String> {
        self.content
            .read()
            .clone()
            .ok_or_else(|| StorageError::unavailable("no backing content"))
    }

    fn write_all(&self, text: &str) -> StorageResult<()> {
        *self.content.write() = Some(text.to_string());
        Ok(())
    }
}
