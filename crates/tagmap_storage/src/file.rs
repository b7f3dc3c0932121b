//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// The backing file holds the full encoded content of one store; every
/// write replaces it wholesale. Data survives process restarts.
///
/// # Durability
///
/// `write_all` truncates, writes, and flushes through [`File::sync_all`],
/// so a successful write is on disk when it returns.
///
/// # Thread Safety
///
/// An internal lock serializes file access, so the backend can be shared
/// between the store and its writer task.
///
/// # Example
///
/// ```no_run
/// use tagmap_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let backend = FileBackend::new(Path::new("data.db"));
/// backend.ensure_exists().unwrap();
/// backend.write_all("encoded content").unwrap();
/// assert_eq!(backend.read_all().unwrap(), "encoded content");
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    guard: RwLock<()>,
}

impl FileBackend {
    /// Creates a backend for the given path.
    ///
    /// The file itself is not touched until [`StorageBackend::ensure_exists`]
    /// or the first write.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            guard: RwLock::new(()),
        }
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn ensure_exists(&self) -> StorageResult<()> {
        let _guard = self.guard.write();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::unavailable(format!(
                        "cannot create parent of {}: {e}",
                        self.path.display()
                    ))
                })?;
            }
        }

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| {
                StorageError::unavailable(format!("cannot create {}: {e}", self.path.display()))
            })?;

        Ok(())
    }

    fn read_all(&self) -> StorageResult<String> {
        let _guard = self.guard.read();

        let mut file = File::open(&self.path).map_err(|e| {
            StorageError::unavailable(format!("cannot read {}: {e}", self.path.display()))
        })?;

        let mut text = String::new();
        file.read_to_string(&mut text)?;
        Ok(text)
    }

    fn write_all(&self, text: &str) -> StorageResult<()> {
        let _guard = self.guard.write();

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| {
                StorageError::unavailable(format!("cannot write {}: {e}", self.path.display()))
            })?;

        file.write_all(text.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }
}
