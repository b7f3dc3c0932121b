//! # tagmap Storage
//!
//! Backing-file adapter trait and implementations for tagmap.
//!
//! This crate provides the lowest-level storage abstraction for the
//! store. Backends are **opaque text stores** over a single backing
//! location - they do not interpret the envelope text they hold.
//!
//! ## Design Principles
//!
//! - Backends expose exactly the bootstrap/IO surface the store needs
//!   (ensure the location exists, read all text, overwrite all text)
//! - No knowledge of the envelope format
//! - A failed write surfaces an error; it is never swallowed
//! - Must be `Send + Sync` so the store's writer task can share them
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral stores
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use tagmap_storage::{StorageBackend, InMemoryBackend};
//!
//! let backend = InMemoryBackend::new();
//! backend.ensure_exists().unwrap();
//! backend.write_all("encoded map").unwrap();
//! assert_eq!(backend.read_all().unwrap(), "encoded map");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
