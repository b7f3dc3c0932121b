//! # tagmap Store
//!
//! File-backed persistent map store for tagmap.
//!
//! This crate provides:
//! - An insertion-ordered in-memory record with keys of any value kind
//! - Mirroring of the record to a single backing file through the
//!   envelope codec
//! - A single-writer sequencer that queues whole-file overwrites in
//!   issue order and makes every operation drain outstanding writes
//!   before touching the record
//!
//! ## Opening a Store
//!
//! ```rust,no_run
//! use tagmap_store::{MapStore, Value};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), tagmap_store::StoreError> {
//! let mut store = MapStore::open(Path::new("app.db")).await?;
//!
//! store.set(Value::from("greeting"), Value::from("hello")).await?;
//! assert!(store.has(&Value::from("greeting")).await?);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod record;
mod store;

pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use record::Record;
pub use store::MapStore;

// Re-exported so callers can build and inspect stored values without
// depending on the codec crate directly.
pub use tagmap_codec::{TypedArray, Value};
