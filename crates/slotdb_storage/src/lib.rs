//! # slotdb Storage
//!
//! Storage backends for slotdb.
//!
//! Backends are **opaque byte stores**: they read and write bytes at
//! absolute offsets and know nothing about headers, slots or records.
//! The record layout is owned entirely by `slotdb_core`.
//!
//! ## Available Backends
//!
//! - [`FileBackend`] - persistent storage using OS file APIs, with an
//!   advisory whole-file lock
//! - [`InMemoryBackend`] - for tests and ephemeral stores
//!
//! ## Example
//!
//! ```rust
//! use slotdb_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! backend.append(b"hello world").unwrap();
//! backend.write_at(6, b"slots").unwrap();
//! assert_eq!(backend.read_at(0, 11).unwrap(), b"hello slots");
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
