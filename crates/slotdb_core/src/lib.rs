//! # slotdb Core
//!
//! Embedded record store over a single fixed-width data file.
//!
//! This crate provides:
//! - Schema codec for the file header and record slots
//! - Slot file with positioned reads and writes
//! - Record cache with tombstone-aware id reuse
//! - Blocking per-record lock table
//! - Criteria engine with typed comparators
//! - The [`RecordStore`] facade and the [`RecordAccess`] contract
//! - A contractor domain layer on top

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod access;
mod cache;
mod config;
pub mod contractor;
pub mod criteria;
mod error;
mod lock;
mod record;
pub mod schema;
mod slots;
mod store;
mod types;

pub use access::RecordAccess;
pub use cache::RecordCache;
pub use config::Config;
pub use contractor::{Contractor, ContractorDao};
pub use criteria::{Criterion, Filter, Operator};
pub use error::{CoreError, CoreResult};
pub use lock::{LockGuard, LockTable};
pub use record::{Record, RecordFlag};
pub use schema::{FieldDescriptor, FieldType, FileHeader, Money, Schema, Value};
pub use slots::SlotFile;
pub use store::{RecordStore, StoreStats};
pub use types::RecordId;

/// Version of the core crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
