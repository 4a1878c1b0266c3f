//! # slotdb Testkit
//!
//! Test utilities for slotdb.
//!
//! This crate provides:
//! - Test fixtures and store helpers
//! - Property-based test generators using proptest
//! - Concurrency stress runners
//!
//! ## Usage
//!
//! ```rust,ignore
//! use slotdb_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_store() {
//!     with_temp_store(|store| {
//!         let id = store.create(&contractor_row(0)).unwrap();
//!         // ... test operations
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
