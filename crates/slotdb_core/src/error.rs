//! Error types for slotdb core.

use crate::types::RecordId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in slotdb core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The data file does not exist.
    #[error("data file not found: {}", path.display())]
    NotFound {
        /// The path that was opened.
        path: PathBuf,
    },

    /// The file does not start with the expected magic constant.
    #[error("not a slotdb data file: magic {actual:#010x}, expected {expected:#010x}")]
    MagicMismatch {
        /// Magic constant of the expected schema.
        expected: u32,
        /// Value found in the file (0 if the file is too short).
        actual: u32,
    },

    /// The header geometry or field table differs from the expected schema.
    #[error("schema mismatch: {message}")]
    SchemaMismatch {
        /// Description of the first difference found.
        message: String,
    },

    /// The record does not exist or is deleted.
    #[error("record not found: {id}")]
    RecordNotFound {
        /// The record that was requested.
        id: RecordId,
    },

    /// Another live record already has the same key.
    #[error("duplicate key {key:?}: already used by record {id}")]
    DuplicateKey {
        /// The live record holding the key.
        id: RecordId,
        /// The trimmed key field values.
        key: Vec<String>,
    },

    /// A search matched no records.
    #[error("no records match the given criteria")]
    NoMatch,

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] slotdb_storage::StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record slot could not be decoded.
    #[error("corrupted record slot: {message}")]
    Corrupted {
        /// Description of the corruption.
        message: String,
    },

    /// Arguments do not fit the schema.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument.
        message: String,
    },

    /// Operation not permitted in the record's current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Why the operation was refused.
        message: String,
    },

    /// Another process holds the advisory file lock.
    #[error("data file locked: another process has exclusive access")]
    FileLocked,

    /// The call boundary in front of the store failed.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Transport-level description of the failure.
        message: String,
    },
}

impl CoreError {
    /// Creates a schema mismatch error.
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }

    /// Creates a corrupted slot error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Returns true for read/write faults (the `IoFailure` kind).
    #[must_use]
    pub fn is_io_failure(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Storage(_))
    }
}
