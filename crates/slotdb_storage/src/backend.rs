//! Storage backend trait definition.

use crate::error::StorageResult;

/// A low-level positioned byte store.
///
/// Backends are **opaque**: they provide reads and writes at absolute
/// offsets and leave all layout interpretation to the caller.
///
/// # Invariants
///
/// - `read_at` returns exactly the bytes previously written at that offset
/// - `write_at` never leaves a hole: the offset must be at most `size()`
/// - `append` returns the offset where data was written
/// - Backends must be `Send + Sync` so a store can be shared across threads
pub trait StorageBackend: Send + Sync {
    /// Reads `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::ReadPastEnd`] if the range extends beyond
    /// the current size, or an I/O error.
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>>;

    /// Overwrites bytes starting at `offset`.
    ///
    /// Writing at exactly `size()` (or overlapping the end) grows the storage.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::WritePastEnd`] if `offset > size()`, or an
    /// I/O error.
    fn write_at(&mut self, offset: u64, data: &[u8]) -> StorageResult<()>;

    /// Appends data to the end of the storage.
    ///
    /// Returns the offset where the data was written.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn append(&mut self, data: &[u8]) -> StorageResult<u64>;

    /// Pushes buffered writes to the operating system.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StorageResult<()>;

    /// Returns the current size of the storage in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;

    /// Syncs all data and metadata to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> StorageResult<()>;

    /// Attempts to take an exclusive advisory lock on the whole store without
    /// blocking.
    ///
    /// Returns `Ok(false)` when another holder already has it. Backends with
    /// no cross-process visibility report `Ok(true)`.
    ///
    /// # Errors
    ///
    /// Returns an error only for faults other than contention.
    fn try_lock_exclusive(&self) -> StorageResult<bool> {
        Ok(true)
    }
}
