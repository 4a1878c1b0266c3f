//! Per-record lock table.
//!
//! Locks are advisory and not owned: any thread may release a lock that
//! another thread acquired. There is no timeout; a lock that is never
//! released blocks later acquirers of that id forever.

use crate::types::RecordId;
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;

#[derive(Debug, Default)]
struct LockEntry {
    held: bool,
    waiters: usize,
}

/// Blocking mutual exclusion keyed by record id.
///
/// An entry exists only while its lock is held or awaited.
#[derive(Debug, Default)]
pub struct LockTable {
    entries: Mutex<HashMap<RecordId, LockEntry>>,
    released: Condvar,
}

impl LockTable {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the lock for `id` is free, then takes it.
    pub fn acquire(&self, id: RecordId) {
        let mut entries = self.entries.lock();
        let entry = entries.entry(id).or_default();
        if !entry.held {
            entry.held = true;
            return;
        }

        entry.waiters += 1;
        while entries.get(&id).is_some_and(|e| e.held) {
            self.released.wait(&mut entries);
        }
        let entry = entries.entry(id).or_default();
        entry.waiters = entry.waiters.saturating_sub(1);
        entry.held = true;
    }

    /// Takes the lock for `id` only if it is free.
    #[cfg(test)]
    fn try_acquire(&self, id: RecordId) -> bool {
        let mut entries = self.entries.lock();
        let entry = entries.entry(id).or_default();
        if entry.held {
            false
        } else {
            entry.held = true;
            true
        }
    }

    /// Releases the lock for `id` and wakes its waiters.
    ///
    /// Returns whether the lock was held. Releasing a free lock does nothing.
    pub fn release(&self, id: RecordId) -> bool {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(&id) else {
            return false;
        };
        let was_held = entry.held;
        entry.held = false;
        if entry.waiters == 0 {
            entries.remove(&id);
        } else {
            self.released.notify_all();
        }
        was_held
    }

    /// Returns whether the lock for `id` is currently held.
    #[must_use]
    pub fn is_held(&self, id: RecordId) -> bool {
        self.entries.lock().get(&id).is_some_and(|e| e.held)
    }

    /// Returns the number of held locks.
    #[must_use]
    pub fn held_count(&self) -> usize {
        self.entries.lock().values().filter(|e| e.held).count()
    }

    /// Acquires the lock for `id` and returns a guard that releases it.
    pub fn guard(&self, id: RecordId) -> LockGuard<'_> {
        self.acquire(id);
        LockGuard { table: self, id }
    }
}

/// Releases a record lock when dropped.
#[derive(Debug)]
pub struct LockGuard<'a> {
    table: &'a LockTable,
    id: RecordId,
}

impl LockGuard<'_> {
    /// The locked record.
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.table.release(self.id);
    }
}
