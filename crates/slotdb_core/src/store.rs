//! Record store facade.

use crate::cache::RecordCache;
use crate::config::Config;
use crate::criteria::Filter;
use crate::error::{CoreError, CoreResult};
use crate::lock::LockTable;
use crate::record::Record;
use crate::schema::Schema;
use crate::slots::SlotFile;
use crate::types::RecordId;
use parking_lot::Mutex;
use serde::Serialize;
use slotdb_storage::StorageBackend;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// The main record store handle.
///
/// `RecordStore` owns the data file, the record cache and the lock table,
/// and provides:
/// - Create, read, update and delete by record id
/// - Blocking per-record locks
/// - Criteria search over live records
///
/// # Opening a Store
///
/// ```rust,ignore
/// use slotdb_core::{RecordStore, Schema};
/// use std::path::Path;
///
/// let store = RecordStore::open(Path::new("db-1x1.db"), Schema::contractors())?;
/// let id = store.create(&["Moore", "Smallville", "Roofing", "4", "$40.00", ""])?;
/// let ids = store.find_prefix(&[Some("Moo"), None, None, None, None, None])?;
/// ```
///
/// # Locking
///
/// `update` and `delete` take the record lock themselves. Calling them while
/// the same thread holds that lock through [`RecordStore::lock`] blocks
/// forever; use [`RecordStore::modify`] for a read-modify-write instead.
///
/// Locks are not owned: any caller may `unlock` any record.
pub struct RecordStore {
    schema: Arc<Schema>,
    file: SlotFile,
    cache: RecordCache,
    locks: LockTable,
    /// Serializes id allocation and key checks with their persisting write.
    writer: Mutex<()>,
}

/// A point-in-time summary of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Slots known to the cache, live or tombstoned.
    pub slots: usize,
    /// Live records.
    pub live: usize,
    /// Tombstoned slots available for reuse.
    pub tombstoned: usize,
    /// Records whose lock is currently held.
    pub locked: usize,
}

impl RecordStore {
    /// Opens an existing data file with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `MagicMismatch` or `SchemaMismatch` if the file
    /// is missing or its header does not match `schema`.
    pub fn open(path: &Path, schema: Schema) -> CoreResult<Self> {
        Self::open_with_config(path, schema, Config::default())
    }

    /// Opens a data file with a custom configuration.
    ///
    /// ```rust,ignore
    /// let config = Config::default()
    ///     .create_if_missing(true)
    ///     .sync_on_write(false);
    ///
    /// let store = RecordStore::open_with_config(path, Schema::contractors(), config)?;
    /// ```
    ///
    /// # Errors
    ///
    /// See [`RecordStore::open`]; also `FileLocked` when
    /// `require_file_lock` is set and another process holds the file.
    pub fn open_with_config(path: &Path, schema: Schema, config: Config) -> CoreResult<Self> {
        let schema = Arc::new(schema);
        let file = SlotFile::open(path, Arc::clone(&schema), &config)?;
        Ok(Self::from_file(schema, file))
    }

    /// Creates a new data file holding only the header for `schema`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file already exists.
    pub fn create_new(path: &Path, schema: Schema) -> CoreResult<Self> {
        Self::create_new_with_config(path, schema, Config::default())
    }

    /// Creates a new data file with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file already exists.
    pub fn create_new_with_config(path: &Path, schema: Schema, config: Config) -> CoreResult<Self> {
        let schema = Arc::new(schema);
        let file = SlotFile::create(path, Arc::clone(&schema), &config)?;
        Ok(Self::from_file(schema, file))
    }

    /// Opens a store over an arbitrary backend that already holds a data
    /// file.
    ///
    /// # Errors
    ///
    /// Returns header validation errors.
    pub fn open_with_backend(
        backend: Box<dyn StorageBackend>,
        schema: Schema,
        config: Config,
    ) -> CoreResult<Self> {
        let schema = Arc::new(schema);
        let file = SlotFile::from_backend(backend, Arc::clone(&schema), &config)?;
        Ok(Self::from_file(schema, file))
    }

    /// Opens a fresh in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error only if the header cannot be written.
    pub fn open_in_memory(schema: Schema) -> CoreResult<Self> {
        use slotdb_storage::InMemoryBackend;

        let schema = Arc::new(schema);
        let file = SlotFile::format(
            Box::new(InMemoryBackend::new()),
            Arc::clone(&schema),
            &Config::default().sync_on_write(false),
        )?;
        Ok(Self::from_file(schema, file))
    }

    fn from_file(schema: Arc<Schema>, file: SlotFile) -> Self {
        let cache = RecordCache::load(&file);
        Self {
            schema,
            file,
            cache,
            locks: LockTable::new(),
            writer: Mutex::new(()),
        }
    }

    /// Returns the store's schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Creates a record and returns its id.
    ///
    /// The lowest tombstoned id is reused; otherwise the record is appended.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `values` do not fit the schema
    /// - `DuplicateKey` if a live record has the same key
    pub fn create<S: AsRef<str>>(&self, values: &[S]) -> CoreResult<RecordId> {
        let values = self.schema.normalize(values)?;

        let _writer = self.writer.lock();
        let id = self.cache.next_id();
        let record = Record::new(id, values);
        self.cache.check_unique(&self.schema, &record)?;
        self.file.write_at(&record)?;
        self.cache.put(record);

        debug!(%id, "record created");
        Ok(id)
    }

    /// Reads a live record.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if `id` is absent or tombstoned.
    pub fn read(&self, id: RecordId) -> CoreResult<Record> {
        self.cache.get_live(id)
    }

    /// Returns all live records in id order.
    #[must_use]
    pub fn read_all(&self) -> Vec<Record> {
        self.cache.live_records()
    }

    /// Replaces every field of a live record.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `values` do not fit the schema
    /// - `RecordNotFound` if `id` is absent or tombstoned
    /// - `DuplicateKey` if another live record has the new key
    pub fn update<S: AsRef<str>>(&self, id: RecordId, values: &[S]) -> CoreResult<()> {
        let values = self.schema.normalize(values)?;
        self.cache.get_live(id)?;

        let _guard = self.locks.guard(id);
        self.cache.get_live(id)?;
        self.persist(Record::new(id, values))?;

        debug!(%id, "record updated");
        Ok(())
    }

    /// Marks a live record as deleted.
    ///
    /// The slot keeps its field bytes and becomes available for reuse.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if `id` is absent or already tombstoned.
    pub fn delete(&self, id: RecordId) -> CoreResult<()> {
        self.cache.get_live(id)?;

        let _guard = self.locks.guard(id);
        let record = self.cache.get_live(id)?.into_tombstone();
        {
            let _writer = self.writer.lock();
            self.file.write_flag(id, record.flag())?;
            self.cache.put(record);
        }

        debug!(%id, "record deleted");
        Ok(())
    }

    /// Edits a live record under its lock.
    ///
    /// `edit` receives the current trimmed values and changes them in
    /// place. The new values are validated, checked for key conflicts and
    /// persisted before the lock is released. If `edit` fails nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound`, the error from `edit`, or any error
    /// [`RecordStore::update`] can return.
    pub fn modify<F>(&self, id: RecordId, edit: F) -> CoreResult<Record>
    where
        F: FnOnce(&mut Vec<String>) -> CoreResult<()>,
    {
        self.cache.get_live(id)?;

        let _guard = self.locks.guard(id);
        let mut values = self.cache.get_live(id)?.trimmed_values();
        edit(&mut values)?;
        let record = Record::new(id, self.schema.normalize(&values)?);
        self.persist(record.clone())?;

        debug!(%id, "record modified");
        Ok(record)
    }

    fn persist(&self, record: Record) -> CoreResult<()> {
        let _writer = self.writer.lock();
        self.cache.check_unique(&self.schema, &record)?;
        self.file.write_at(&record)?;
        self.cache.put(record);
        Ok(())
    }

    /// Returns the ids of live records matching `filter`, in id order.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the filter does not fit the schema
    /// - `NoMatch` if no record matches
    pub fn find(&self, filter: &Filter) -> CoreResult<Vec<RecordId>> {
        let ids = filter.select(&self.schema, &self.cache.live_records())?;
        if ids.is_empty() {
            return Err(CoreError::NoMatch);
        }
        Ok(ids)
    }

    /// Like [`RecordStore::find`] but returns the matching records.
    ///
    /// # Errors
    ///
    /// Same as [`RecordStore::find`].
    pub fn find_records(&self, filter: &Filter) -> CoreResult<Vec<Record>> {
        filter.validate(&self.schema)?;
        let records: Vec<Record> = self
            .cache
            .live_records()
            .into_iter()
            .filter(|r| filter.matches(&self.schema, r))
            .collect();
        if records.is_empty() {
            return Err(CoreError::NoMatch);
        }
        Ok(records)
    }

    /// Finds records whose fields start with the given patterns.
    ///
    /// `None` matches any value for that field.
    ///
    /// # Errors
    ///
    /// Same as [`RecordStore::find`].
    pub fn find_prefix<S: AsRef<str>>(&self, patterns: &[Option<S>]) -> CoreResult<Vec<RecordId>> {
        self.find(&Filter::starts_with(patterns))
    }

    /// Blocks until the lock for a live record is free, then takes it.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` before blocking if `id` is not live.
    pub fn lock(&self, id: RecordId) -> CoreResult<()> {
        self.cache.get_live(id)?;
        self.locks.acquire(id);
        debug!(%id, "record locked");
        Ok(())
    }

    /// Releases the lock for `id`, whoever took it.
    ///
    /// Unlocking a record that is not locked does nothing.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if `id` has no slot.
    pub fn unlock(&self, id: RecordId) -> CoreResult<()> {
        self.ensure_slot(id)?;
        if self.locks.release(id) {
            debug!(%id, "record unlocked");
        }
        Ok(())
    }

    /// Returns whether the lock for `id` is held.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if `id` has no slot.
    pub fn is_locked(&self, id: RecordId) -> CoreResult<bool> {
        self.ensure_slot(id)?;
        Ok(self.locks.is_held(id))
    }

    fn ensure_slot(&self, id: RecordId) -> CoreResult<()> {
        if self.cache.contains(id) {
            Ok(())
        } else {
            Err(CoreError::RecordNotFound { id })
        }
    }

    /// Returns slot, record and lock counts.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let (slots, tombstoned) = self.cache.counts();
        StoreStats {
            slots,
            live: slots - tombstoned,
            tombstoned,
            locked: self.locks.held_count(),
        }
    }

    /// Returns whether this process holds the advisory file lock.
    #[must_use]
    pub fn is_exclusive(&self) -> bool {
        self.file.is_exclusive()
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("file", &self.file)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
