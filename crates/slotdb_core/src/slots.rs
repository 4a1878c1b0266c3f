//! Slot file: positioned record I/O over a storage backend.
//!
//! The slot file exclusively owns the backend handle. Record `id` lives at
//!
//! ```text
//! data_offset + (id - 1) * (record_length + FLAG_LENGTH)
//! ```

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::record::{Record, RecordFlag};
use crate::schema::Schema;
use crate::types::RecordId;
use parking_lot::Mutex;
use slotdb_storage::{FileBackend, StorageBackend, StorageError};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Positioned access to the record slots of one data file.
pub struct SlotFile {
    schema: Arc<Schema>,
    backend: Mutex<Box<dyn StorageBackend>>,
    data_offset: u64,
    sync_on_write: bool,
    exclusive: bool,
}

impl SlotFile {
    /// Opens an existing data file and validates its header.
    ///
    /// With `create_if_missing`, a missing file is created instead.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file is missing and `create_if_missing` is false
    /// - `MagicMismatch` / `SchemaMismatch` if the header does not match
    /// - `FileLocked` if `require_file_lock` is set and the lock is taken
    pub fn open(path: &Path, schema: Arc<Schema>, config: &Config) -> CoreResult<Self> {
        if !path.exists() {
            if config.create_if_missing {
                return Self::create(path, schema, config);
            }
            return Err(CoreError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let backend = FileBackend::open(path).map_err(|e| match e {
            StorageError::Io(ref io) if io.kind() == io::ErrorKind::NotFound => {
                CoreError::NotFound {
                    path: path.to_path_buf(),
                }
            }
            other => other.into(),
        })?;
        debug!(path = %path.display(), "opening data file");
        Self::from_backend(Box::new(backend), schema, config)
    }

    /// Creates a new data file holding only the header for `schema`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file already exists or cannot be written.
    pub fn create(path: &Path, schema: Arc<Schema>, config: &Config) -> CoreResult<Self> {
        let backend = FileBackend::create(path)?;
        debug!(path = %path.display(), "creating data file");
        Self::format(Box::new(backend), schema, config)
    }

    /// Writes the header for `schema` into an empty backend and opens it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the backend is not empty.
    pub fn format(
        mut backend: Box<dyn StorageBackend>,
        schema: Arc<Schema>,
        config: &Config,
    ) -> CoreResult<Self> {
        if backend.size()? != 0 {
            return Err(CoreError::invalid_argument(
                "cannot write a header into a non-empty file",
            ));
        }
        backend.append(&schema.encode_header())?;
        backend.sync()?;
        Self::from_backend(backend, schema, config)
    }

    /// Opens a backend that already holds a data file.
    ///
    /// The advisory lock is attempted first; without `require_file_lock`
    /// failing to get it only logs a warning.
    ///
    /// # Errors
    ///
    /// Returns header validation errors, or `FileLocked`.
    pub fn from_backend(
        backend: Box<dyn StorageBackend>,
        schema: Arc<Schema>,
        config: &Config,
    ) -> CoreResult<Self> {
        let exclusive = match backend.try_lock_exclusive() {
            Ok(true) => true,
            Ok(false) if config.require_file_lock => return Err(CoreError::FileLocked),
            Ok(false) => {
                warn!("data file is locked by another process; continuing without exclusivity");
                false
            }
            Err(e) if config.require_file_lock => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "could not lock data file; continuing without exclusivity");
                false
            }
        };

        let data_offset = schema.validate_header(backend.as_ref())?;

        Ok(Self {
            schema,
            backend: Mutex::new(backend),
            data_offset,
            sync_on_write: config.sync_on_write,
            exclusive,
        })
    }

    /// Returns the schema this file was validated against.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the offset of the first slot.
    #[must_use]
    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    /// Returns whether this process holds the advisory file lock.
    #[must_use]
    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Returns the byte offset of the slot for `id`.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` for id 0.
    pub fn offset_of(&self, id: RecordId) -> CoreResult<u64> {
        let index = id.slot_index().ok_or(CoreError::RecordNotFound { id })?;
        Ok(self.data_offset + index * self.schema.slot_length())
    }

    /// Returns the number of complete slots in the file.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the size cannot be read.
    pub fn slot_count(&self) -> CoreResult<u64> {
        let size = self.backend.lock().size()?;
        Ok(size.saturating_sub(self.data_offset) / self.schema.slot_length())
    }

    /// Reads and decodes the slot for `id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error (`IoFailure`) on a partial read.
    pub fn read_at(&self, id: RecordId) -> CoreResult<Record> {
        let offset = self.offset_of(id)?;
        let bytes = self
            .backend
            .lock()
            .read_at(offset, self.schema.slot_length() as usize)?;
        self.schema.decode_record(id, &bytes)
    }

    /// Encodes and writes `record` into its slot.
    ///
    /// The slot must already exist or be the one directly after the last
    /// complete slot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a slot past the append position, or a
    /// storage error.
    pub fn write_at(&self, record: &Record) -> CoreResult<()> {
        let offset = self.offset_of(record.id())?;
        let bytes = self.schema.encode_record(record);

        let mut backend = self.backend.lock();
        let slot_length = self.schema.slot_length();
        let append_at =
            self.data_offset + backend.size()?.saturating_sub(self.data_offset) / slot_length * slot_length;
        if offset > append_at {
            return Err(CoreError::invalid_argument(format!(
                "slot for {} is past the end of the file",
                record.id()
            )));
        }

        backend.write_at(offset, &bytes)?;
        self.commit(&mut **backend)?;
        debug!(id = %record.id(), tombstoned = record.is_tombstoned(), "slot written");
        Ok(())
    }

    /// Rewrites only the flag byte of an existing slot.
    ///
    /// Field bytes are left exactly as they are on disk.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if `id` has no complete slot, or a storage
    /// error.
    pub fn write_flag(&self, id: RecordId, flag: RecordFlag) -> CoreResult<()> {
        let offset = self.offset_of(id)?;

        let mut backend = self.backend.lock();
        if offset + self.schema.slot_length() > backend.size()? {
            return Err(CoreError::RecordNotFound { id });
        }

        backend.write_at(offset, &[flag.as_byte()])?;
        self.commit(&mut **backend)?;
        debug!(%id, ?flag, "slot flag written");
        Ok(())
    }

    fn commit(&self, backend: &mut dyn StorageBackend) -> CoreResult<()> {
        if self.sync_on_write {
            backend.sync()?;
        } else {
            backend.flush()?;
        }
        Ok(())
    }

    /// Decodes every slot, valid or tombstoned, from the first slot to EOF.
    ///
    /// A trailing partial slot ends the scan.
    ///
    /// # Errors
    ///
    /// Returns a storage error or `Corrupted` for an unknown flag byte.
    pub fn load_all(&self) -> CoreResult<BTreeMap<RecordId, Record>> {
        let backend = self.backend.lock();
        let size = backend.size()?;
        let slot_length = self.schema.slot_length();

        let mut records = BTreeMap::new();
        let mut id = RecordId::FIRST;
        let mut offset = self.data_offset;
        while offset + slot_length <= size {
            let bytes = match backend.read_at(offset, slot_length as usize) {
                Ok(bytes) => bytes,
                Err(e) if e.is_past_end() => break,
                Err(e) => return Err(e.into()),
            };
            records.insert(id, self.schema.decode_record(id, &bytes)?);
            id = id.next();
            offset += slot_length;
        }

        debug!(slots = records.len(), "loaded data file");
        Ok(records)
    }
}

impl std::fmt::Debug for SlotFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotFile")
            .field("data_offset", &self.data_offset)
            .field("exclusive", &self.exclusive)
            .finish_non_exhaustive()
    }
}
