//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores
//! and common test scenarios.

use slotdb_core::{Record, RecordId, RecordStore, Schema};
use slotdb_storage::{FileBackend, StorageBackend};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Contractor rows used to seed test files.
pub const SAMPLE_CONTRACTORS: [[&str; 6]; 6] = [
    ["Dogs With Tools", "Smallville", "Roofing", "7", "$35.00", ""],
    ["Fred & Nobby", "Whoville", "Carpets, Painting", "4", "$80.00", ""],
    ["Moore Power Tool Ya", "Lendmarch", "Painting, Drywall", "6", "$90.00", "12345678"],
    ["Swanders & Flaughn", "Lendmarch", "Heating, Plumbing", "3", "$35.00", ""],
    ["Bitter Homes & Gardens", "Pleasantville", "Glass, Roofing", "9", "$75.00", ""],
    ["Buonarotti & Company", "Smallville", "Air Conditioning, Painting", "10", "$40.00", ""],
];

/// A test store with automatic cleanup.
pub struct TestStore {
    /// The store, shareable across threads.
    pub store: Arc<RecordStore>,
    path: Option<PathBuf>,
    _temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates a new in-memory contractor store.
    pub fn memory() -> Self {
        Self {
            store: Arc::new(
                RecordStore::open_in_memory(Schema::contractors())
                    .expect("Failed to open in-memory store"),
            ),
            path: None,
            _temp_dir: None,
        }
    }

    /// Creates a new, empty contractor data file in a temp directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("contractors.db");
        let store = RecordStore::create_new(&path, Schema::contractors())
            .expect("Failed to create data file");

        Self {
            store: Arc::new(store),
            path: Some(path),
            _temp_dir: Some(temp_dir),
        }
    }

    /// Creates a data file holding [`SAMPLE_CONTRACTORS`].
    pub fn seeded() -> Self {
        let test_store = Self::file();
        for row in SAMPLE_CONTRACTORS {
            test_store.store.create(&row).expect("Failed to seed record");
        }
        test_store
    }

    /// Returns the data file path if file-based, None if in-memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Closes the store and opens the same file again.
    ///
    /// Other clones of [`TestStore::store`] keep the old handle alive.
    pub fn reopen(self) -> Self {
        let Self {
            store,
            path,
            _temp_dir,
        } = self;
        drop(store);

        let path = path.expect("Only file-based stores can be reopened");
        let store = RecordStore::open(&path, Schema::contractors()).expect("Failed to reopen");
        Self {
            store: Arc::new(store),
            path: Some(path),
            _temp_dir,
        }
    }
}

impl std::ops::Deref for TestStore {
    type Target = RecordStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Runs a test with a temporary in-memory store.
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&RecordStore) -> R,
{
    let test_store = TestStore::memory();
    f(&test_store.store)
}

/// Runs a test with a temporary file-based store.
pub fn with_file_store<F, R>(f: F) -> R
where
    F: FnOnce(&RecordStore, &Path) -> R,
{
    let test_store = TestStore::file();
    let path = test_store.path().expect("File store should have a path");
    f(&test_store.store, path)
}

/// Returns a contractor row whose key is unique for each `i`.
pub fn contractor_row(i: usize) -> Vec<String> {
    vec![
        format!("Contractor {i}"),
        format!("Town {}", i % 17),
        "Roofing, Painting".to_string(),
        (i % 50).to_string(),
        format!("${}.00", 20 + i % 80),
        String::new(),
    ]
}

/// Writes a data file directly, bypassing the store.
///
/// Each slot is `(tombstoned, values)`; values are fitted to the schema.
/// Useful for files the store itself would refuse to produce.
pub fn write_data_file(path: &Path, schema: &Schema, slots: &[(bool, Vec<&str>)]) {
    let mut backend = FileBackend::create(path).expect("Failed to create data file");
    backend
        .append(&schema.encode_header())
        .expect("Failed to write header");

    for (i, (tombstoned, values)) in slots.iter().enumerate() {
        let values = schema.normalize(values).expect("Values do not fit schema");
        let mut record = Record::new(RecordId::new(i as u32 + 1), values);
        if *tombstoned {
            record = record.into_tombstone();
        }
        backend
            .append(&schema.encode_record(&record))
            .expect("Failed to write slot");
    }
    backend.sync().expect("Failed to sync data file");
}

/// Reads the raw bytes of a data file.
pub fn read_file_bytes(path: &Path) -> Vec<u8> {
    std::fs::read(path).expect("Failed to read data file")
}
