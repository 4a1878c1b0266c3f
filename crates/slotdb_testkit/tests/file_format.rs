//! On-disk layout and open-time validation.

use slotdb_core::{Config, CoreError, FieldDescriptor, RecordId, RecordStore, Schema};
use slotdb_storage::{FileBackend, StorageBackend};
use slotdb_testkit::prelude::*;
use tempfile::tempdir;

#[test]
fn header_is_big_endian_field_table() {
    let test_store = TestStore::file();
    let bytes = read_file_bytes(test_store.path().unwrap());

    assert_eq!(&bytes[0..4], &513u32.to_be_bytes());
    assert_eq!(&bytes[4..8], &182u32.to_be_bytes());
    assert_eq!(&bytes[8..10], &6u16.to_be_bytes());
    assert_eq!(&bytes[10..12], &4u16.to_be_bytes());
    assert_eq!(&bytes[12..16], b"name");
    assert_eq!(&bytes[16..18], &32u16.to_be_bytes());

    let schema = Schema::contractors();
    assert_eq!(bytes.len() as u64, schema.header_length());
}

#[test]
fn slots_are_flag_plus_space_padded_text() {
    let test_store = TestStore::file();
    let id = test_store
        .create(&["Moore", "Smallville", "Roofing", "4", "$40.00", ""])
        .unwrap();
    assert_eq!(id, RecordId::FIRST);

    let schema = Schema::contractors();
    let bytes = read_file_bytes(test_store.path().unwrap());
    let slot = &bytes[schema.header_length() as usize..];
    assert_eq!(slot.len(), 183);
    assert_eq!(slot[0], 0);
    assert_eq!(&slot[1..6], b"Moore");
    assert!(slot[6..33].iter().all(|&b| b == b' '));
    assert_eq!(&slot[33..43], b"Smallville");
    assert!(!slot[1..].contains(&0u8));
}

#[test]
fn other_field_table_is_schema_mismatch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("other.db");
    let renamed = Schema::new(
        513,
        vec![
            FieldDescriptor::text("company", 32),
            FieldDescriptor::text("location", 64),
            FieldDescriptor::text("specialties", 64),
            FieldDescriptor::integer("size", 6),
            FieldDescriptor::money("rate", 8),
            FieldDescriptor::integer("owner", 8),
        ],
    )
    .unwrap();
    write_data_file(&path, &renamed, &[(false, vec!["A", "B", "", "", "", ""])]);

    let err = RecordStore::open(&path, Schema::contractors()).unwrap_err();
    assert!(matches!(err, CoreError::SchemaMismatch { .. }), "got {err}");
}

#[test]
fn wrong_magic_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("magic.db");
    let other = Schema::new(0x0BAD_F00D, Schema::contractors().fields().to_vec()).unwrap();
    write_data_file(&path, &other, &[]);

    match RecordStore::open(&path, Schema::contractors()).unwrap_err() {
        CoreError::MagicMismatch { expected, actual } => {
            assert_eq!(expected, 513);
            assert_eq!(actual, 0x0BAD_F00D);
        }
        other => panic!("expected MagicMismatch, got {other}"),
    }
}

#[test]
fn missing_file_is_not_found_unless_created() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("missing.db");

    let err = RecordStore::open(&path, Schema::contractors()).unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));

    let store = RecordStore::open_with_config(
        &path,
        Schema::contractors(),
        Config::new().create_if_missing(true),
    )
    .unwrap();
    assert_eq!(store.stats().slots, 0);
}

#[test]
fn delete_only_flips_the_flag_byte() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin1.db");
    let schema = Schema::contractors();
    write_data_file(&path, &schema, &[(false, vec!["Cafe", "Smallville", "", "", "", ""])]);

    let slot_at = schema.header_length();
    {
        // "Caf\xE9": a Latin-1 byte that is not valid UTF-8
        let mut backend = FileBackend::open(&path).unwrap();
        backend.write_at(slot_at + 4, &[0xE9]).unwrap();
        backend.sync().unwrap();
    }
    let before = read_file_bytes(&path);

    let store = RecordStore::open(&path, schema.clone()).unwrap();
    store.delete(RecordId::FIRST).unwrap();
    drop(store);

    let after = read_file_bytes(&path);
    let start = slot_at as usize;
    assert_eq!(before.len(), after.len());
    assert_eq!(before[start], 0);
    assert_eq!(after[start], 1);
    assert_eq!(&after[start + 1..start + 183], &before[start + 1..start + 183]);
    assert_eq!(&after[start + 1..start + 5], b"Caf\xE9");
}

#[test]
fn trailing_partial_slot_is_ignored_then_overwritten() {
    let test_store = TestStore::seeded();
    let path = test_store.path().unwrap().to_path_buf();
    {
        let mut backend = FileBackend::open(&path).unwrap();
        backend.append(&[0u8; 50]).unwrap();
        backend.sync().unwrap();
    }

    let store = test_store.reopen();
    assert_eq!(store.stats().slots, SAMPLE_CONTRACTORS.len());

    let id = store.create(&contractor_row(9)).unwrap();
    assert_eq!(id, RecordId::new(SAMPLE_CONTRACTORS.len() as u32 + 1));
    let schema = Schema::contractors();
    let expected_len = schema.header_length() + 7 * schema.slot_length();
    assert_eq!(read_file_bytes(&path).len() as u64, expected_len);
}

#[test]
fn unreadable_slots_leave_an_empty_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corrupt.db");
    write_data_file(
        &path,
        &Schema::contractors(),
        &[(false, SAMPLE_CONTRACTORS[0].to_vec())],
    );
    {
        let mut backend = FileBackend::open(&path).unwrap();
        backend
            .write_at(Schema::contractors().header_length(), &[7])
            .unwrap();
        backend.sync().unwrap();
    }

    let store = RecordStore::open(&path, Schema::contractors()).unwrap();
    assert_eq!(store.stats().slots, 0);
    assert!(matches!(store.read(RecordId::FIRST), Err(CoreError::RecordNotFound { .. })));
}

#[test]
fn second_handle_opens_without_exclusivity() {
    let test_store = TestStore::seeded();
    assert!(test_store.is_exclusive());

    let path = test_store.path().unwrap();
    let second = RecordStore::open(path, Schema::contractors()).unwrap();
    assert!(!second.is_exclusive());
    assert_eq!(second.stats().live, SAMPLE_CONTRACTORS.len());

    let strict = RecordStore::open_with_config(
        path,
        Schema::contractors(),
        Config::new().require_file_lock(true),
    );
    assert!(matches!(strict, Err(CoreError::FileLocked)));
}
