//! Inspect command implementation.

use serde::Serialize;
use slotdb_core::{FileHeader, RecordStore, Schema};
use slotdb_storage::{FileBackend, StorageBackend};
use std::path::Path;

/// Data file inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Data file path.
    pub path: String,
    /// File size in bytes.
    pub file_size: u64,
    /// Magic constant from the header.
    pub magic: u32,
    /// Record length in bytes, flag excluded.
    pub record_length: u32,
    /// Offset of the first slot.
    pub data_offset: u64,
    /// Number of slots, live or tombstoned.
    pub slots: usize,
    /// Number of live records.
    pub live: usize,
    /// Number of tombstoned slots.
    pub tombstoned: usize,
    /// Bytes after the last complete slot.
    pub trailing_bytes: u64,
    /// Field table (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldInfo>>,
}

/// One entry of the header field table.
#[derive(Debug, Serialize)]
pub struct FieldInfo {
    /// Field name.
    pub name: String,
    /// Field width in bytes.
    pub width: u16,
}

/// Runs the inspect command.
pub fn run(path: &Path, show_fields: bool, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No data file found at {:?}", path).into());
    }

    let (header, file_size) = {
        let backend = FileBackend::open(path)?;
        (FileHeader::read(&backend)?, backend.size()?)
    };
    let store = RecordStore::open(path, Schema::contractors())?;
    let stats = store.stats();

    let slot_length = u64::from(header.record_length) + 1;
    let data_bytes = file_size.saturating_sub(header.data_offset);

    let result = InspectResult {
        path: path.display().to_string(),
        file_size,
        magic: header.magic,
        record_length: header.record_length,
        data_offset: header.data_offset,
        slots: stats.slots,
        live: stats.live,
        tombstoned: stats.tombstoned,
        trailing_bytes: data_bytes % slot_length,
        fields: show_fields.then(|| {
            header
                .fields
                .iter()
                .map(|(name, width)| FieldInfo {
                    name: name.clone(),
                    width: *width,
                })
                .collect()
        }),
    };

    // Output
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("slotdb Data File Inspection");
    println!("===========================");
    println!();
    println!("Path: {}", result.path);
    println!("Size: {} bytes", result.file_size);
    println!();
    println!("Header:");
    println!("  Magic:         {}", result.magic);
    println!("  Record length: {} bytes", result.record_length);
    println!("  Data offset:   {}", result.data_offset);
    println!();
    println!("Slots:");
    println!("  Total:      {}", result.slots);
    println!("  Live:       {}", result.live);
    println!("  Tombstoned: {}", result.tombstoned);
    if result.trailing_bytes > 0 {
        println!("  Trailing:   {} bytes (partial slot)", result.trailing_bytes);
    }

    if let Some(fields) = &result.fields {
        println!();
        println!("Fields:");
        for field in fields {
            println!("  {:<16} {:>4} bytes", field.name, field.width);
        }
    }
}
