//! Dump command implementation.

use serde::Serialize;
use slotdb_core::{Config, Record, Schema, SlotFile};
use std::path::Path;
use std::sync::Arc;

/// Slot representation for output.
#[derive(Debug, Serialize)]
pub struct SlotInfo {
    /// Record id.
    pub id: u32,
    /// Whether the slot is tombstoned.
    pub tombstoned: bool,
    /// Trimmed field values.
    pub values: Vec<String>,
}

impl From<&Record> for SlotInfo {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id().as_u32(),
            tombstoned: record.is_tombstoned(),
            values: record.trimmed_values(),
        }
    }
}

/// Runs the dump command.
pub fn run(
    path: &Path,
    include_tombstoned: bool,
    limit: Option<usize>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = SlotFile::open(path, Arc::new(Schema::contractors()), &Config::default())?;
    let slots: Vec<SlotInfo> = file
        .load_all()?
        .values()
        .filter(|r| include_tombstoned || !r.is_tombstoned())
        .take(limit.unwrap_or(usize::MAX))
        .map(SlotInfo::from)
        .collect();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&slots)?);
        }
        _ => {
            print_text_output(&slots);
        }
    }

    Ok(())
}

/// Prints slots one per line, fields separated by `|`.
pub fn print_text_output(slots: &[SlotInfo]) {
    println!("Slots ({} listed)", slots.len());
    println!("================");
    println!();

    for slot in slots {
        let marker = if slot.tombstoned { "deleted" } else { "" };
        println!("[{:>6}] {:7} {}", slot.id, marker, slot.values.join(" | "));
    }
}
