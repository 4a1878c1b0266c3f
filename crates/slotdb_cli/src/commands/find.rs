//! Find command implementation.

use super::dump::{print_text_output, SlotInfo};
use super::parse_filter;
use slotdb_core::{CoreError, RecordStore, Schema};
use std::path::Path;

/// Runs the find command.
pub fn run(path: &Path, criteria: &[String], format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = RecordStore::open(path, Schema::contractors())?;
    let filter = parse_filter(store.schema(), criteria)?;

    let found: Vec<SlotInfo> = match store.find_records(&filter) {
        Ok(records) => records.iter().map(SlotInfo::from).collect(),
        Err(CoreError::NoMatch) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
        _ if found.is_empty() => {
            println!("No records match.");
        }
        _ => {
            print_text_output(&found);
        }
    }

    Ok(())
}
