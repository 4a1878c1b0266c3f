//! Init command implementation.

use slotdb_core::{RecordStore, Schema};
use std::path::Path;
use tracing::info;

/// Runs the init command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = RecordStore::create_new(path, Schema::contractors())?;
    info!(path = %path.display(), "created data file");
    println!(
        "Created {} ({} fields, {} bytes per record)",
        path.display(),
        store.schema().field_count(),
        store.schema().record_length()
    );
    Ok(())
}
