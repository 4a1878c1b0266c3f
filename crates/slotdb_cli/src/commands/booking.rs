//! Book and free command implementations.

use slotdb_core::{ContractorDao, RecordId, RecordStore, Schema};
use std::path::Path;

fn open(path: &Path) -> Result<ContractorDao<RecordStore>, Box<dyn std::error::Error>> {
    Ok(ContractorDao::new(RecordStore::open(path, Schema::contractors())?))
}

/// Runs the book command.
pub fn book(path: &Path, id: u32, owner: u32) -> Result<(), Box<dyn std::error::Error>> {
    let contractor = open(path)?.book(RecordId::new(id), owner)?;
    println!(
        "Booked {} ({}) for customer {:08}",
        contractor.name, contractor.location, owner
    );
    Ok(())
}

/// Runs the free command.
pub fn free(path: &Path, id: u32) -> Result<(), Box<dyn std::error::Error>> {
    let contractor = open(path)?.free(RecordId::new(id))?;
    println!("{} ({}) is available", contractor.name, contractor.location);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn book_then_free_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.db");
        {
            let store = RecordStore::create_new(&path, Schema::contractors()).unwrap();
            store
                .create(&["Moore", "Smallville", "Roofing", "4", "$40.00", ""])
                .unwrap();
        }

        book(&path, 1, 12_345_678).unwrap();
        let dao = open(&path).unwrap();
        assert_eq!(dao.find_by_id(RecordId::FIRST).unwrap().owner, Some(12_345_678));
        drop(dao);

        assert!(book(&path, 1, 11_111_111).is_err());
        free(&path, 1).unwrap();
        assert!(open(&path).unwrap().find_by_id(RecordId::FIRST).unwrap().is_available());
    }
}
