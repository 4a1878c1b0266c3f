//! Data-access contract.
//!
//! [`RecordAccess`] is the surface that collaborators outside the core
//! program against. [`RecordStore`] implements it directly; an
//! implementation in front of a remote store reports transport failures as
//! [`CoreError::Unavailable`](crate::CoreError::Unavailable).

use crate::criteria::Filter;
use crate::error::CoreResult;
use crate::record::Record;
use crate::schema::Schema;
use crate::store::RecordStore;
use crate::types::RecordId;
use std::sync::Arc;

/// CRUD, lock and search operations keyed by record id.
pub trait RecordAccess: Send + Sync {
    /// Returns the schema records are shaped by.
    fn schema(&self) -> &Schema;

    /// Creates a record and returns its id.
    fn create(&self, values: &[String]) -> CoreResult<RecordId>;

    /// Reads a live record.
    fn read(&self, id: RecordId) -> CoreResult<Record>;

    /// Returns all live records in id order.
    fn read_all(&self) -> CoreResult<Vec<Record>>;

    /// Replaces every field of a live record.
    fn update(&self, id: RecordId, values: &[String]) -> CoreResult<()>;

    /// Marks a live record as deleted.
    fn delete(&self, id: RecordId) -> CoreResult<()>;

    /// Returns the ids of live records matching `filter`.
    fn find(&self, filter: &Filter) -> CoreResult<Vec<RecordId>>;

    /// Returns the live records matching `filter`.
    fn find_records(&self, filter: &Filter) -> CoreResult<Vec<Record>>;

    /// Blocks until the record lock is free, then takes it.
    fn lock(&self, id: RecordId) -> CoreResult<()>;

    /// Releases the record lock.
    fn unlock(&self, id: RecordId) -> CoreResult<()>;

    /// Returns whether the record lock is held.
    fn is_locked(&self, id: RecordId) -> CoreResult<bool>;

    /// Edits a live record's trimmed values under its lock.
    fn modify(
        &self,
        id: RecordId,
        edit: &mut dyn FnMut(&mut Vec<String>) -> CoreResult<()>,
    ) -> CoreResult<Record>;
}

impl RecordAccess for RecordStore {
    fn schema(&self) -> &Schema {
        RecordStore::schema(self)
    }

    fn create(&self, values: &[String]) -> CoreResult<RecordId> {
        RecordStore::create(self, values)
    }

    fn read(&self, id: RecordId) -> CoreResult<Record> {
        RecordStore::read(self, id)
    }

    fn read_all(&self) -> CoreResult<Vec<Record>> {
        Ok(RecordStore::read_all(self))
    }

    fn update(&self, id: RecordId, values: &[String]) -> CoreResult<()> {
        RecordStore::update(self, id, values)
    }

    fn delete(&self, id: RecordId) -> CoreResult<()> {
        RecordStore::delete(self, id)
    }

    fn find(&self, filter: &Filter) -> CoreResult<Vec<RecordId>> {
        RecordStore::find(self, filter)
    }

    fn find_records(&self, filter: &Filter) -> CoreResult<Vec<Record>> {
        RecordStore::find_records(self, filter)
    }

    fn lock(&self, id: RecordId) -> CoreResult<()> {
        RecordStore::lock(self, id)
    }

    fn unlock(&self, id: RecordId) -> CoreResult<()> {
        RecordStore::unlock(self, id)
    }

    fn is_locked(&self, id: RecordId) -> CoreResult<bool> {
        RecordStore::is_locked(self, id)
    }

    fn modify(
        &self,
        id: RecordId,
        edit: &mut dyn FnMut(&mut Vec<String>) -> CoreResult<()>,
    ) -> CoreResult<Record> {
        RecordStore::modify(self, id, |values| edit(values))
    }
}

impl<T: RecordAccess + ?Sized> RecordAccess for Arc<T> {
    fn schema(&self) -> &Schema {
        (**self).schema()
    }

    fn create(&self, values: &[String]) -> CoreResult<RecordId> {
        (**self).create(values)
    }

    fn read(&self, id: RecordId) -> CoreResult<Record> {
        (**self).read(id)
    }

    fn read_all(&self) -> CoreResult<Vec<Record>> {
        (**self).read_all()
    }

    fn update(&self, id: RecordId, values: &[String]) -> CoreResult<()> {
        (**self).update(id, values)
    }

    fn delete(&self, id: RecordId) -> CoreResult<()> {
        (**self).delete(id)
    }

    fn find(&self, filter: &Filter) -> CoreResult<Vec<RecordId>> {
        (**self).find(filter)
    }

    fn find_records(&self, filter: &Filter) -> CoreResult<Vec<Record>> {
        (**self).find_records(filter)
    }

    fn lock(&self, id: RecordId) -> CoreResult<()> {
        (**self).lock(id)
    }

    fn unlock(&self, id: RecordId) -> CoreResult<()> {
        (**self).unlock(id)
    }

    fn is_locked(&self, id: RecordId) -> CoreResult<bool> {
        (**self).is_locked(id)
    }

    fn modify(
        &self,
        id: RecordId,
        edit: &mut dyn FnMut(&mut Vec<String>) -> CoreResult<()>,
    ) -> CoreResult<Record> {
        (**self).modify(id, edit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(name: &str) -> Vec<String> {
        [name, "Here", "", "", "", ""].map(String::from).to_vec()
    }

    #[test]
    fn trait_object_over_shared_store() {
        let store = Arc::new(RecordStore::open_in_memory(Schema::contractors()).unwrap());
        let access: Box<dyn RecordAccess> = Box::new(Arc::clone(&store));

        let id = access.create(&values("Moore")).unwrap();
        assert_eq!(access.read(id).unwrap().value(0), Some("Moore"));
        assert_eq!(access.read_all().unwrap().len(), 1);

        let record = access
            .modify(id, &mut |v: &mut Vec<String>| {
                v[0] = "Moore & Sons".to_string();
                Ok(())
            })
            .unwrap();
        assert_eq!(record.value(0), Some("Moore & Sons"));
        assert_eq!(store.read(id).unwrap().value(0), Some("Moore & Sons"));

        access.lock(id).unwrap();
        assert!(store.is_locked(id).unwrap());
        access.unlock(id).unwrap();
        assert_eq!(access.schema().field_count(), 6);
    }
}
