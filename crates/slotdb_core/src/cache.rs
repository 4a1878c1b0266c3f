//! In-memory record cache.
//!
//! Every slot of the file, live or tombstoned, has an entry here for the
//! life of the store. Tombstoned ids are tracked separately so that id
//! allocation can reuse them.

use crate::error::{CoreError, CoreResult};
use crate::record::Record;
use crate::schema::Schema;
use crate::slots::SlotFile;
use crate::types::RecordId;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct CacheState {
    records: BTreeMap<RecordId, Record>,
    tombstoned: BTreeSet<RecordId>,
}

/// Id-to-record mapping plus the set of reusable ids.
///
/// Reads hand out clones so callers never alias cache state.
#[derive(Debug, Default)]
pub struct RecordCache {
    state: RwLock<CacheState>,
}

impl RecordCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache from already decoded slots.
    #[must_use]
    pub fn from_records(records: BTreeMap<RecordId, Record>) -> Self {
        let tombstoned = records
            .values()
            .filter(|r| r.is_tombstoned())
            .map(Record::id)
            .collect();
        Self {
            state: RwLock::new(CacheState {
                records,
                tombstoned,
            }),
        }
    }

    /// Populates a cache with every slot of `file`.
    ///
    /// If the scan fails the cache starts empty and the store still opens.
    #[must_use]
    pub fn load(file: &SlotFile) -> Self {
        match file.load_all() {
            Ok(records) => {
                let cache = Self::from_records(records);
                let (slots, tombstoned) = cache.counts();
                debug!(slots, tombstoned, "record cache populated");
                cache
            }
            Err(e) => {
                warn!(error = %e, "initial load failed; starting with an empty record cache");
                Self::new()
            }
        }
    }

    /// Returns the id the next created record gets.
    ///
    /// The smallest tombstoned id wins; otherwise one past the largest id.
    #[must_use]
    pub fn next_id(&self) -> RecordId {
        let state = self.state.read();
        if let Some(&id) = state.tombstoned.first() {
            return id;
        }
        state
            .records
            .last_key_value()
            .map_or(RecordId::FIRST, |(id, _)| id.next())
    }

    /// Fails if a live record other than `candidate` has the same key.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` naming the conflicting record.
    pub fn check_unique(&self, schema: &Schema, candidate: &Record) -> CoreResult<()> {
        if schema.key_fields().is_empty() {
            return Ok(());
        }
        let key = schema.key_of(candidate.values());
        let state = self.state.read();
        let conflict = state.records.values().find(|r| {
            !r.is_tombstoned() && r.id() != candidate.id() && schema.key_of(r.values()) == key
        });
        match conflict {
            Some(existing) => Err(CoreError::DuplicateKey {
                id: existing.id(),
                key,
            }),
            None => Ok(()),
        }
    }

    /// Returns whether `id` has a slot, live or tombstoned.
    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.state.read().records.contains_key(&id)
    }

    /// Returns whether `id` is a live record.
    #[must_use]
    pub fn is_live(&self, id: RecordId) -> bool {
        self.state
            .read()
            .records
            .get(&id)
            .is_some_and(|r| !r.is_tombstoned())
    }

    /// Returns a copy of the slot for `id`, tombstoned or not.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<Record> {
        self.state.read().records.get(&id).cloned()
    }

    /// Returns a copy of the live record `id`.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if `id` is absent or tombstoned.
    pub fn get_live(&self, id: RecordId) -> CoreResult<Record> {
        self.get(id)
            .filter(|r| !r.is_tombstoned())
            .ok_or(CoreError::RecordNotFound { id })
    }

    /// Stores `record` and updates the reusable id set.
    pub fn put(&self, record: Record) {
        let mut state = self.state.write();
        let id = record.id();
        if record.is_tombstoned() {
            state.tombstoned.insert(id);
        } else {
            state.tombstoned.remove(&id);
        }
        state.records.insert(id, record);
    }

    /// Returns copies of all live records in id order.
    #[must_use]
    pub fn live_records(&self) -> Vec<Record> {
        self.state
            .read()
            .records
            .values()
            .filter(|r| !r.is_tombstoned())
            .cloned()
            .collect()
    }

    /// Returns `(slots, tombstoned)`.
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        let state = self.state.read();
        (state.records.len(), state.tombstoned.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(id: u32, name: &str, location: &str) -> Record {
        let values = Schema::contractors()
            .normalize(&[name, location, "Roofing", "", "", ""])
            .unwrap();
        Record::new(RecordId::new(id), values)
    }

    #[test]
    fn empty_cache_starts_at_one() {
        assert_eq!(RecordCache::new().next_id(), RecordId::FIRST);
    }

    #[test]
    fn next_id_prefers_smallest_tombstone() {
        let cache = RecordCache::new();
        for id in 1..=4 {
            cache.put(record(id, &format!("N{id}"), "Here"));
        }
        assert_eq!(cache.next_id(), RecordId::new(5));

        cache.put(record(3, "N3", "Here").into_tombstone());
        cache.put(record(2, "N2", "Here").into_tombstone());
        assert_eq!(cache.next_id(), RecordId::new(2));

        cache.put(record(2, "Reused", "Here"));
        assert_eq!(cache.next_id(), RecordId::new(3));
        assert_eq!(cache.counts(), (4, 1));
    }

    #[test]
    fn from_records_tracks_tombstones() {
        let mut slots = BTreeMap::new();
        slots.insert(RecordId::new(1), record(1, "A", "X"));
        slots.insert(RecordId::new(2), record(2, "B", "X").into_tombstone());
        let cache = RecordCache::from_records(slots);

        assert_eq!(cache.next_id(), RecordId::new(2));
        assert!(cache.contains(RecordId::new(2)));
        assert!(!cache.is_live(RecordId::new(2)));
        assert!(matches!(
            cache.get_live(RecordId::new(2)),
            Err(CoreError::RecordNotFound { .. })
        ));
        assert_eq!(cache.live_records().len(), 1);
    }

    #[test]
    fn duplicate_key_detected() {
        let schema = Schema::contractors();
        let cache = RecordCache::new();
        cache.put(record(1, "Moore", "Smallville"));

        let err = cache
            .check_unique(&schema, &record(2, "Moore", "Smallville"))
            .unwrap_err();
        match err {
            CoreError::DuplicateKey { id, key } => {
                assert_eq!(id, RecordId::new(1));
                assert_eq!(key, vec!["Moore".to_string(), "Smallville".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }

        // Same location, different name.
        cache
            .check_unique(&schema, &record(2, "Moore II", "Smallville"))
            .unwrap();
    }

    #[test]
    fn uniqueness_ignores_self_and_tombstones() {
        let schema = Schema::contractors();
        let cache = RecordCache::new();
        cache.put(record(1, "Moore", "Smallville"));
        cache.check_unique(&schema, &record(1, "Moore", "Smallville")).unwrap();

        cache.put(record(1, "Moore", "Smallville").into_tombstone());
        cache.check_unique(&schema, &record(2, "Moore", "Smallville")).unwrap();
    }

    #[test]
    fn reads_are_copies() {
        let cache = RecordCache::new();
        cache.put(record(1, "A", "X"));
        let copy = cache.get(RecordId::new(1)).unwrap().into_tombstone();
        assert!(copy.is_tombstoned());
        assert!(cache.is_live(RecordId::new(1)));
    }

    proptest! {
        #[test]
        fn next_id_is_min_tombstone_or_max_plus_one(
            flags in prop::collection::vec(any::<bool>(), 0..40)
        ) {
            let cache = RecordCache::new();
            for (i, dead) in flags.iter().enumerate() {
                let r = record(i as u32 + 1, &format!("N{i}"), "X");
                cache.put(if *dead { r.into_tombstone() } else { r });
            }

            let expected = flags
                .iter()
                .position(|dead| *dead)
                .map_or(flags.len() as u32 + 1, |i| i as u32 + 1);
            prop_assert_eq!(cache.next_id(), RecordId::new(expected));
        }
    }
}
