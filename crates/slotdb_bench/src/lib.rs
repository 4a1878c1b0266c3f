//! Benchmark utilities.

#![warn(missing_docs)]

use rand::Rng;
use slotdb_core::{RecordId, RecordStore, Schema};

/// Returns a contractor row with a unique key for `i`.
pub fn row(i: usize) -> Vec<String> {
    vec![
        format!("Bench Contractor {i}"),
        format!("City {}", i % 97),
        "Roofing, Painting, Drywall".to_string(),
        (i % 100).to_string(),
        format!("${}.50", 10 + i % 90),
        String::new(),
    ]
}

/// Opens an in-memory contractor store holding `count` records.
pub fn populated_store(count: usize) -> RecordStore {
    let store = RecordStore::open_in_memory(Schema::contractors()).expect("in-memory store");
    for i in 0..count {
        store.create(&row(i)).expect("seed record");
    }
    store
}

/// Picks `count` random ids in `1..=max`.
pub fn random_ids(count: usize, max: u32) -> Vec<RecordId> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| RecordId::new(rng.gen_range(1..=max)))
        .collect()
}
