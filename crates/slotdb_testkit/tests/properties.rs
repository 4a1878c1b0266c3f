//! Store-level properties: round trip, uniqueness, id reuse, find, delete.

use proptest::prelude::*;
use slotdb_core::{CoreError, Filter, Operator, RecordId, RecordStore, Schema};
use slotdb_testkit::prelude::*;
use std::collections::BTreeMap;

fn row(values: [&str; 6]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn duplicate_name_and_location_rejected() {
    let store = TestStore::seeded();
    let mut dup = row(SAMPLE_CONTRACTORS[0]);
    dup[2] = "Plumbing".to_string();

    let err = store.create(&dup).unwrap_err();
    match err {
        CoreError::DuplicateKey { id, key } => {
            assert_eq!(id, RecordId::FIRST);
            assert_eq!(key, vec!["Dogs With Tools", "Smallville"]);
        }
        other => panic!("expected DuplicateKey, got {other}"),
    }

    // Name alone is not the key.
    dup[1] = "Whoville".to_string();
    store.create(&dup).unwrap();
}

#[test]
fn deleted_id_is_reused_then_append_resumes() {
    let store = TestStore::seeded();
    let last = RecordId::new(SAMPLE_CONTRACTORS.len() as u32);

    store.delete(RecordId::new(2)).unwrap();
    store.delete(RecordId::new(4)).unwrap();

    assert_eq!(store.create(&contractor_row(100)).unwrap(), RecordId::new(2));
    assert_eq!(store.create(&contractor_row(101)).unwrap(), RecordId::new(4));
    assert_eq!(store.create(&contractor_row(102)).unwrap(), last.next());
}

#[test]
fn find_examples() {
    with_temp_store(|store| {
        let a = store
            .create(&["Smith", "NYC", "", "5", "$10.00", ""])
            .unwrap();
        let b = store
            .create(&["Smithson", "LA", "", "3", "$20.00", ""])
            .unwrap();

        let any = Filter::any(6);
        let prefix = any.clone().with(0, Operator::StartsWith, "Smith");
        assert_eq!(store.find(&prefix).unwrap(), vec![a, b]);

        let equal = any.clone().with(0, Operator::Equal, "Smith");
        assert_eq!(store.find(&equal).unwrap(), vec![a]);

        let big = any.clone().with(3, Operator::GreaterOrEqual, "5");
        assert_eq!(store.find(&big).unwrap(), vec![a]);

        let cheap = any.with(4, Operator::Less, "£15");
        assert_eq!(store.find(&cheap).unwrap(), vec![a]);
    });
}

#[test]
fn default_search_is_prefix_on_every_field() {
    let store = TestStore::seeded();
    let ids = store
        .find_prefix(&[None, Some("smallville"), None, None, None, None])
        .unwrap();
    assert_eq!(ids, vec![RecordId::new(1), RecordId::new(6)]);

    let err = store
        .find_prefix(&[Some("Zed"), None, None, None, None, None])
        .unwrap_err();
    assert!(matches!(err, CoreError::NoMatch));
}

#[test]
fn specialty_contains_search() {
    let store = TestStore::seeded();
    let filter = Filter::any(6).with(2, Operator::Contains, "painting");
    assert_eq!(
        store.find(&filter).unwrap(),
        vec![RecordId::new(2), RecordId::new(3), RecordId::new(6)]
    );

    let filter = Filter::any(6).with(2, Operator::Contains, "PAINTING, drywall");
    assert_eq!(store.find(&filter).unwrap(), vec![RecordId::new(3)]);
}

#[test]
fn tombstoned_record_is_invisible_but_present_in_file() {
    let test_store = TestStore::seeded();
    let id = RecordId::new(3);
    test_store.delete(id).unwrap();

    assert!(matches!(test_store.read(id), Err(CoreError::RecordNotFound { .. })));
    let everyone = test_store.find(&Filter::any(6)).unwrap();
    assert!(!everyone.contains(&id));

    let bytes = read_file_bytes(test_store.path().unwrap());
    let schema = Schema::contractors();
    let slot = schema.header_length() as usize + 2 * schema.slot_length() as usize;
    assert_eq!(bytes[slot], 1);
    let name = String::from_utf8_lossy(&bytes[slot + 1..slot + 33]);
    assert_eq!(name.trim_end(), "Moore Power Tool Ya");

    let reopened = test_store.reopen();
    assert!(matches!(reopened.read(id), Err(CoreError::RecordNotFound { .. })));
    assert_eq!(reopened.stats().tombstoned, 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn create_update_read_round_trip(
        created in contractor_values_strategy(),
        updated in contractor_values_strategy(),
    ) {
        let store = RecordStore::open_in_memory(Schema::contractors()).unwrap();
        let id = store.create(&created).unwrap();
        prop_assert_eq!(store.read(id).unwrap().trimmed_values(), created);

        store.update(id, &updated).unwrap();
        prop_assert_eq!(store.read(id).unwrap().trimmed_values(), updated);
    }

    #[test]
    fn store_matches_model(ops in store_ops_strategy(40)) {
        let store = RecordStore::open_in_memory(Schema::contractors()).unwrap();
        let mut model: BTreeMap<RecordId, Vec<String>> = BTreeMap::new();
        let mut free: Vec<RecordId> = Vec::new();
        let mut next = RecordId::FIRST;

        let key_taken = |model: &BTreeMap<RecordId, Vec<String>>, values: &[String], except: Option<RecordId>| {
            model.iter().any(|(id, v)| Some(*id) != except && v[0] == values[0] && v[1] == values[1])
        };

        for op in ops {
            match op {
                StoreOp::Create(values) => {
                    let result = store.create(&values);
                    if key_taken(&model, &values, None) {
                        let is_duplicate = matches!(result, Err(CoreError::DuplicateKey { .. }));
                        prop_assert!(is_duplicate);
                        continue;
                    }
                    free.sort();
                    let expected = if free.is_empty() {
                        let id = next;
                        next = next.next();
                        id
                    } else {
                        free.remove(0)
                    };
                    prop_assert_eq!(result.unwrap(), expected);
                    model.insert(expected, values);
                }
                StoreOp::Update(i, values) => {
                    let Some(&id) = model.keys().nth(i % model.len().max(1)) else { continue };
                    let result = store.update(id, &values);
                    if key_taken(&model, &values, Some(id)) {
                        let is_duplicate = matches!(result, Err(CoreError::DuplicateKey { .. }));
                        prop_assert!(is_duplicate);
                    } else {
                        prop_assert!(result.is_ok());
                        model.insert(id, values);
                    }
                }
                StoreOp::Delete(i) => {
                    let Some(&id) = model.keys().nth(i % model.len().max(1)) else { continue };
                    store.delete(id).unwrap();
                    model.remove(&id);
                    free.push(id);
                }
            }
        }

        let live: BTreeMap<RecordId, Vec<String>> = store
            .read_all()
            .into_iter()
            .map(|r| (r.id(), r.trimmed_values()))
            .collect();
        prop_assert_eq!(live, model);
    }
}
