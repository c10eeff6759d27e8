//! Dataset store integration harness.
//!
//! # What this covers
//!
//! - **Seed**: a store with no file serves the six-country seed dataset.
//! - **Replace semantics**: every save replaces the whole dataset; no schema
//!   is imposed on elements.
//! - **Durability**: what was saved is what a new store on the same path
//!   loads; the file is pretty-printed JSON.
//! - **Corruption**: non-array and malformed files are reported, not
//!   replaced by the seed.
//! - **Concurrent writers**: saves from many threads never leave a partial
//!   file behind.
//!
//! # Running
//!
//! ```sh
//! cargo test --test store_harness
//! ```

use chartboard_core::{
    sample,
    store::{DatasetStore, StoreError},
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn temp_store() -> (tempfile::TempDir, DatasetStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = DatasetStore::new(dir.path().join("chart-data.json"));
    (dir, store)
}

#[test]
fn empty_store_serves_seed() {
    let (_dir, store) = temp_store();
    let items = store.load().unwrap();
    assert_eq!(items.len(), 6);
    assert_eq!(items[0], json!({"country": "USA", "value": 2025}));
    assert_eq!(items, sample::server_seed());
}

#[test]
fn any_array_is_stored_verbatim() {
    let (_dir, store) = temp_store();
    let items = vec![json!({"a": [1, 2]}), json!("loose string"), json!(null)];
    store.save(&items).unwrap();
    assert_eq!(store.load().unwrap(), items);
}

#[test]
fn a_second_store_sees_saved_data() {
    let (dir, store) = temp_store();
    store.save(&[json!({"category": "A", "value": 1})]).unwrap();

    let reopened = DatasetStore::new(dir.path().join("chart-data.json"));
    assert_eq!(reopened.load().unwrap(), vec![json!({"category": "A", "value": 1})]);
}

#[test]
fn file_is_pretty_json() {
    let (_dir, store) = temp_store();
    store.save(&[json!({"category": "A"})]).unwrap();
    let text = std::fs::read_to_string(store.path()).unwrap();
    assert!(text.starts_with("[\n"), "{text}");
    assert!(text.ends_with("]\n"), "{text}");
}

#[test]
fn saving_empty_array_replaces_seed() {
    let (_dir, store) = temp_store();
    store.save(&[]).unwrap();
    assert_eq!(store.load().unwrap(), Vec::<Value>::new());
}

#[test]
fn corrupt_file_is_an_error() {
    let (_dir, store) = temp_store();
    std::fs::write(store.path(), "not json").unwrap();
    match store.load() {
        Err(StoreError::Corrupt { path, .. }) => assert_eq!(path, store.path()),
        other => panic!("expected Corrupt, got {other:?}"),
    }
}

#[test]
fn concurrent_saves_leave_a_whole_dataset() {
    let (_dir, store) = temp_store();
    let handles: Vec<_> = (0..8)
        .map(|n| {
            let store = store.clone();
            std::thread::spawn(move || {
                let items: Vec<Value> = (0..50).map(|i| json!({"writer": n, "i": i})).collect();
                store.save(&items).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let items = store.load().unwrap();
    assert_eq!(items.len(), 50);
    let writer = &items[0]["writer"];
    assert!(items.iter().all(|item| &item["writer"] == writer));
}
