//! Store integration tests: init, replace-on-write, lookups, durability.

mod common;

use chrono::{Duration, TimeZone, Utc};
use pzone_collection::{
    normalize, CardEntry, Collection, CollectionError, CollectionStore, ErrorKind, FixedClock,
};
use std::sync::Arc;
use std::thread;

fn card(id: &str, qty: u32) -> CardEntry {
    CardEntry {
        card_id: Some(id.to_string()),
        name: Some(format!("Card {id}")),
        set: Some("A1".to_string()),
        rarity: None,
        lang: "FR".to_string(),
        qty,
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_is_idempotent() {
    let store = common::setup_store();
    let collection = Collection::new("42", vec![card("A1", 1)]);
    store.upsert("u1", &collection, &common::fixed_clock()).unwrap();

    store.init().unwrap();
    store.init().unwrap();

    assert_eq!(store.user_count().unwrap(), 1);
    assert!(store.get("u1").unwrap().is_some());
}

#[test]
fn operations_before_init_fail_with_storage_error() {
    let store = CollectionStore::open_in_memory().unwrap();
    let err = store.get("u1").unwrap_err();
    assert!(matches!(err, CollectionError::Storage(_)));
    assert_eq!(err.kind(), ErrorKind::Storage);
}

// ---------------------------------------------------------------------------
// get
// ---------------------------------------------------------------------------

#[test]
fn get_missing_user_is_none() {
    let store = common::setup_store();
    assert!(store.get("nobody").unwrap().is_none());
}

#[test]
fn upsert_then_get_round_trips_record() {
    let store = common::setup_store();
    let collection = normalize(&common::results_export()).unwrap();

    let written = store
        .upsert("u1", &collection, &common::fixed_clock())
        .unwrap();
    let read = store.get("u1").unwrap().unwrap();

    assert_eq!(read, written);
    assert_eq!(read.user_id, "u1");
    assert_eq!(read.player_id, "42");
    assert_eq!(read.collection, collection);
    assert_eq!(read.updated_at, common::fixed_instant());
}

// ---------------------------------------------------------------------------
// upsert
// ---------------------------------------------------------------------------

#[test]
fn second_upsert_fully_replaces_first() {
    let store = common::setup_store();
    let first = Collection::new("7", vec![card("A1", 3), card("B1", 1)]);
    let second = Collection::new("8", vec![card("C1", 2)]);

    let early = FixedClock(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    let late = FixedClock(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());

    store.upsert("u1", &first, &early).unwrap();
    store.upsert("u1", &second, &late).unwrap();

    let record = store.get("u1").unwrap().unwrap();
    assert_eq!(record.player_id, "8");
    assert_eq!(record.collection, second);
    assert_eq!(record.updated_at, late.0);
    assert!(record
        .collection
        .cards
        .iter()
        .all(|c| c.card_id.as_deref() == Some("C1")));
    assert_eq!(store.user_count().unwrap(), 1);
}

#[test]
fn upsert_with_empty_collection_replaces_cards() {
    let store = common::setup_store();
    store
        .upsert("u1", &Collection::new("7", vec![card("A1", 3)]), &common::fixed_clock())
        .unwrap();
    store
        .upsert("u1", &Collection::new("7", Vec::new()), &common::fixed_clock())
        .unwrap();

    let record = store.get("u1").unwrap().unwrap();
    assert!(record.collection.is_empty());
}

#[test]
fn users_are_kept_apart() {
    let store = common::setup_store();
    store
        .upsert("u1", &Collection::new("1", vec![card("A1", 1)]), &common::fixed_clock())
        .unwrap();
    store
        .upsert("u2", &Collection::new("2", vec![card("B1", 5)]), &common::fixed_clock())
        .unwrap();

    assert_eq!(store.get("u1").unwrap().unwrap().player_id, "1");
    assert_eq!(store.get("u2").unwrap().unwrap().player_id, "2");
    assert_eq!(store.user_count().unwrap(), 2);
}

#[test]
fn updated_at_is_truncated_to_seconds() {
    let store = common::setup_store();
    let clock = FixedClock(common::fixed_instant() + Duration::milliseconds(750));

    let written = store
        .upsert("u1", &Collection::new("1", Vec::new()), &clock)
        .unwrap();

    assert_eq!(written.updated_at, common::fixed_instant());
    assert_eq!(store.get("u1").unwrap().unwrap().updated_at, common::fixed_instant());
}

#[test]
fn empty_user_id_is_rejected() {
    let store = common::setup_store();
    let err = store
        .upsert("", &Collection::new("1", Vec::new()), &common::fixed_clock())
        .unwrap_err();
    assert!(matches!(err, CollectionError::InvalidArgument(_)));
    assert_eq!(store.user_count().unwrap(), 0);
}

#[test]
fn payload_keeps_null_fields_and_order() {
    let store = common::setup_store();
    let cards = vec![
        CardEntry {
            card_id: None,
            name: None,
            set: None,
            rarity: None,
            lang: "FR".to_string(),
            qty: 1,
        },
        card("A1", 2),
        card("A1", 4),
    ];
    let collection = Collection::new("unknown", cards);
    store.upsert("u1", &collection, &common::fixed_clock()).unwrap();

    let record = store.get("u1").unwrap().unwrap();
    assert_eq!(record.collection, collection);
}

// ---------------------------------------------------------------------------
// Durability and concurrency
// ---------------------------------------------------------------------------

#[test]
fn file_store_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("collections.duckdb");
    let collection = Collection::new("42", vec![card("A1", 3)]);

    {
        let store = CollectionStore::open(&path).unwrap();
        store.init().unwrap();
        store.upsert("u1", &collection, &common::fixed_clock()).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
    }

    let store = CollectionStore::open(&path).unwrap();
    store.init().unwrap();
    let record = store.get("u1").unwrap().unwrap();
    assert_eq!(record.collection, collection);
    assert_eq!(record.updated_at, common::fixed_instant());
}

#[test]
fn concurrent_writers_are_serialized() {
    let store = Arc::new(common::setup_store());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let collection = Collection::new(i.to_string(), vec![card("A1", i + 1)]);
                for _ in 0..5 {
                    store
                        .upsert(&format!("u{i}"), &collection, &common::fixed_clock())
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.user_count().unwrap(), 8);
    for i in 0..8u32 {
        let record = store.get(&format!("u{i}")).unwrap().unwrap();
        assert_eq!(record.player_id, i.to_string());
        assert_eq!(record.collection.cards[0].qty, i + 1);
    }
}

// ---------------------------------------------------------------------------
// Corrupt rows
// ---------------------------------------------------------------------------

/// Write a valid record for `u1` to a file store, then run `update` against
/// the file through a separate connection.
fn corrupted_store(update: &str) -> (tempfile::TempDir, CollectionStore) {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("collections.duckdb");

    {
        let store = CollectionStore::open(&path).unwrap();
        store.init().unwrap();
        let collection = Collection::new("42", vec![card("A1", 3)]);
        store.upsert("u1", &collection, &common::fixed_clock()).unwrap();
    }
    {
        let conn = duckdb::Connection::open(&path).unwrap();
        conn.execute(update, []).unwrap();
    }

    let store = CollectionStore::open(&path).unwrap();
    store.init().unwrap();
    (tmp, store)
}

#[test]
fn corrupt_payload_is_storage_error() {
    let (_tmp, store) =
        corrupted_store("UPDATE collections SET payload = 'not json' WHERE user_id = 'u1'");

    let err = store.get("u1").unwrap_err();

    assert!(matches!(err, CollectionError::CorruptRecord(_)));
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(err.kind().as_str(), "storage");
}

#[test]
fn payload_of_wrong_shape_is_storage_error() {
    let (_tmp, store) =
        corrupted_store("UPDATE collections SET payload = '{\"cards\": 3}' WHERE user_id = 'u1'");

    let err = store.get("u1").unwrap_err();

    assert!(matches!(err, CollectionError::CorruptRecord(_)));
    assert_eq!(err.kind(), ErrorKind::Storage);
}

#[test]
fn corrupt_updated_at_is_storage_error() {
    let (_tmp, store) =
        corrupted_store("UPDATE collections SET updated_at = 'yesterday' WHERE user_id = 'u1'");

    let err = store.get("u1").unwrap_err();

    assert!(matches!(err, CollectionError::CorruptRecord(_)));
    assert_eq!(err.kind(), ErrorKind::Storage);
}

#[test]
fn corrupt_row_does_not_affect_other_users() {
    let (_tmp, store) =
        corrupted_store("UPDATE collections SET payload = 'not json' WHERE user_id = 'u1'");
    let collection = Collection::new("7", vec![card("B1", 1)]);
    store.upsert("u2", &collection, &common::fixed_clock()).unwrap();

    assert!(store.get("u1").is_err());
    assert_eq!(store.get("u2").unwrap().unwrap().collection, collection);
}
