//! Shared test fixtures for the collection sync integration tests.
//!
//! Provides in-memory stores and facades with a fixed clock, plus sample
//! exports holding the same two cards in each supported layout.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use pzone_collection::{CollectionStore, CollectionSync, FixedClock};
use serde_json::{json, Value};
use std::sync::Arc;

/// Instant every fixture clock reports.
pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 5, 1, 2, 35).unwrap()
}

pub fn fixed_clock() -> FixedClock {
    FixedClock(fixed_instant())
}

/// Create an initialized in-memory store.
pub fn setup_store() -> CollectionStore {
    let store = CollectionStore::open_in_memory().unwrap();
    store.init().unwrap();
    store
}

/// Create an in-memory facade whose clock always reports [`fixed_instant`].
pub fn setup_sync() -> CollectionSync {
    CollectionSync::builder()
        .in_memory()
        .clock(Arc::new(fixed_clock()))
        .build()
        .unwrap()
}

/// Two raw card entries as the P-Zone site emits them.
fn sample_cards() -> Value {
    json!([
        {
            "id": "A1-094",
            "name": "Pikachu",
            "set": {"code": "A1", "name": "Genetic Apex"},
            "rarity": "C",
            "count": "3"
        },
        {
            "code": "A1a-003",
            "name": "Celebi ex",
            "set": "A1a",
            "rarity": "RR",
            "language": "EN",
            "quantity": 1
        }
    ])
}

/// Next.js page data: `props.pageProps.cards` with the player inside.
pub fn page_props_export() -> Value {
    json!({
        "props": {
            "pageProps": {
                "player": {"id": "42", "name": "Ash"},
                "cards": sample_cards()
            }
        }
    })
}

/// Search API response: top-level `results`.
pub fn results_export() -> Value {
    json!({
        "player_id": "42",
        "results": sample_cards(),
        "total": 2
    })
}

/// Bare top-level `cards` list.
pub fn cards_export() -> Value {
    json!({
        "playerId": 42,
        "cards": sample_cards()
    })
}
