use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::collection::Collection;

// ---------------------------------------------------------------------------
// StoredCollectionRecord — Persisted row, one per owning user
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCollectionRecord {
    pub user_id: String,
    pub player_id: String,
    pub collection: Collection,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Summary — Derived counts
// ---------------------------------------------------------------------------

/// Counts derived from a collection's card lines.
///
/// `unique_count` counts entries, not distinct card ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub unique_count: usize,
    pub total_qty: u64,
}

// ---------------------------------------------------------------------------
// Reports returned by the facade
// ---------------------------------------------------------------------------

/// Outcome of a successful sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub collection: Collection,
    pub summary: Summary,
    pub updated_at: DateTime<Utc>,
}

/// Summary of the collection currently stored for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionReport {
    pub player_id: String,
    pub summary: Summary,
    pub updated_at: DateTime<Utc>,
}
