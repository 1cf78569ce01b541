//! P-Zone collection sync for Rust.
//!
//! Turns Pokemon Zone collection exports, in whichever JSON layout they
//! arrive, into one canonical [`Collection`], keeps the latest one per user in
//! DuckDB, and reports unique/total card counts.
//!
//! # Quick start
//!
//! ```no_run
//! use pzone_collection::CollectionSync;
//!
//! let sync = CollectionSync::builder().db_path("tcg.duckdb").build().unwrap();
//!
//! // Import an uploaded export for a user
//! let raw = serde_json::json!({"results": [{"id": "A1", "count": "3"}]});
//! let report = sync.sync("user-1", &raw).unwrap();
//! assert_eq!(report.summary.total_qty, 3);
//!
//! // Later: summarize what is stored
//! let stored = sync.summary("user-1").unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod store;
pub mod summary;

#[cfg(feature = "async")]
pub use async_client::AsyncCollectionSync;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CollectionError, ErrorKind, Result};
pub use models::{
    CardEntry, Collection, CollectionReport, StoredCollectionRecord, Summary, SyncReport,
};
pub use normalize::{normalize, normalize_with_player_hint, player_id_from_url};
pub use store::CollectionStore;
pub use summary::summarize;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

// ---------------------------------------------------------------------------
// CollectionSyncBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CollectionSync`] instance.
///
/// Use [`CollectionSync::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CollectionSyncBuilder::build) to open the
/// store.
#[derive(Default)]
pub struct CollectionSyncBuilder {
    db_path: Option<PathBuf>,
    in_memory: bool,
    clock: Option<Arc<dyn Clock>>,
}

impl CollectionSyncBuilder {
    /// Set the DuckDB database file.
    ///
    /// If not set, [`config::default_db_path()`] is used (e.g.
    /// `~/.local/share/pzone-collection/collections.duckdb` on Linux).
    pub fn db_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.db_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep everything in memory instead of on disk. Overrides `db_path`.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Set the time source used to stamp `updated_at`.
    ///
    /// Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Open the store and make sure its table exists.
    pub fn build(self) -> Result<CollectionSync> {
        let store = if self.in_memory {
            CollectionStore::open_in_memory()?
        } else {
            CollectionStore::open(self.db_path.unwrap_or_else(config::default_db_path))?
        };
        store.init()?;
        Ok(CollectionSync {
            store,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}

// ---------------------------------------------------------------------------
// CollectionSync
// ---------------------------------------------------------------------------

/// Entry point for front ends: sync an export for a user, or summarize what
/// is stored.
///
/// Owns one [`CollectionStore`] and one [`Clock`]. Normalization always
/// finishes before anything is written, so a rejected export leaves the
/// user's previous collection in place.
pub struct CollectionSync {
    store: CollectionStore,
    clock: Arc<dyn Clock>,
}

impl CollectionSync {
    /// Create a new builder for configuring the facade.
    pub fn builder() -> CollectionSyncBuilder {
        CollectionSyncBuilder::default()
    }

    // -- Sync --------------------------------------------------------------

    /// Normalize `raw`, store it as `user_id`'s collection and summarize it.
    pub fn sync(&self, user_id: &str, raw: &Value) -> Result<SyncReport> {
        self.sync_with_player_hint(user_id, raw, None)
    }

    /// Like [`sync()`](Self::sync), with a player id known from elsewhere
    /// (see [`normalize_with_player_hint`] for precedence).
    pub fn sync_with_player_hint(
        &self,
        user_id: &str,
        raw: &Value,
        player_hint: Option<&str>,
    ) -> Result<SyncReport> {
        let collection = normalize_with_player_hint(raw, player_hint)?;
        let record = self.store.upsert(user_id, &collection, self.clock.as_ref())?;
        let summary = summarize(&record.collection);
        info!(
            user_id,
            player_id = %record.player_id,
            unique = summary.unique_count,
            total = summary.total_qty,
            "synced collection"
        );
        Ok(SyncReport {
            collection: record.collection,
            summary,
            updated_at: record.updated_at,
        })
    }

    /// Sync a document captured from a player's cards page.
    ///
    /// The player id in a `/players/<id>/cards` URL takes precedence over
    /// any id found in the document.
    pub fn sync_from_page(&self, user_id: &str, raw: &Value, page_url: &str) -> Result<SyncReport> {
        let hint = player_id_from_url(page_url);
        self.sync_with_player_hint(user_id, raw, hint.as_deref())
    }

    /// Sync an uploaded export given as raw UTF-8 JSON bytes.
    pub fn sync_bytes(&self, user_id: &str, bytes: &[u8]) -> Result<SyncReport> {
        let raw: Value = serde_json::from_slice(bytes)?;
        self.sync(user_id, &raw)
    }

    /// Sync an export file. Only `.json` files are accepted.
    pub fn sync_file<P: AsRef<Path>>(&self, user_id: &str, path: P) -> Result<SyncReport> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if !is_json {
            return Err(CollectionError::InvalidArgument(format!(
                "unsupported export file {}, expected a .json file",
                path.display()
            )));
        }
        let bytes = fs::read(path)?;
        self.sync_bytes(user_id, &bytes)
    }

    // -- Lookup ------------------------------------------------------------

    /// Summarize the collection stored for `user_id`.
    ///
    /// Returns `None` if the user has not synced yet.
    pub fn summary(&self, user_id: &str) -> Result<Option<CollectionReport>> {
        Ok(self.store.get(user_id)?.map(|record| CollectionReport {
            summary: summarize(&record.collection),
            player_id: record.player_id,
            updated_at: record.updated_at,
        }))
    }

    /// Return the full stored record for `user_id`.
    pub fn collection(&self, user_id: &str) -> Result<Option<StoredCollectionRecord>> {
        self.store.get(user_id)
    }

    /// Return a reference to the underlying [`CollectionStore`].
    pub fn store(&self) -> &CollectionStore {
        &self.store
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CollectionSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.store.path() {
            Some(path) => write!(f, "CollectionSync(db={})", path.display()),
            None => write!(f, "CollectionSync(db=:memory:)"),
        }
    }
}
