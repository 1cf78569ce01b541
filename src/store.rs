//! DuckDB-backed store holding one canonical collection per owning user.
//!
//! Every write replaces the user's whole row (`INSERT OR REPLACE`); nothing is
//! merged or appended. The single DuckDB connection sits behind a mutex, so
//! concurrent callers are serialized through one owner.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use duckdb::{params, Connection as DuckDbConnection};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::TABLE_NAME;
use crate::error::{CollectionError, Result};
use crate::models::{Collection, StoredCollectionRecord};

/// Keyed persistence for canonical collections.
///
/// Construct one explicitly and pass it to whoever needs it; call
/// [`init()`](CollectionStore::init) once per process start before use.
pub struct CollectionStore {
    conn: Mutex<DuckDbConnection>,
    path: Option<PathBuf>,
}

impl CollectionStore {
    /// Open (or create) a file-backed store.
    ///
    /// Creates the parent directory if it does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let newly_created = !path.exists();
        let conn = DuckDbConnection::open(path)?;
        if newly_created {
            info!(path = %path.display(), "created collection store");
        } else {
            info!(path = %path.display(), "opened collection store");
        }
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a store that lives only as long as this value.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        debug!("opened in-memory collection store");
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database file backing this store, or `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create the collections table if it does not exist yet.
    ///
    /// Safe to call on every start; an existing table and its rows are left
    /// untouched.
    pub fn init(&self) -> Result<()> {
        self.lock().execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (\
               user_id VARCHAR PRIMARY KEY, \
               player_id VARCHAR NOT NULL, \
               payload VARCHAR NOT NULL, \
               updated_at VARCHAR NOT NULL\
             )",
            TABLE_NAME
        ))?;
        info!(table = TABLE_NAME, "collection table ready");
        Ok(())
    }

    /// Write `collection` as the sole record for `user_id`.
    ///
    /// Any previous record for the user is replaced in full. `updated_at` is
    /// taken from `clock`, truncated to whole seconds (the stored precision),
    /// and the record exactly as a later [`get()`](CollectionStore::get)
    /// would return it is handed back.
    pub fn upsert(
        &self,
        user_id: &str,
        collection: &Collection,
        clock: &dyn Clock,
    ) -> Result<StoredCollectionRecord> {
        if user_id.is_empty() {
            return Err(CollectionError::InvalidArgument(
                "user_id must not be empty".to_string(),
            ));
        }

        let payload = serde_json::to_string(collection)?;
        let updated_at = clock.now().trunc_subsecs(0);

        self.lock().execute(
            &format!(
                "INSERT OR REPLACE INTO {} (user_id, player_id, payload, updated_at) \
                 VALUES (?, ?, ?, ?)",
                TABLE_NAME
            ),
            params![
                user_id,
                collection.player_id,
                payload,
                format_timestamp(&updated_at)
            ],
        )?;
        debug!(
            user_id,
            player_id = %collection.player_id,
            cards = collection.cards.len(),
            "stored collection"
        );

        Ok(StoredCollectionRecord {
            user_id: user_id.to_string(),
            player_id: collection.player_id.clone(),
            collection: collection.clone(),
            updated_at,
        })
    }

    /// Load the record for `user_id`.
    ///
    /// Returns `None` if the user never synced; that is not an error.
    pub fn get(&self, user_id: &str) -> Result<Option<StoredCollectionRecord>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT player_id, payload, updated_at FROM {} WHERE user_id = ?",
            TABLE_NAME
        ))?;
        let mut rows = stmt.query(params![user_id])?;

        let Some(row) = rows.next()? else {
            debug!(user_id, "no stored collection");
            return Ok(None);
        };

        let player_id: String = row.get(0)?;
        let payload: String = row.get(1)?;
        let updated_at: String = row.get(2)?;

        let collection: Collection = serde_json::from_str(&payload).map_err(|e| {
            CollectionError::CorruptRecord(format!(
                "payload for {user_id:?} is not a collection: {e}"
            ))
        })?;
        let updated_at = parse_timestamp(&updated_at)?;
        debug!(user_id, %player_id, cards = collection.cards.len(), "loaded collection");

        Ok(Some(StoredCollectionRecord {
            user_id: user_id.to_string(),
            player_id,
            collection,
            updated_at,
        }))
    }

    /// Number of users with a stored collection.
    pub fn user_count(&self) -> Result<usize> {
        let conn = self.lock();
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", TABLE_NAME),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn lock(&self) -> MutexGuard<'_, DuckDbConnection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            CollectionError::CorruptRecord(format!("updated_at {raw:?} is not RFC 3339: {e}"))
        })
}
