//! Async wrapper around [`CollectionSync`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! DuckDB reads and writes.
//!
//! # Example
//!
//! ```no_run
//! use pzone_collection::AsyncCollectionSync;
//!
//! #[tokio::main]
//! async fn main() {
//!     let sync = AsyncCollectionSync::builder()
//!         .db_path("tcg.duckdb")
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     let raw = serde_json::json!({"cards": [{"code": "B2", "quantity": 2}]});
//!     let report = sync.sync("user-1", raw).await.unwrap();
//!
//!     // Run any sync method via closure
//!     let users = sync.run(|s| s.store().user_count()).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::clock::Clock;
use crate::error::{CollectionError, Result};
use crate::models::{CollectionReport, SyncReport};
use crate::CollectionSync;

// ---------------------------------------------------------------------------
// AsyncCollectionSyncBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncCollectionSync`] instance.
#[derive(Default)]
pub struct AsyncCollectionSyncBuilder {
    db_path: Option<PathBuf>,
    in_memory: bool,
    clock: Option<Arc<dyn Clock>>,
}

impl AsyncCollectionSyncBuilder {
    /// Set the DuckDB database file.
    pub fn db_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.db_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep everything in memory instead of on disk.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Set the time source used to stamp `updated_at`.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the async facade, opening the store on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncCollectionSync> {
        tokio::task::spawn_blocking(move || {
            let mut builder = CollectionSync::builder();
            if let Some(path) = self.db_path {
                builder = builder.db_path(path);
            }
            if self.in_memory {
                builder = builder.in_memory();
            }
            if let Some(clock) = self.clock {
                builder = builder.clock(clock);
            }
            let inner = builder.build()?;
            Ok(AsyncCollectionSync {
                inner: Arc::new(inner),
            })
        })
        .await
        .map_err(|e| CollectionError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncCollectionSync
// ---------------------------------------------------------------------------

/// Async wrapper around [`CollectionSync`].
///
/// Cheap to clone; clones share the same store. The store serializes its own
/// DuckDB access, so concurrent calls from different tasks are safe.
#[derive(Clone)]
pub struct AsyncCollectionSync {
    inner: Arc<CollectionSync>,
}

impl AsyncCollectionSync {
    /// Create a new builder for configuring the async facade.
    pub fn builder() -> AsyncCollectionSyncBuilder {
        AsyncCollectionSyncBuilder::default()
    }

    /// Run a closure against the inner [`CollectionSync`] on the blocking
    /// thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&CollectionSync) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(inner.as_ref()))
            .await
            .map_err(|e| CollectionError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Normalize and store an export for `user_id`.
    pub async fn sync(&self, user_id: impl Into<String>, raw: Value) -> Result<SyncReport> {
        let user_id = user_id.into();
        self.run(move |s| s.sync(&user_id, &raw)).await
    }

    /// Summarize the collection stored for `user_id`.
    pub async fn summary(&self, user_id: impl Into<String>) -> Result<Option<CollectionReport>> {
        let user_id = user_id.into();
        self.run(move |s| s.summary(&user_id)).await
    }
}
