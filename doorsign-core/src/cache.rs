//! Mtime-gated in-memory cache of the event store.
//!
//! The cache is an explicit state value owned by server state (behind a
//! lock), not a process-wide global. It holds the last-loaded snapshot and
//! the store file's modification time at load, and reloads lazily whenever
//! the file has advanced past that timestamp or `invalidate` was called.

use std::path::PathBuf;
use std::time::SystemTime;

use crate::error::SignResult;
use crate::event::Event;
use crate::store;

pub struct EventCache {
    store_path: PathBuf,
    snapshot: Vec<Event>,
    /// Store mtime at the last successful load. `None` until first load.
    loaded_at: Option<SystemTime>,
}

impl EventCache {
    pub fn new(store_path: PathBuf) -> Self {
        EventCache {
            store_path,
            snapshot: Vec::new(),
            loaded_at: None,
        }
    }

    /// Return the current snapshot, reloading the store file first if the
    /// cache is stale.
    ///
    /// Stale means: never loaded, explicitly invalidated, or the file's
    /// modification time is newer than the one recorded at last load. The
    /// snapshot is replaced wholesale on reload, never partially updated.
    /// A failed reload leaves the previous state in place and surfaces the
    /// error to the caller; the next call will retry.
    pub fn ensure_fresh(&mut self) -> SignResult<&[Event]> {
        let modified = store::modified_time(&self.store_path)?;

        let stale = match self.loaded_at {
            None => true,
            Some(loaded) => modified > loaded,
        };

        if stale {
            tracing::debug!(path = %self.store_path.display(), "reloading event store");
            self.snapshot = store::read_events(&self.store_path)?;
            self.loaded_at = Some(modified);
        }

        Ok(&self.snapshot)
    }

    /// Force the next `ensure_fresh` to reload unconditionally.
    ///
    /// Called by the ingestion job after it rewrites the store file. The
    /// mtime comparison alone could miss a rewrite that lands within the
    /// filesystem's timestamp resolution.
    pub fn invalidate(&mut self) {
        self.loaded_at = None;
    }
}
