//! The on-disk event store.
//!
//! A single JSON file holding an array of events. The ingestion job is the
//! only writer; the cache reads it. Writes are whole-file replaces via a
//! temp file in the same directory, so readers never observe a partial file.

use std::path::Path;
use std::time::SystemTime;

use crate::error::{SignError, SignResult};
use crate::event::Event;

/// Read and parse the store file.
pub fn read_events(path: &Path) -> SignResult<Vec<Event>> {
    if !path.exists() {
        return Err(SignError::StoreUnavailable {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| SignError::StoreCorrupt(e.to_string()))
}

/// Last-modified time of the store file.
pub fn modified_time(path: &Path) -> SignResult<SystemTime> {
    let metadata = std::fs::metadata(path).map_err(|_| SignError::StoreUnavailable {
        path: path.to_path_buf(),
    })?;
    Ok(metadata.modified()?)
}

/// Atomically replace the store file with the given events.
pub fn write_events(path: &Path, events: &[Event]) -> SignResult<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let json = serde_json::to_string_pretty(events)
        .map_err(|e| SignError::Serialization(e.to_string()))?;

    let tmp = tempfile::NamedTempFile::new_in(parent)?;
    std::fs::write(tmp.path(), json)?;
    tmp.persist(path)
        .map_err(|e| SignError::Io(e.error))?;

    Ok(())
}
