//! Periodic ingestion schedule.

use std::time::Duration;

use crate::ingest;
use crate::state::AppState;

/// Run ingestion once at startup, then every `ingest_interval_hours`.
///
/// Failures are logged and skipped; the cache keeps serving the previous
/// snapshot until the next successful run.
pub fn spawn_ingest_loop(state: AppState) {
    let period = ingest_period(state.config.ingest_interval_hours);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            // The first tick fires immediately, covering the startup run.
            interval.tick().await;
            if let Err(e) = ingest::run_ingest(&state).await {
                tracing::warn!("ingestion failed: {e}");
            }
        }
    });
}

/// Interval between ingestion runs, clamped to at least one hour.
/// `tokio::time::interval` panics on a zero period, which would kill the
/// ingestion task while the server kept serving a stale store.
fn ingest_period(hours: u64) -> Duration {
    Duration::from_secs(hours.max(1) * 3600)
}
