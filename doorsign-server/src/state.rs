use std::sync::Arc;

use tokio::sync::Mutex;

use doorsign_core::{DoorsignConfig, EventCache};

/// Shared application state.
///
/// The cache sits behind a mutex so concurrent requests that find it stale
/// share one reload instead of reloading redundantly.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DoorsignConfig>,
    pub cache: Arc<Mutex<EventCache>>,
}

impl AppState {
    pub fn new(config: DoorsignConfig) -> Self {
        let cache = EventCache::new(config.store_path.clone());
        AppState {
            config: Arc::new(config),
            cache: Arc::new(Mutex::new(cache)),
        }
    }
}
