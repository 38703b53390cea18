//! Environment-based configuration.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use config::{Config, Environment};
use serde::Deserialize;

use crate::error::{SignError, SignResult};

fn default_llm_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/events.json")
}

fn default_timezone() -> Tz {
    Tz::UTC
}

fn default_port() -> u16 {
    3000
}

fn default_ingest_interval_hours() -> u64 {
    // Weekly, matching the feed's publication cadence.
    168
}

/// Server configuration, read from `DOORSIGN_`-prefixed environment
/// variables (e.g. `DOORSIGN_FEED_URL`, `DOORSIGN_DISPLAY_TIMEZONE`).
#[derive(Debug, Clone, Deserialize)]
pub struct DoorsignConfig {
    /// Calendar feed to import.
    pub feed_url: String,

    #[serde(default = "default_llm_api_url")]
    pub llm_api_url: String,

    pub llm_api_key: String,

    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Where the ingestion job writes the event store.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Time zone the displays live in; "today" is judged against this,
    /// not against the host's local time.
    #[serde(default = "default_timezone")]
    pub display_timezone: Tz,

    /// Pins "now" to a fixed instant for deterministic testing.
    #[serde(default)]
    pub fixed_now: Option<DateTime<Utc>>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_ingest_interval_hours")]
    pub ingest_interval_hours: u64,
}

impl DoorsignConfig {
    pub fn load() -> SignResult<Self> {
        Config::builder()
            .add_source(Environment::with_prefix("DOORSIGN"))
            .build()
            .map_err(|e| SignError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SignError::Config(e.to_string()))
    }

    /// The reference instant for selection: the pinned instant when one is
    /// configured, the wall clock otherwise.
    pub fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn minimal() -> DoorsignConfig {
        DoorsignConfig {
            feed_url: "https://example.com/feed.ics".to_string(),
            llm_api_url: default_llm_api_url(),
            llm_api_key: "test-key".to_string(),
            llm_model: default_llm_model(),
            store_path: default_store_path(),
            display_timezone: default_timezone(),
            fixed_now: None,
            port: default_port(),
            ingest_interval_hours: default_ingest_interval_hours(),
        }
    }

    #[test]
    fn test_fixed_now_overrides_wall_clock() {
        let pinned = Utc.with_ymd_and_hms(2025, 3, 20, 9, 30, 0).unwrap();
        let config = DoorsignConfig {
            fixed_now: Some(pinned),
            ..minimal()
        };
        assert_eq!(config.now(), pinned);
    }

    #[test]
    fn test_wall_clock_when_not_pinned() {
        let config = minimal();
        let before = Utc::now();
        let now = config.now();
        assert!(now >= before);
    }
}
