//! The normalized event record.
//!
//! Events come out of the ingestion job's language-model normalization step,
//! so the field shapes are deliberately forgiving: titles may be missing,
//! timestamps may fail to parse, and anything the selection logic does not
//! interpret (subject codes, attendees, status, ...) is carried through
//! opaquely and round-trips back out of the store untouched.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A scheduled event, immutable once loaded from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub title: Option<String>,

    /// Start instant. `None` when the feed entry had no parseable start;
    /// such events are skipped at selection time.
    #[serde(default, deserialize_with = "lenient_instant")]
    pub start_time: Option<DateTime<Utc>>,

    /// End instant, same leniency as `start_time`.
    #[serde(default, deserialize_with = "lenient_instant")]
    pub end_time: Option<DateTime<Utc>>,

    /// Rooms this event occupies. One event may span several rooms.
    #[serde(default)]
    pub location: Vec<String>,

    #[serde(default)]
    pub organizer: Option<Organizer>,

    /// Fields the selection logic does not interpret, preserved as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Event organizer. Only `name` is interpreted; the rest is opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organizer {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Event {
    /// Title for display purposes.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("No Title")
    }

    /// Start and end instants, present only when the event can participate
    /// in selection: both instants set and at least one room listed.
    pub fn selection_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if self.location.is_empty() {
            return None;
        }
        Some((self.start_time?, self.end_time?))
    }
}

/// Parse a timestamp string, trying RFC 3339 first and then a couple of
/// bare date-time shapes interpreted as UTC.
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Deserialize a timestamp that may be missing, null, or garbage.
///
/// A single unparseable timestamp must drop that event from selection, not
/// make the whole store file unreadable, so anything that is not a
/// parseable timestamp string maps to `None`.
fn lenient_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(parse_instant))
}
