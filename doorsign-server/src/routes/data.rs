//! The display endpoint: current/next event for a room plus the rendered image.

use axum::{Json, Router, extract::State, routing::post};
use base64::Engine;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use doorsign_core::{Event, select};

use crate::render;
use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/data", post(data))
}

#[derive(Deserialize)]
pub struct DataRequest {
    pub room: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse {
    pub room: String,
    pub current_time: DateTime<Utc>,
    pub event: Option<Event>,
    pub next_event: Option<Event>,
    pub next_event_message: Option<String>,
    pub image_base64: String,
}

/// POST /data - What's on in this room, with the e-ink image to show
async fn data(
    State(state): State<AppState>,
    Json(req): Json<DataRequest>,
) -> Result<Json<DataResponse>, AppError> {
    let now = state.config.now();
    let tz = state.config.display_timezone;

    // Hold the lock only for refresh + selection, not for rendering.
    let (current, next) = {
        let mut cache = state.cache.lock().await;
        let events = cache.ensure_fresh()?;
        let selection = select(events, &req.room, now, tz);
        (selection.current.cloned(), selection.next.cloned())
    };

    let next_event_message = if current.is_some() {
        None
    } else {
        Some(no_current_message(next.as_ref(), tz))
    };

    let png = render::render(current.as_ref(), &req.room, next.as_ref(), now, tz).await?;
    let image_base64 = base64::engine::general_purpose::STANDARD.encode(&png);

    Ok(Json(DataResponse {
        room: req.room,
        current_time: now,
        event: current,
        next_event: next,
        next_event_message,
        image_base64,
    }))
}

/// Message shown when the room is currently free.
fn no_current_message(next: Option<&Event>, tz: Tz) -> String {
    match next.and_then(|e| e.start_time) {
        Some(start) => format!(
            "Next event starts at {}",
            start.with_timezone(&tz).format("%H:%M")
        ),
        None => "No upcoming events for this room".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn upcoming(start_hour: u32) -> Event {
        Event {
            title: Some("Workshop".to_string()),
            start_time: Some(Utc.with_ymd_and_hms(2025, 3, 20, start_hour, 0, 0).unwrap()),
            end_time: Some(
                Utc.with_ymd_and_hms(2025, 3, 20, start_hour + 1, 0, 0).unwrap(),
            ),
            location: vec!["2.05".to_string()],
            organizer: None,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_message_names_next_start_in_display_timezone() {
        let event = upcoming(11);
        assert_eq!(
            no_current_message(Some(&event), Tz::UTC),
            "Next event starts at 11:00"
        );
        // 11:00 UTC is 12:00 in Berlin (CET, no DST on 2025-03-20).
        assert_eq!(
            no_current_message(Some(&event), Tz::Europe__Berlin),
            "Next event starts at 12:00"
        );
    }

    #[test]
    fn test_message_for_empty_room() {
        assert_eq!(
            no_current_message(None, Tz::UTC),
            "No upcoming events for this room"
        );
    }

    #[test]
    fn test_response_uses_camel_case_keys() {
        let response = DataResponse {
            room: "2.05".to_string(),
            current_time: Utc.with_ymd_and_hms(2025, 3, 20, 9, 30, 0).unwrap(),
            event: None,
            next_event: Some(upcoming(11)),
            next_event_message: Some("Next event starts at 11:00".to_string()),
            image_base64: String::new(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("currentTime").is_some());
        assert!(value.get("nextEvent").is_some());
        assert!(value.get("nextEventMessage").is_some());
        assert!(value.get("imageBase64").is_some());
        assert!(value["event"].is_null());
    }
}
