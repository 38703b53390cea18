//! HTML-to-PNG rendering for the e-ink display.
//!
//! Fills an embedded 800x480 template and screenshots it with headless
//! Chrome. Chrome is launched per render; renders are rare (the displays
//! poll on multi-minute intervals) so startup cost beats keeping a browser
//! process alive.

use base64::Engine;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions};

use doorsign_core::{Event, SignError, SignResult};

/// Display panel width in pixels
pub const DISPLAY_WIDTH: u32 = 800;
/// Display panel height in pixels
pub const DISPLAY_HEIGHT: u32 = 480;

const TEMPLATE: &str = include_str!("../templates/display.html");

/// Render the display image for a room.
pub async fn render(
    current: Option<&Event>,
    room: &str,
    next: Option<&Event>,
    now: DateTime<Utc>,
    tz: Tz,
) -> SignResult<Vec<u8>> {
    let html = fill_template(current, room, next, now, tz);

    // headless_chrome is a blocking API.
    tokio::task::spawn_blocking(move || screenshot(&html))
        .await
        .map_err(|e| SignError::Render(e.to_string()))?
}

fn screenshot(html: &str) -> SignResult<Vec<u8>> {
    let options = LaunchOptions::default_builder()
        .window_size(Some((DISPLAY_WIDTH, DISPLAY_HEIGHT)))
        .build()
        .map_err(|e| SignError::Render(e.to_string()))?;

    let browser = Browser::new(options).map_err(|e| SignError::Render(e.to_string()))?;
    let tab = browser.new_tab().map_err(|e| SignError::Render(e.to_string()))?;

    let data_url = format!(
        "data:text/html;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(html)
    );
    tab.navigate_to(&data_url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|e| SignError::Render(e.to_string()))?;

    tab.capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
        .map_err(|e| SignError::Render(e.to_string()))
}

fn fill_template(
    current: Option<&Event>,
    room: &str,
    next: Option<&Event>,
    now: DateTime<Utc>,
    tz: Tz,
) -> String {
    let (title, time_range, organizer) = match current {
        Some(event) => (
            event.display_title().to_string(),
            format_range(event, tz),
            event
                .organizer
                .as_ref()
                .and_then(|o| o.name.clone())
                .unwrap_or_default(),
        ),
        None => {
            let message = match next.and_then(|e| e.start_time) {
                Some(start) => format!(
                    "Free until {}",
                    start.with_timezone(&tz).format("%H:%M")
                ),
                None => "Free for the rest of the day".to_string(),
            };
            (message, String::new(), String::new())
        }
    };

    TEMPLATE
        .replace("{{ROOM}}", &escape(room))
        .replace("{{TITLE}}", &escape(&title))
        .replace("{{TIME_RANGE}}", &escape(&time_range))
        .replace("{{ORGANIZER}}", &escape(&organizer))
        .replace(
            "{{UPDATED}}",
            &escape(&now.with_timezone(&tz).format("%H:%M").to_string()),
        )
}

fn format_range(event: &Event, tz: Tz) -> String {
    match (event.start_time, event.end_time) {
        (Some(start), Some(end)) => format!(
            "{} – {}",
            start.with_timezone(&tz).format("%H:%M"),
            end.with_timezone(&tz).format("%H:%M")
        ),
        _ => String::new(),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn booked_event() -> Event {
        Event {
            title: Some("Board <review>".to_string()),
            start_time: Some(Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap()),
            end_time: Some(Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap()),
            location: vec!["2.05".to_string()],
            organizer: Some(doorsign_core::Organizer {
                name: Some("Alice".to_string()),
                extra: serde_json::Map::new(),
            }),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_template_carries_event_details_escaped() {
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 9, 30, 0).unwrap();
        let html = fill_template(Some(&booked_event()), "2.05", None, now, Tz::UTC);

        assert!(html.contains("2.05"));
        assert!(html.contains("Board &lt;review&gt;"));
        assert!(html.contains("09:00 – 10:00"));
        assert!(html.contains("Alice"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_free_room_shows_next_start() {
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 10, 30, 0).unwrap();
        let mut next = booked_event();
        next.start_time = Some(Utc.with_ymd_and_hms(2025, 3, 20, 11, 0, 0).unwrap());

        let html = fill_template(None, "2.05", Some(&next), now, Tz::UTC);
        assert!(html.contains("Free until 11:00"));
    }

    #[test]
    fn test_free_room_without_next() {
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 10, 30, 0).unwrap();
        let html = fill_template(None, "2.05", None, now, Tz::UTC);
        assert!(html.contains("Free for the rest of the day"));
    }
}
