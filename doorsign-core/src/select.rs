//! Current/next event selection for a room at an instant.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::event::Event;

/// Outcome of a selection pass. `current` and `next` are mutually
/// exclusive: a room with an active event has no "next".
#[derive(Debug, Default)]
pub struct Selection<'a> {
    pub current: Option<&'a Event>,
    pub next: Option<&'a Event>,
}

/// Find the event active in `room` at `now`, or failing that the earliest
/// event still ahead today.
///
/// Single pass over the snapshot. Events are skipped when they are missing
/// a timestamp or a location, when they are not booked for `room`, or when
/// their start does not fall on the same calendar date as `now` in the
/// display time zone `tz` (so tomorrow's events are never reported as
/// "next"). `[start, end]` is inclusive at both ends. Overlapping bookings
/// in one room are not expected; if they occur, the first one encountered
/// in store order wins.
pub fn select<'a>(events: &'a [Event], room: &str, now: DateTime<Utc>, tz: Tz) -> Selection<'a> {
    let today = now.with_timezone(&tz).date_naive();
    let mut next: Option<&Event> = None;

    for event in events {
        let Some((start, end)) = event.selection_window() else {
            continue;
        };
        if !event.location.iter().any(|l| l == room) {
            continue;
        }
        if start.with_timezone(&tz).date_naive() != today {
            continue;
        }

        if start <= now && now <= end {
            return Selection {
                current: Some(event),
                next: None,
            };
        }

        if start > now {
            let earlier = next
                .and_then(|candidate| candidate.start_time)
                .is_none_or(|best| start < best);
            if earlier {
                next = Some(event);
            }
        }
    }

    Selection { current: None, next }
}
