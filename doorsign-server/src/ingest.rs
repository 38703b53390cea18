//! Calendar feed ingestion.
//!
//! Fetches the configured feed, hands it to a language model to normalize
//! into the event-array shape, writes the store file atomically, then
//! invalidates the cache exactly once. Any failure leaves the previous
//! store and cache untouched.

use serde::Deserialize;
use serde_json::json;

use doorsign_core::{Event, SignError, SignResult, store};

use crate::state::AppState;

const NORMALIZE_PROMPT: &str = "You convert a raw calendar feed into a JSON array of events. \
Each event has: title (string), startTime and endTime (RFC 3339 timestamps), \
location (array of room-code strings), and optionally organizer ({name}), \
subjectCode, attendees, status. Reply with the JSON array only, no prose.";

pub async fn run_ingest(state: &AppState) -> SignResult<()> {
    let config = &state.config;

    let feed = fetch_feed(&config.feed_url).await?;
    let events = normalize(config, &feed).await?;

    store::write_events(&config.store_path, &events)?;
    state.cache.lock().await.invalidate();

    tracing::info!(count = events.len(), "ingested calendar feed");
    Ok(())
}

async fn fetch_feed(url: &str) -> SignResult<String> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| SignError::Feed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(SignError::Feed(format!("feed returned {}", response.status())));
    }

    response.text().await.map_err(|e| SignError::Feed(e.to_string()))
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

async fn normalize(config: &doorsign_core::DoorsignConfig, feed: &str) -> SignResult<Vec<Event>> {
    let body = json!({
        "model": config.llm_model,
        "messages": [
            {"role": "system", "content": NORMALIZE_PROMPT},
            {"role": "user", "content": feed},
        ],
        "temperature": 0,
    });

    let response = reqwest::Client::new()
        .post(&config.llm_api_url)
        .bearer_auth(&config.llm_api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| SignError::Normalize(e.to_string()))?;

    if !response.status().is_success() {
        return Err(SignError::Normalize(format!(
            "model API returned {}",
            response.status()
        )));
    }

    let reply: ChatResponse = response
        .json()
        .await
        .map_err(|e| SignError::Normalize(e.to_string()))?;

    let content = reply
        .choices
        .first()
        .map(|c| c.message.content.as_str())
        .ok_or_else(|| SignError::Normalize("model returned no choices".to_string()))?;

    parse_events(content)
}

/// Parse the model reply into events, tolerating a Markdown code fence
/// around the array.
fn parse_events(reply: &str) -> SignResult<Vec<Event>> {
    let json = strip_code_fence(reply);
    serde_json::from_str(json)
        .map_err(|e| SignError::Normalize(format!("model output is not an event array: {e}")))
}

fn strip_code_fence(s: &str) -> &str {
    let trimmed = s.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    match rest.strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => trimmed,
    }
}
