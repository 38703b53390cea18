pub mod data;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use doorsign_core::SignError;

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert core errors to HTTP responses
pub struct AppError(SignError);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0 {
            SignError::StoreUnavailable { .. }
            | SignError::StoreCorrupt(_)
            | SignError::Render(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::warn!("request failed: {}", self.0);
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (self.status(), body).into_response()
    }
}

impl From<SignError> for AppError {
    fn from(err: SignError) -> Self {
        Self(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use chrono_tz::Tz;
    use doorsign_core::DoorsignConfig;
    use std::path::PathBuf;

    fn test_config(store_path: PathBuf) -> DoorsignConfig {
        DoorsignConfig {
            feed_url: "https://example.com/feed.ics".to_string(),
            llm_api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            llm_api_key: "test-key".to_string(),
            llm_model: "gpt-4o-mini".to_string(),
            store_path,
            display_timezone: Tz::UTC,
            fixed_now: None,
            port: 0,
            ingest_interval_hours: 168,
        }
    }

    #[test]
    fn test_store_and_render_failures_are_service_unavailable() {
        let unavailable = AppError(SignError::StoreUnavailable {
            path: PathBuf::from("/tmp/events.json"),
        });
        let corrupt = AppError(SignError::StoreCorrupt("bad json".into()));
        let render = AppError(SignError::Render("chrome went away".into()));

        assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(corrupt.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(render.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_other_failures_are_internal_errors() {
        let config = AppError(SignError::Config("missing feed url".into()));
        assert_eq!(config.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_missing_store_fails_requests_until_file_appears() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("events.json");
        let state = AppState::new(test_config(store_path.clone()));

        // No store yet: the request fails with 503, the state survives.
        let err = state.cache.lock().await.ensure_fresh().unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::SERVICE_UNAVAILABLE);

        // Once ingestion writes the file, the same state serves normally.
        std::fs::write(
            &store_path,
            r#"[{"title": "Standup",
                 "startTime": "2025-03-20T09:00:00Z",
                 "endTime": "2025-03-20T09:15:00Z",
                 "location": ["2.05"]}]"#,
        )
        .unwrap();

        let mut cache = state.cache.lock().await;
        let events = cache.ensure_fresh().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].display_title(), "Standup");
    }
}
