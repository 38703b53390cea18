//! Error types for the doorsign ecosystem.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while serving or ingesting room schedules.
///
/// None of these are fatal to the server process: they are converted to
/// request-level error responses, or logged by the ingestion job.
#[derive(Error, Debug)]
pub enum SignError {
    #[error("Event store not found at {}", path.display())]
    StoreUnavailable { path: PathBuf },

    #[error("Event store is corrupt: {0}")]
    StoreCorrupt(String),

    #[error("Display rendering failed: {0}")]
    Render(String),

    #[error("Calendar feed fetch failed: {0}")]
    Feed(String),

    #[error("Feed normalization failed: {0}")]
    Normalize(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for doorsign operations.
pub type SignResult<T> = Result<T, SignError>;
