use std::io;

use thiserror::Error;

/// Failure to decode a serialized record list.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported source format: .{0}")]
    UnsupportedFormat(String),
}

/// Anything that can stop a load from reaching `Ready`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source '{name}' is unavailable: {source}")]
    SourceUnavailable {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("loader panicked: {0}")]
    Panicked(String),
}

impl LoadError {
    /// Text carried by `LoadState::Failed`.
    pub fn failure_message(&self) -> String {
        format!("Failed to load items: {self}")
    }
}
