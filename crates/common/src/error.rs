//! Unified error type for the estimator workspace.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Traffic API error: {0}")]
    Traffic(String),

    #[error("Weather API error: {0}")]
    Weather(String),

    #[error("Provider timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
