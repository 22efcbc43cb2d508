//! Error types for router-smoke.

/// Result type alias for router-smoke operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for router-smoke.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Malformed router response: {0}")]
    MalformedResponse(String),

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedResponse(err.to_string())
    }
}
