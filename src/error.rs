use thiserror::Error;

/// Errors from the bulk player data source
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode player list: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Player data unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the live replay connection
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tokio_tungstenite::tungstenite::Error>,
    },

    #[error("Timed out after {}s connecting to {url}", .after.as_secs())]
    Timeout { url: String, after: std::time::Duration },

    #[error("Replay connection is closed")]
    Closed,

    #[error("Replay connection refused: {0}")]
    Refused(String),
}

/// Rejected speed edits
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SpeedError {
    #[error("Speed cannot change while a replay is running")]
    ReplayActive,

    #[error("Speed must be a positive integer, got '{0}'")]
    Invalid(String),
}
