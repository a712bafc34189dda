//! Error types for clickhouse-stream.

use thiserror::Error;

/// Error type for clickhouse-stream operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed at the transport level.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The caller supplied an unusable argument (e.g. an empty query).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// ClickHouse answered with a non-200 status.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, or the status reason when the body is empty.
        message: String,
    },

    /// The configured server URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// I/O error during streaming.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for clickhouse-stream operations.
pub type Result<T> = std::result::Result<T, Error>;
