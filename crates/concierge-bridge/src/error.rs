//! Error types for concierge-bridge

use thiserror::Error;

/// Result type alias using the bridge Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur on the host/widget message channel
#[derive(Error, Debug)]
pub enum Error {
    /// An origin string could not be parsed
    #[error("invalid origin: {0}")]
    InvalidOrigin(String),

    /// A URL could not be parsed or has no host
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The origin is not on the allow-list
    #[error("origin not allowed: {0}")]
    OriginNotAllowed(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The underlying message port failed to deliver
    #[error("port error: {0}")]
    Port(String),
}
