//! Error types for concierge-widget

use thiserror::Error;

/// Result type alias using the widget Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the widget core
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error: status {0}")]
    Api(u16),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Store file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A message with this timestamp is already stored
    #[error("duplicate message timestamp: {0}")]
    DuplicateTimestamp(i64),

    /// A turn is already streaming; submissions are serialized
    #[error("a turn is already in flight")]
    TurnInFlight,

    /// A stream event payload matched no known shape
    #[error("unrecognized stream event: {0}")]
    UnrecognizedEvent(String),

    /// Bridge-level failure (encode, origin policy, port)
    #[error(transparent)]
    Bridge(#[from] concierge_bridge::Error),
}
