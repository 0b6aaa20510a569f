//! Error types for concierge-host

use thiserror::Error;

/// Result type alias using the host Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while acting on the host page
#[derive(Error, Debug)]
pub enum Error {
    /// No element could be resolved for a selector or text hint
    #[error("element not found: {0}")]
    NotFound(String),

    /// A native DOM operation threw
    #[error("DOM operation failed: {0}")]
    Dom(String),

    /// Bridge-level failure (encode, origin policy, port)
    #[error(transparent)]
    Bridge(#[from] concierge_bridge::Error),
}

impl Error {
    /// Create a DOM failure from any displayable cause.
    pub fn dom(cause: impl std::fmt::Display) -> Self {
        Self::Dom(cause.to_string())
    }
}
