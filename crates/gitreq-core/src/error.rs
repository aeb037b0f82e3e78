//! Error types for git-request-list.

use thiserror::Error;

/// Main error type for git-request-list operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(String),

    /// API returned a non-success status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body or headers could not be interpreted
    #[error("Invalid API response: {0}")]
    InvalidData(String),

    /// Upstream rate limit is exhausted
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Output could not be rendered
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Build an API error from a status code and response body.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error stems from configuration rather than a remote call.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Whether this error was raised while talking to an upstream API.
    pub fn is_api(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Api { .. } | Error::InvalidData(_) | Error::RateLimited(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidData(e.to_string())
    }
}

/// Result type alias for git-request-list operations.
pub type Result<T> = std::result::Result<T, Error>;
