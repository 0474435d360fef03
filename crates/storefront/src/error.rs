//! Error types for the storefront client.
//!
//! Every user-facing action catches its own `ClientError` and turns it into a
//! notification or a static fallback in the document. Nothing here reaches a
//! global handler.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the market backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    ///
    /// `message` is what the user sees, so it is displayed verbatim.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// A success response carried a body that is not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built from the configured base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Build a status error with a user-facing message.
    #[must_use]
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// The HTTP status, if the backend answered at all.
    #[must_use]
    pub const fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised when a page is missing an element the client renders into.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("Missing element: #{0}")]
    MissingElement(String),
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;
