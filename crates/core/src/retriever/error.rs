//! Error types for the retriever module.

use thiserror::Error;

/// Errors that can occur while retrieving content.
#[derive(Debug, Error)]
pub enum RetrieverError {
    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Request timed out.
    #[error("Request timed out: {url}")]
    Timeout { url: String },

    /// Could not connect to the host.
    #[error("Connection failed for {url}: {message}")]
    ConnectionFailed { url: String, message: String },

    /// Server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// Server answered with an empty body.
    #[error("Empty body: {url}")]
    EmptyBody { url: String },

    /// Any other request failure.
    #[error("Request failed for {url}: {message}")]
    Request { url: String, message: String },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl RetrieverError {
    pub(crate) fn from_reqwest(url: &str, e: reqwest::Error) -> Self {
        let url = url.to_string();
        if e.is_timeout() {
            Self::Timeout { url }
        } else if e.is_connect() {
            Self::ConnectionFailed {
                url,
                message: e.to_string(),
            }
        } else {
            Self::Request {
                url,
                message: e.to_string(),
            }
        }
    }

    /// Whether a later attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::ConnectionFailed { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
