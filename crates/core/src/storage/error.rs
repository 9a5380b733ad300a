//! Error types for the storage module.

use thiserror::Error;

/// Errors that can occur while storing content.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Nothing to store.
    #[error("Refusing to store empty content")]
    EmptyContent,

    /// Request timed out.
    #[error("Storage request timed out")]
    Timeout,

    /// Could not connect to the storage host.
    #[error("Connection to storage failed: {0}")]
    ConnectionFailed(String),

    /// The storage host refused the upload.
    #[error("Storage rejected upload (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The storage host answered with something we cannot use.
    #[error("Invalid storage response: {0}")]
    InvalidResponse(String),

    /// Any other request failure.
    #[error("Storage request failed: {0}")]
    Request(String),

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// The backend is missing required settings.
    #[error("Storage configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::ConnectionFailed(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

impl StorageError {
    /// Whether a later attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::ConnectionFailed(_) => true,
            Self::Rejected { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
