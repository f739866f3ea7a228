//! Error types for the playback service client.

use thiserror::Error;

/// Everything that can go wrong talking to the playback service.
///
/// Callers never retry; each variant maps to one log line.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    /// The request never produced a response (connect error, timeout, ...).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose body was not the expected JSON.
    #[error("failed to decode {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// The configured base URL is unusable.
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// True for failures where no HTTP response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type shared by every client operation.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
