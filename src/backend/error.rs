//! Error types for backend calls.

use thiserror::Error;

/// Failure of a single backend call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success status. `message` is the `message` field of the error body, if any.
    #[error("Backend returned status {status}")]
    Status { status: u16, message: Option<String> },

    /// The response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl BackendError {
    /// Message the backend itself reported, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            BackendError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::Decode(e.to_string())
    }
}
