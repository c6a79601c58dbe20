//! Error types for session operations.

use crate::framework::FrameworkError;
use crate::model::{Attempt, OperationKind};
use thiserror::Error;

pub const LOGIN_REJECTED: &str = "Login failed! Invalid credentials.";
pub const LOGIN_FAILED: &str = "An error occurred during login.";
pub const REGISTER_REJECTED: &str = "Registration failed! Please try again.";
pub const REGISTER_FAILED: &str = "Registration failed due to a server issue.";
pub const UPDATE_USER_FAILED: &str = "Failed to update user information.";
pub const SAVE_PREFERENCES_FAILED: &str = "Failed to save preferences.";
pub const FETCH_MATCHES_FAILED: &str = "Error fetching matches. Please try again later.";

/// Errors returned by [`SessionClient`](crate::clients::SessionClient) operations.
///
/// `Rejected` and `Failed` carry the same message that was recorded as the
/// operation's error in the store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OperationError {
    /// The backend answered but without a usable payload.
    #[error("{message}")]
    Rejected { kind: OperationKind, message: String },

    /// Transport, status or decode failure.
    #[error("{message}")]
    Failed { kind: OperationKind, message: String },

    /// A newer invocation of the same operation took over before this one settled.
    #[error("{kind} attempt {attempt} was superseded")]
    Superseded { kind: OperationKind, attempt: Attempt },

    /// The operation needs a logged-in viewer.
    #[error("No viewer is logged in")]
    NotAuthenticated,

    #[error("Store communication error: {0}")]
    Store(#[from] FrameworkError),
}

impl OperationError {
    /// Message suitable for showing to the viewer, if the error has one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            OperationError::Rejected { message, .. } | OperationError::Failed { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Message recorded when the backend answers without a usable payload.
pub fn rejected_message(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Login => LOGIN_REJECTED,
        OperationKind::Register => REGISTER_REJECTED,
        OperationKind::UpdateUser => UPDATE_USER_FAILED,
        OperationKind::SavePreferences => SAVE_PREFERENCES_FAILED,
        OperationKind::FetchMatches => FETCH_MATCHES_FAILED,
    }
}

/// Message recorded on a backend error. Registration and profile updates
/// surface the backend's own message when it sent one.
pub fn failure_message(kind: OperationKind, backend_message: Option<&str>) -> String {
    let fallback = match kind {
        OperationKind::Login => LOGIN_FAILED,
        OperationKind::Register => REGISTER_FAILED,
        OperationKind::UpdateUser => UPDATE_USER_FAILED,
        OperationKind::SavePreferences => SAVE_PREFERENCES_FAILED,
        OperationKind::FetchMatches => FETCH_MATCHES_FAILED,
    };
    match (kind, backend_message) {
        (OperationKind::Register | OperationKind::UpdateUser, Some(message)) if !message.is_empty() => {
            message.to_string()
        }
        _ => fallback.to_string(),
    }
}
