//! The remote matching service.
//!
//! [`Backend`] is the seam between the session client and the network:
//! [`HttpBackend`] talks to the real service, [`MockBackend`] replays
//! scripted responses in tests.

pub mod error;
pub mod http;
pub mod mock;

pub use error::*;
pub use http::HttpBackend;
pub use mock::MockBackend;

use crate::model::{Candidate, Credentials, LoginPayload, Preferences, ProfileUpdate, Registration, UserId, ViewerProfile};
use async_trait::async_trait;
use serde_json::Value;

/// Calls the session client makes against the matching service.
///
/// `Ok(None)` means the service answered successfully but without a usable
/// payload; the caller decides what that means for each operation.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Option<LoginPayload>, BackendError>;

    async fn signup(&self, registration: &Registration) -> Result<Option<Value>, BackendError>;

    async fn update_user(&self, user_id: UserId, update: &ProfileUpdate) -> Result<Option<ViewerProfile>, BackendError>;

    async fn save_preferences(&self, user_id: UserId, preferences: &Preferences) -> Result<Option<Preferences>, BackendError>;

    /// An empty body is an empty list.
    async fn find_matches(&self, user_id: UserId) -> Result<Vec<Candidate>, BackendError>;

    /// Asset reference (usually a URL) of the candidate's profile image.
    async fn profile_picture(&self, user_id: UserId) -> Result<String, BackendError>;
}
