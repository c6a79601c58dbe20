//! [`Backend`] over HTTP with JSON bodies.

use super::{Backend, BackendError};
use crate::model::{Candidate, Credentials, LoginPayload, Preferences, ProfileUpdate, Registration, UserId, ViewerProfile};
use crate::platform::CredentialStore;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Talks to the matching service at `base_url`.
///
/// Every request carries the stored credential token as a bearer header
/// when one is present.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialStore>) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and returns the body when the status is a success.
    async fn send(&self, request: RequestBuilder) -> Result<String, BackendError> {
        let request = match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "Response");

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(body)
    }

    async fn send_for<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>, BackendError> {
        let body = self.send(request).await?;
        match usable_payload(&body)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<Option<LoginPayload>, BackendError> {
        self.send_for(self.client.post(self.url("/user/login")).json(credentials)).await
    }

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    async fn signup(&self, registration: &Registration) -> Result<Option<Value>, BackendError> {
        self.send_for(self.client.post(self.url("/user/signup")).json(registration)).await
    }

    #[instrument(skip(self, update))]
    async fn update_user(&self, user_id: UserId, update: &ProfileUpdate) -> Result<Option<ViewerProfile>, BackendError> {
        let url = self.url(&format!("/user/update/{user_id}"));
        self.send_for(self.client.put(url).json(update)).await
    }

    #[instrument(skip(self, preferences))]
    async fn save_preferences(&self, user_id: UserId, preferences: &Preferences) -> Result<Option<Preferences>, BackendError> {
        let url = self.url(&format!("/user/preferences/save/{user_id}"));
        self.send_for(self.client.post(url).json(preferences)).await
    }

    #[instrument(skip(self))]
    async fn find_matches(&self, user_id: UserId) -> Result<Vec<Candidate>, BackendError> {
        let url = self.url(&format!("/user/matches/find/{user_id}"));
        let candidates: Option<Vec<Candidate>> = self.send_for(self.client.post(url)).await?;
        Ok(candidates.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn profile_picture(&self, user_id: UserId) -> Result<String, BackendError> {
        let url = self.url(&format!("/profile-picture?userId={user_id}"));
        let body = self.send(self.client.get(url)).await?;
        asset_reference(&body)
    }
}

/// Parses a success body, returning `None` when it carries nothing usable:
/// empty, `null`, `false`, `0` or `""`.
fn usable_payload(body: &str) -> Result<Option<Value>, BackendError> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(body)?;
    let falsy = match &value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    };
    Ok(if falsy { None } else { Some(value) })
}

/// `message` field of a JSON error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}

/// The profile-picture endpoint answers with either a JSON string or plain text.
fn asset_reference(body: &str) -> Result<String, BackendError> {
    let body = body.trim();
    let asset = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s,
        _ => body.to_string(),
    };
    if asset.is_empty() {
        return Err(BackendError::Decode("empty asset reference".into()));
    }
    Ok(asset)
}
