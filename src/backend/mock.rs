//! # Mock Backend
//!
//! Scripted [`Backend`] for exercising the session client without a network.
//!
//! Operation calls are answered from an ordered expectation queue; profile
//! pictures are answered per candidate id, since prefetches run concurrently
//! and their order is not fixed.
//!
//! ```ignore
//! let mock = Arc::new(MockBackend::new());
//! mock.expect_login().return_ok(Some(payload));
//! mock.expect_find_matches().after(Duration::from_millis(50)).return_ok(candidates);
//! mock.picture(1, Ok("https://cdn/1.jpg".into()));
//!
//! // drive a SessionClient built on `mock.clone()` ...
//! mock.verify();
//! ```

use super::{Backend, BackendError};
use crate::model::{Candidate, Credentials, LoginPayload, Preferences, ProfileUpdate, Registration, UserId, ViewerProfile};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug)]
enum Reply {
    Login(Result<Option<LoginPayload>, BackendError>),
    Signup(Result<Option<Value>, BackendError>),
    UpdateUser(Result<Option<ViewerProfile>, BackendError>),
    SavePreferences(Result<Option<Preferences>, BackendError>),
    FindMatches(Result<Vec<Candidate>, BackendError>),
}

#[derive(Debug)]
struct Expectation {
    reply: Reply,
    delay: Option<Duration>,
}

#[derive(Debug, Clone)]
struct PictureReply {
    result: Result<String, BackendError>,
    delay: Option<Duration>,
}

/// A mock backend with expectation tracking.
#[derive(Debug, Default)]
pub struct MockBackend {
    expectations: Mutex<VecDeque<Expectation>>,
    pictures: Mutex<HashMap<UserId, PictureReply>>,
    picture_requests: Mutex<Vec<UserId>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_login(&self) -> ExpectationBuilder<'_, Option<LoginPayload>> {
        ExpectationBuilder::new(self, Reply::Login)
    }

    pub fn expect_signup(&self) -> ExpectationBuilder<'_, Option<Value>> {
        ExpectationBuilder::new(self, Reply::Signup)
    }

    pub fn expect_update_user(&self) -> ExpectationBuilder<'_, Option<ViewerProfile>> {
        ExpectationBuilder::new(self, Reply::UpdateUser)
    }

    pub fn expect_save_preferences(&self) -> ExpectationBuilder<'_, Option<Preferences>> {
        ExpectationBuilder::new(self, Reply::SavePreferences)
    }

    pub fn expect_find_matches(&self) -> ExpectationBuilder<'_, Vec<Candidate>> {
        ExpectationBuilder::new(self, Reply::FindMatches)
    }

    /// Answer for `profile_picture(id)`. Ids without an answer get a 404.
    pub fn picture(&self, id: UserId, result: Result<String, BackendError>) {
        self.picture_after(id, result, None);
    }

    pub fn picture_after(&self, id: UserId, result: Result<String, BackendError>, delay: Option<Duration>) {
        self.pictures.lock().unwrap().insert(id, PictureReply { result, delay });
    }

    /// Ids passed to `profile_picture`, in call order.
    pub fn picture_requests(&self) -> Vec<UserId> {
        self.picture_requests.lock().unwrap().clone()
    }

    /// Verifies that all queued expectations were consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining: {:?}", exps.len(), exps);
        }
    }

    async fn next(&self, call: &str) -> Reply {
        let expectation = self.expectations.lock().unwrap().pop_front();
        let Some(expectation) = expectation else {
            panic!("Unexpected {call} call: no expectations left");
        };
        if let Some(delay) = expectation.delay {
            tokio::time::sleep(delay).await;
        }
        expectation.reply
    }
}

/// Builder for a queued expectation.
pub struct ExpectationBuilder<'a, T> {
    mock: &'a MockBackend,
    wrap: fn(Result<T, BackendError>) -> Reply,
    delay: Option<Duration>,
}

impl<'a, T> ExpectationBuilder<'a, T> {
    fn new(mock: &'a MockBackend, wrap: fn(Result<T, BackendError>) -> Reply) -> Self {
        Self { mock, wrap, delay: None }
    }

    /// Hold the reply back for `delay` after the call arrives.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: BackendError) {
        self.push(Err(error));
    }

    fn push(self, result: Result<T, BackendError>) {
        self.mock.expectations.lock().unwrap().push_back(Expectation {
            reply: (self.wrap)(result),
            delay: self.delay,
        });
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn login(&self, _credentials: &Credentials) -> Result<Option<LoginPayload>, BackendError> {
        match self.next("login").await {
            Reply::Login(result) => result,
            other => panic!("Expectation mismatch: login called, expected {other:?}"),
        }
    }

    async fn signup(&self, _registration: &Registration) -> Result<Option<Value>, BackendError> {
        match self.next("signup").await {
            Reply::Signup(result) => result,
            other => panic!("Expectation mismatch: signup called, expected {other:?}"),
        }
    }

    async fn update_user(&self, _user_id: UserId, _update: &ProfileUpdate) -> Result<Option<ViewerProfile>, BackendError> {
        match self.next("update_user").await {
            Reply::UpdateUser(result) => result,
            other => panic!("Expectation mismatch: update_user called, expected {other:?}"),
        }
    }

    async fn save_preferences(&self, _user_id: UserId, _preferences: &Preferences) -> Result<Option<Preferences>, BackendError> {
        match self.next("save_preferences").await {
            Reply::SavePreferences(result) => result,
            other => panic!("Expectation mismatch: save_preferences called, expected {other:?}"),
        }
    }

    async fn find_matches(&self, _user_id: UserId) -> Result<Vec<Candidate>, BackendError> {
        match self.next("find_matches").await {
            Reply::FindMatches(result) => result,
            other => panic!("Expectation mismatch: find_matches called, expected {other:?}"),
        }
    }

    async fn profile_picture(&self, user_id: UserId) -> Result<String, BackendError> {
        self.picture_requests.lock().unwrap().push(user_id);
        let reply = self.pictures.lock().unwrap().get(&user_id).cloned();
        let Some(reply) = reply else {
            return Err(BackendError::Status { status: 404, message: None });
        };
        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }
        reply.result
    }
}
