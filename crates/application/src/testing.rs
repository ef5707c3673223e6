//! In-memory fakes shared by the unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hrm_domain::{
    ApiRequest, ApiResponse, AuthError, Credentials, CurrentUser, LoginOutcome, RefreshedTokens,
    StatusResponse, TokenPair,
};
use serde_json::{Value, json};
use tokio::sync::Notify;

use crate::ports::{
    HttpClient, HttpFuture, KeyValueStore, Notifier, SessionApi, StorageError, StorageWrite,
};

/// Key-value store kept in a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().unwrap().is_empty()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.value(key))
    }

    async fn write(&self, changes: &[StorageWrite<'_>]) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap();
        for change in changes {
            match change {
                StorageWrite::Set(key, value) => {
                    values.insert((*key).to_string(), (*value).to_string());
                }
                StorageWrite::Remove(key) => {
                    values.remove(*key);
                }
            }
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Key-value store whose every call fails.
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Io(std::io::Error::other("disk unavailable")))
    }

    async fn write(&self, _changes: &[StorageWrite<'_>]) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("disk unavailable")))
    }
}

/// API double that accepts exactly one access token.
///
/// Requests carrying `Bearer <valid>` get the scripted body for their URL
/// (or `{}`), anything else gets a 401.
#[derive(Debug)]
pub struct FakeApi {
    valid_token: Mutex<String>,
    bodies: Mutex<HashMap<String, (u16, Value)>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeApi {
    pub fn accepting(token: &str) -> Self {
        Self {
            valid_token: Mutex::new(token.to_string()),
            bodies: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(&self, url: &str, status: u16, body: Value) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn authorizations(&self) -> Vec<Option<String>> {
        self.requests()
            .iter()
            .map(|r| r.authorization().map(str::to_string))
            .collect()
    }
}

impl HttpClient for FakeApi {
    fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
        let expected = format!("Bearer {}", self.valid_token.lock().unwrap());
        let response = if request.authorization() == Some(expected.as_str()) {
            let scripted = self.bodies.lock().unwrap().get(&request.url).cloned();
            let (status, body) = scripted.unwrap_or((200, json!({})));
            ApiResponse::json_body(status, &body)
        } else {
            ApiResponse::json_body(401, &json!({"message": "Unauthorized"}))
        };
        self.requests.lock().unwrap().push(request);
        Box::pin(async move { Ok(response) })
    }
}

/// Session API double with scripted refresh results.
#[derive(Debug, Default)]
pub struct FakeSessionApi {
    pub refresh_result: Mutex<Option<Result<RefreshedTokens, AuthError>>>,
    pub login_result: Mutex<Option<Result<LoginOutcome, AuthError>>>,
    pub status_result: Mutex<Option<Result<StatusResponse, AuthError>>>,
    pub refresh_calls: AtomicUsize,
    pub refresh_tokens_seen: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<String>>,
    /// Signalled once a refresh call has started.
    pub refresh_started: Notify,
    /// When set, refresh calls wait for a permit before answering.
    pub hold_refresh: Option<Arc<Notify>>,
}

impl FakeSessionApi {
    pub fn refreshing_to(access: &str, refresh: Option<&str>) -> Self {
        let api = Self::default();
        *api.refresh_result.lock().unwrap() = Some(Ok(RefreshedTokens {
            access_token: access.to_string(),
            refresh_token: refresh.map(str::to_string),
        }));
        api
    }

    pub fn failing_refresh(error: AuthError) -> Self {
        let api = Self::default();
        *api.refresh_result.lock().unwrap() = Some(Err(error));
        api
    }

    pub fn with_login(self, outcome: Result<LoginOutcome, AuthError>) -> Self {
        *self.login_result.lock().unwrap() = Some(outcome);
        self
    }

    pub fn with_status(self, status: Result<StatusResponse, AuthError>) -> Self {
        *self.status_result.lock().unwrap() = Some(status);
        self
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn status(&self) -> Result<StatusResponse, AuthError> {
        self.status_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(StatusResponse::default()))
    }
}

#[async_trait]
impl SessionApi for FakeSessionApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, AuthError> {
        self.record(&format!("login {}", credentials.email));
        self.login_result.lock().unwrap().clone().unwrap_or_else(|| {
            Ok(LoginOutcome {
                tokens: TokenPair::new("access", "refresh"),
                user: Some(CurrentUser::with_email(credentials.email.clone())),
            })
        })
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshedTokens, AuthError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_tokens_seen
            .lock()
            .unwrap()
            .push(refresh_token.to_string());
        self.refresh_started.notify_one();
        if let Some(gate) = &self.hold_refresh {
            gate.notified().await;
        }
        self.refresh_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Err(AuthError::MissingRefreshToken))
    }

    async fn register(
        &self,
        email: &str,
        _password: &str,
        organization_name: &str,
    ) -> Result<StatusResponse, AuthError> {
        self.record(&format!("register {email} {organization_name}"));
        self.status()
    }

    async fn request_otp(&self, email: &str) -> Result<StatusResponse, AuthError> {
        self.record(&format!("otp {email}"));
        self.status()
    }

    async fn verify_otp(&self, otp: &str) -> Result<StatusResponse, AuthError> {
        self.record(&format!("verify {otp}"));
        self.status()
    }

    async fn reset_password(
        &self,
        email: &str,
        _new_password: &str,
    ) -> Result<StatusResponse, AuthError> {
        self.record(&format!("reset {email}"));
        self.status()
    }
}

/// Notifier that records every message.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(bool, String)>>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.filtered(true)
    }

    pub fn errors(&self) -> Vec<String> {
        self.filtered(false)
    }

    fn filtered(&self, success: bool) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(ok, _)| *ok == success)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, title: &str, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((true, format!("{title}: {message}")));
    }

    fn error(&self, title: &str, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((false, format!("{title}: {message}")));
    }
}

/// Client that attaches the token `t` before delegating to a [`FakeApi`].
#[derive(Debug)]
pub struct Authorized(pub Arc<FakeApi>);

impl HttpClient for Authorized {
    fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
        self.0.execute(request.with_bearer("t"))
    }
}
