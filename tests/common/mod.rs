//! Common test utilities for gateway integration tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum_test::TestServer;
use mirror_gateway::store::{DeviceId, Placement, UserConfig, UserId};
use mirror_gateway::{
    routes, AppState, BindingStore, ConfigStore, GatewayError, InMemorySessionStore,
    InMemoryUserStore, LoginAttempt, ProviderGateway, ProviderResponse, Recognition,
    RecognitionGateway,
};
use serde_json::{json, Value};

/// Recognition service double: matches are registered by the test
#[derive(Default, Clone)]
pub struct MockRecognition {
    matches: Arc<RwLock<HashMap<(String, String), UserId>>>,
    /// Every announced login attempt, in order
    pub announced: Arc<RwLock<Vec<LoginAttempt>>>,
    pub down: Arc<AtomicBool>,
}

impl MockRecognition {
    /// Make (login_token, recognition_token) resolve to a user
    pub fn recognise(&self, login_token: &str, recognition_token: &str, user_id: i64) {
        self.matches.write().unwrap().insert(
            (login_token.to_string(), recognition_token.to_string()),
            UserId(user_id),
        );
    }

    pub fn last_attempt(&self) -> Option<LoginAttempt> {
        self.announced.read().unwrap().last().cloned()
    }
}

#[async_trait]
impl RecognitionGateway for MockRecognition {
    async fn announce(&self, attempt: &LoginAttempt) -> Result<(), GatewayError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("connection refused".to_string()));
        }
        self.announced.write().unwrap().push(attempt.clone());
        Ok(())
    }

    async fn confirm(
        &self,
        login_token: &str,
        recognition_token: &str,
    ) -> Result<Recognition, GatewayError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("connection refused".to_string()));
        }
        let key = (login_token.to_string(), recognition_token.to_string());
        Ok(match self.matches.read().unwrap().get(&key) {
            Some(user_id) => Recognition::Matched(*user_id),
            None => Recognition::NoMatch,
        })
    }
}

/// Provider double with per-user login status and canned resources
#[derive(Default, Clone)]
pub struct MockProvider {
    logged_in: Arc<RwLock<HashSet<i64>>>,
    resources: Arc<RwLock<HashMap<String, (StatusCode, String)>>>,
    pub status_checks: Arc<AtomicUsize>,
    pub down: Arc<AtomicBool>,
}

impl MockProvider {
    pub fn log_in(&self, user_id: i64) {
        self.logged_in.write().unwrap().insert(user_id);
    }

    pub fn log_out(&self, user_id: i64) {
        self.logged_in.write().unwrap().remove(&user_id);
    }

    pub fn set_resource(&self, path: &str, status: StatusCode, body: &str) {
        self.resources
            .write()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub fn checks(&self) -> usize {
        self.status_checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderGateway for MockProvider {
    async fn is_logged_in(&self, user_id: UserId) -> Result<bool, GatewayError> {
        self.status_checks.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("connection refused".to_string()));
        }
        Ok(self.logged_in.read().unwrap().contains(&user_id.0))
    }

    async fn fetch(&self, resource: &str) -> Result<ProviderResponse, GatewayError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("connection refused".to_string()));
        }
        let (status, body) = self
            .resources
            .read()
            .unwrap()
            .get(resource)
            .cloned()
            .unwrap_or((StatusCode::NOT_FOUND, "no such resource".to_string()));
        Ok(ProviderResponse {
            status,
            content_type: Some("application/json".to_string()),
            body: Bytes::from(body),
        })
    }
}

pub type TestState =
    AppState<InMemoryUserStore, InMemorySessionStore, MockRecognition, MockProvider>;

pub struct TestContext {
    pub server: TestServer,
    pub state: Arc<TestState>,
    pub recognition: MockRecognition,
    pub timeline: MockProvider,
    pub mail: MockProvider,
}

/// Create a test server with in-memory stores and mock collaborators
pub fn create_test_server() -> TestContext {
    let recognition = MockRecognition::default();
    let timeline = MockProvider::default();
    let mail = MockProvider::default();

    let state = Arc::new(AppState::new(
        InMemoryUserStore::new(),
        InMemorySessionStore::new(),
        recognition.clone(),
        timeline.clone(),
        mail.clone(),
    ));

    let app = routes::create_router(state.clone());
    let server = TestServer::new(app).expect("Failed to create test server");

    TestContext {
        server,
        state,
        recognition,
        timeline,
        mail,
    }
}

impl TestContext {
    /// Provision a user: bind them to a device and store their layout
    pub fn provision(&self, device_id: i64, config: UserConfig) {
        self.state
            .user_store
            .bind(DeviceId(device_id), config.user_id)
            .unwrap();
        self.state.user_store.put_config(&config).unwrap();
    }

    /// Start a login on a device and return the login token
    pub async fn start(&self, device_id: i64) -> String {
        let response = self
            .server
            .post("/login/start_session")
            .json(&json!({ "DeviceId": device_id }))
            .await;
        assert_eq!(response.status_code(), 200);
        let body: Value = response.json();
        body["LoginToken"].as_str().expect("No login token").to_string()
    }

    /// Full login for a user; returns the confirm response body
    pub async fn login(&self, device_id: i64, user_id: i64) -> Value {
        let login_token = self.start(device_id).await;
        self.recognition.recognise(&login_token, "face", user_id);

        let response = self
            .server
            .post("/login/confirm")
            .json(&json!({
                "LoginToken": login_token,
                "RecognitionToken": "face",
            }))
            .await;
        assert_eq!(response.status_code(), 200);
        response.json()
    }

    /// Full login for a user; returns the session token
    pub async fn login_token(&self, device_id: i64, user_id: i64) -> String {
        let body = self.login(device_id, user_id).await;
        body["Token"].as_str().expect("No session token").to_string()
    }
}

/// Layout with every widget enabled
pub fn full_layout(user_id: i64) -> UserConfig {
    UserConfig {
        user_id: UserId(user_id),
        twitter: Placement::new(0, 0, 100, 50),
        gmail: Placement::new(100, 0, 80, 40),
        tasks: Placement::new(100, 40, 60, 30),
    }
}
