//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use sitecrew_api::{AppState, build_app};
use sitecrew_core::config::AppConfig;
use sitecrew_core::config::storage::StorageConfig;
use sitecrew_core::result::AppResult;
use sitecrew_core::traits::{PasswordHashing, Repository};
use sitecrew_entity::{User, UserRole};
use sitecrew_store::Stores;

/// Cheap reversible hasher so tests do not pay for Argon2.
struct TestHasher;

impl PasswordHashing for TestHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("test-hash:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("test-hash:{password}"))
    }

    fn is_hash(&self, value: &str) -> bool {
        value.starts_with("test-hash:")
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    pub state: AppState,
    /// Mirror directory, removed on drop
    pub dir: TempDir,
}

/// Cookie and anti-forgery token of a logged-in client.
#[derive(Debug, Clone)]
pub struct TestSession {
    pub cookie: String,
    pub csrf_token: String,
}

/// Response from a test request
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

impl TestApp {
    /// Create a new test application over an empty temporary mirror directory
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = AppConfig::default();
        config.storage = StorageConfig::rooted_at(dir.path().display().to_string());

        let hasher: Arc<dyn PasswordHashing> = Arc::new(TestHasher);
        let stores = Stores::open(&config.storage, Arc::clone(&hasher))
            .await
            .expect("Failed to open stores");
        let state = AppState::new(config, stores, hasher).expect("Failed to build state");
        let router = build_app(state.clone());

        Self { router, state, dir }
    }

    /// Insert a user directly into the store
    pub async fn create_user(&self, username: &str, password: &str, role: UserRole) -> User {
        self.state
            .stores
            .users
            .create(User::new(username, password, format!("{username} name"), role))
            .await
            .expect("Failed to create user")
    }

    /// Log in and capture the session cookie and CSRF token
    pub async fn login(&self, username: &str, password: &str) -> TestSession {
        let response = self
            .send(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "username": username, "password": password })),
                &[],
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);

        let cookie = response
            .set_cookie()
            .and_then(|c| c.split(';').next().map(str::to_string))
            .expect("Login response without cookie");
        let csrf_token = response.body["data"]["csrfToken"]
            .as_str()
            .expect("Login response without csrf token")
            .to_string();
        TestSession { cookie, csrf_token }
    }

    /// Create an admin and log in as that admin
    pub async fn admin_session(&self) -> (User, TestSession) {
        let admin = self.create_user("boss", "boss-pw", UserRole::Admin).await;
        let session = self.login("boss", "boss-pw").await;
        (admin, session)
    }

    /// Authenticated request carrying both the cookie and the CSRF header
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        session: &TestSession,
    ) -> TestResponse {
        self.send(
            method,
            path,
            body,
            &[
                ("cookie", session.cookie.as_str()),
                ("x-csrf-token", session.csrf_token.as_str()),
            ],
        )
        .await
    }

    /// Make a JSON request with explicit extra headers
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.send_raw(method, path, "application/json", body_str, headers)
            .await
    }

    /// Make a request with a pre-encoded body, e.g. an HTML form post
    pub async fn send_raw(
        &self,
        method: &str,
        path: &str,
        content_type: &str,
        body_str: String,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", content_type);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
