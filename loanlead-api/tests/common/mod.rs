/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - An in-memory store with a call counter
/// - Seeded admin and non-admin users
/// - Request helpers that return status, headers and JSON/text bodies
/// - Login helper returning a ready-to-send `Cookie` header

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use loanlead_api::{
    app::{build_router, AppState},
    config::{AdminConfig, ApiConfig, Config, DatabaseConfig, SessionConfig},
};
use loanlead_shared::{
    auth::MemorySessionStore,
    models::{
        lead::{CreateLoanLead, LoanLead},
        user::{CreateUser, User},
    },
    storage::{bootstrap::ensure_default_admin, MemoryStorage, Storage, StorageResult},
};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "adminpass";
pub const STAFF_USERNAME: &str = "staff";
pub const STAFF_PASSWORD: &str = "staffpass";
pub const COOKIE_NAME: &str = "loanlead.sid";

/// [`MemoryStorage`] that counts every call made through [`Storage`]
#[derive(Clone, Default)]
pub struct CountingStorage {
    pub inner: MemoryStorage,
    calls: Arc<AtomicUsize>,
}

impl CountingStorage {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for CountingStorage {
    async fn ping(&self) -> StorageResult<()> {
        self.hit();
        self.inner.ping().await
    }

    async fn get_user(&self, id: i32) -> StorageResult<Option<User>> {
        self.hit();
        self.inner.get_user(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        self.hit();
        self.inner.get_user_by_username(username).await
    }

    async fn create_user(&self, data: CreateUser) -> StorageResult<User> {
        self.hit();
        self.inner.create_user(data).await
    }

    async fn create_lead(&self, data: CreateLoanLead) -> StorageResult<LoanLead> {
        self.hit();
        self.inner.create_lead(data).await
    }

    async fn get_lead(&self, id: i32) -> StorageResult<Option<LoanLead>> {
        self.hit();
        self.inner.get_lead(id).await
    }

    async fn list_leads(&self) -> StorageResult<Vec<LoanLead>> {
        self.hit();
        self.inner.list_leads().await
    }

    async fn list_leads_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Vec<LoanLead>> {
        self.hit();
        self.inner.list_leads_by_date_range(start, end).await
    }

    async fn list_leads_by_occupation_type(
        &self,
        occupation_type: &str,
    ) -> StorageResult<Vec<LoanLead>> {
        self.hit();
        self.inner.list_leads_by_occupation_type(occupation_type).await
    }

    async fn update_lead_status(&self, id: i32, status: &str) -> StorageResult<Option<LoanLead>> {
        self.hit();
        self.inner.update_lead_status(id, status).await
    }
}

/// Response pieces the tests look at
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    /// `name=value` part of the `Set-Cookie` header
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(COOKIE_NAME))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub storage: CountingStorage,
    pub sessions: MemorySessionStore,
    pub app: Router,
}

impl TestContext {
    /// Creates a router over a fresh store with one admin and one non-admin
    pub async fn new() -> Self {
        let storage = CountingStorage::default();

        ensure_default_admin(&storage.inner, ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .unwrap();
        storage
            .inner
            .create_user(CreateUser {
                username: STAFF_USERNAME.to_string(),
                password: STAFF_PASSWORD.to_string(),
                is_admin: false,
            })
            .await
            .unwrap();

        let sessions = MemorySessionStore::new();
        let state = AppState::new(Arc::new(storage.clone()), sessions.clone(), test_config());

        TestContext {
            storage,
            sessions,
            app: build_router(state),
        }
    }

    /// Sends one request through the router
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    /// Sends a prebuilt request
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    /// Logs in and returns the `Cookie` header value for later requests
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/login",
                Some(serde_json::json!({ "username": username, "password": password })),
                None,
            )
            .await;

        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.session_cookie().expect("login sets a session cookie")
    }

    pub async fn admin_cookie(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/unused".to_string(),
            max_connections: 1,
        },
        session: SessionConfig {
            secret: "integration-test-session-secret-32b".to_string(),
            max_age_hours: 24,
            prune_interval_secs: 86_400,
            cookie_name: COOKIE_NAME.to_string(),
        },
        admin: AdminConfig {
            username: ADMIN_USERNAME.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        },
    }
}
