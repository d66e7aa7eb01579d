/// Common test utilities for integration tests
///
/// Builds the real router over an in-memory store so the HTTP layer can be
/// exercised without a database, and provides small request/response helpers.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tower::Service as _;
use userdesk_api::app::{build_router, AppState};
use userdesk_api::config::Config;
use userdesk_shared::repository::InMemoryUserRepository;
use userdesk_shared::service::UserService;

/// Test context containing the router and its service
pub struct TestContext {
    pub app: axum::Router,
    pub users: UserService,
}

impl TestContext {
    /// Creates a context with an empty in-memory store
    pub fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "USER_STORE" => Some("memory".to_string()),
            _ => None,
        })
        .expect("memory config should load");

        let users = UserService::new(Arc::new(InMemoryUserRepository::new()));
        let app = build_router(AppState::new(users.clone(), config));

        TestContext { app, users }
    }

    /// Sends a request without a body
    pub async fn send(&self, method: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.call(request).await
    }

    /// Sends a request with a JSON body
    pub async fn send_json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.call(request).await
    }

    /// Creates a user through the API and returns the response body
    pub async fn create_user(&self, body: Value) -> Value {
        let (status, user) = self.send_json("POST", "/api/users", body).await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", user);
        user
    }

    async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body).into_owned())
            })
        };

        (status, json)
    }
}
