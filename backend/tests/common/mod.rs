#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use backend::auth::{PasswordHasher, TokenService};
use backend::config::MIN_BCRYPT_COST;
use backend::store::MemoryStore;
use backend::{create_app, AppState};
use chrono::Duration;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";

pub fn test_app() -> Router {
    test_app_with_store(Arc::new(MemoryStore::new()))
}

pub fn test_app_with_store(store: Arc<MemoryStore>) -> Router {
    let state = AppState::new(
        store,
        TokenService::new(SECRET, Duration::hours(24)),
        PasswordHasher::new(MIN_BCRYPT_COST),
    );
    create_app(state, &[])
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::json!({}))
    }

    pub fn token(&self) -> String {
        self.json()["token"]
            .as_str()
            .expect("response should carry a token")
            .to_string()
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();

    TestResponse { status, body }
}

pub async fn register(app: &Router, username: &str, password: &str) -> TestResponse {
    send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await
}

pub async fn login(app: &Router, username: &str, password: &str) -> TestResponse {
    send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await
}
