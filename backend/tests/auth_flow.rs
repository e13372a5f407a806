mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use backend::auth::{FixedClock, TokenService};
use backend::store::MemoryStore;
use chrono::{Duration, Utc};
use common::{login, register, send, test_app, test_app_with_store, SECRET};
use uuid::Uuid;

#[tokio::test]
async fn test_end_to_end_register_login_and_access() {
    let app = test_app();

    let registered = register(&app, "alice", "secret").await;
    assert_eq!(registered.status, StatusCode::CREATED);
    assert_eq!(registered.json()["message"], "User created successfully");
    let register_token = registered.token();
    assert!(!register_token.is_empty());

    let logged_in = login(&app, "alice", "secret").await;
    assert_eq!(logged_in.status, StatusCode::OK);
    assert_eq!(logged_in.json()["message"], "Logged in successfully");
    let token = logged_in.token();

    let todos = send(&app, Method::GET, "/api/todos", Some(&token), None).await;
    assert_eq!(todos.status, StatusCode::OK);
    assert_eq!(todos.json(), serde_json::json!([]));

    // The registration token is just as good.
    let todos = send(&app, Method::GET, "/api/todos", Some(&register_token), None).await;
    assert_eq!(todos.status, StatusCode::OK);

    let anonymous = send(&app, Method::GET, "/api/todos", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_response_never_echoes_password() {
    let app = test_app();
    let response = register(&app, "alice", "super-secret-pw").await;

    let body = String::from_utf8(response.body.clone()).unwrap();
    assert!(!body.contains("super-secret-pw"));
    assert!(!body.contains("$2b$"));
    assert!(response.json().get("password").is_none());
}

#[tokio::test]
async fn test_duplicate_username_rejected_regardless_of_password() {
    let app = test_app();
    assert_eq!(register(&app, "alice", "secret").await.status, StatusCode::CREATED);

    for password in ["secret", "another-password", "x"] {
        let response = register(&app, "alice", password).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.json()["message"], "Username already exists");
        assert_eq!(response.json()["error"], "duplicate_username");
    }

    // The first password still works.
    assert_eq!(login(&app, "alice", "secret").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_credentials() {
    let app = test_app();

    let cases = [
        Some(serde_json::json!({ "username": "alice" })),
        Some(serde_json::json!({ "password": "secret" })),
        Some(serde_json::json!({ "username": "", "password": "secret" })),
        Some(serde_json::json!({})),
        None,
    ];

    for uri in ["/api/auth/register", "/api/auth/login"] {
        for body in cases.iter().cloned() {
            let response = send(&app, Method::POST, uri, None, body).await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(
                response.json()["message"],
                "Username and password are required"
            );
        }
    }
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = test_app();
    register(&app, "alice", "secret").await;

    let wrong_password = login(&app, "alice", "not-the-password").await;
    let unknown_user = login(&app, "mallory", "secret").await;

    assert_eq!(wrong_password.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password.status, unknown_user.status);
    assert_eq!(wrong_password.body, unknown_user.body);
    assert_eq!(wrong_password.json()["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_usernames_are_case_sensitive() {
    let app = test_app();
    register(&app, "alice", "secret").await;

    assert_eq!(login(&app, "Alice", "secret").await.status, StatusCode::BAD_REQUEST);
    assert_eq!(register(&app, "Alice", "secret").await.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_logout_always_succeeds_and_does_not_revoke() {
    let app = test_app();
    let token = register(&app, "alice", "secret").await.token();

    let response = send(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["message"], "Logged out successfully");

    let anonymous = send(&app, Method::POST, "/api/auth/logout", None, None).await;
    assert_eq!(anonymous.status, StatusCode::OK);

    // Stateless tokens: still valid after logout until they expire.
    let todos = send(&app, Method::GET, "/api/todos", Some(&token), None).await;
    assert_eq!(todos.status, StatusCode::OK);
}

#[tokio::test]
async fn test_protected_route_rejections() {
    let app = test_app();

    let missing = send(&app, Method::GET, "/api/todos", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.json()["message"], "Authentication token required");

    let garbage = send(&app, Method::GET, "/api/todos", Some("garbage"), None).await;
    assert_eq!(garbage.status, StatusCode::FORBIDDEN);
    assert_eq!(garbage.json()["message"], "Invalid or expired token");

    let yesterday = Utc::now() - Duration::hours(25);
    let expired = TokenService::with_clock(SECRET, Duration::hours(24), Arc::new(FixedClock(yesterday)))
        .issue(Uuid::new_v4())
        .unwrap();
    let response = send(&app, Method::GET, "/api/todos", Some(&expired), None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.json()["message"], "Invalid or expired token");

    let forged = TokenService::new("some-other-secret", Duration::hours(24))
        .issue(Uuid::new_v4())
        .unwrap();
    let response = send(&app, Method::GET, "/api/todos", Some(&forged), None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rejected_requests_do_not_reach_handlers() {
    let store = Arc::new(MemoryStore::new());
    let app = test_app_with_store(store.clone());
    let owner = Uuid::new_v4();

    let response = send(
        &app,
        Method::POST,
        "/api/todos",
        Some("garbage"),
        Some(serde_json::json!({ "title": "should not exist" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // A token for `owner` that the app would accept, to prove nothing was stored.
    let token = TokenService::new(SECRET, Duration::hours(24)).issue(owner).unwrap();
    let todos = send(&app, Method::GET, "/api/todos", Some(&token), None).await;
    assert_eq!(todos.json(), serde_json::json!([]));
}

#[tokio::test]
async fn test_concurrent_registrations_admit_one() {
    let store = Arc::new(MemoryStore::new());
    let app = test_app_with_store(store.clone());

    let first = {
        let app = app.clone();
        tokio::spawn(async move { register(&app, "bob", "first").await.status })
    };
    let second = {
        let app = app.clone();
        tokio::spawn(async move { register(&app, "bob", "second").await.status })
    };

    let mut statuses = vec![first.await.unwrap(), second.await.unwrap()];
    statuses.sort();

    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::BAD_REQUEST]);
    assert_eq!(store.user_count().await, 1);
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app();
    let response = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_overlong_username_rejected_before_store() {
    let store = Arc::new(MemoryStore::new());
    let app = test_app_with_store(store.clone());

    let response = register(&app, &"a".repeat(256), "secret").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "bad_request");
    assert!(response.json()["message"]
        .as_str()
        .is_some_and(|m| m.contains("at most 255 characters")));
    assert_eq!(store.user_count().await, 0);

    let at_limit = register(&app, &"a".repeat(255), "secret").await;
    assert_eq!(at_limit.status, StatusCode::CREATED);
}
