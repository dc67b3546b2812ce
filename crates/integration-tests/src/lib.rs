//! Shared harness for the HTTP-level test suites.
//!
//! Builds the full axum router over the in-memory store so every test runs
//! without external services, and drives it with `tower::ServiceExt`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;

use api_adapters::AppState;
use auth_adapters::JwtAuthProvider;
use domains::{AuthProvider, CommunityRepo, ListRepo, UserRepo};
use services::{AggregationEngine, CommunityService, ListService, UserService};
use storage_adapters::MemoryStore;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub fn test_app() -> TestApp {
    let store = MemoryStore::new();
    let auth: Arc<dyn AuthProvider> = Arc::new(JwtAuthProvider::new(
        SecretString::from("integration-secret".to_string()),
        24,
    ));
    let user_repo: Arc<dyn UserRepo> = store.clone();
    let list_repo: Arc<dyn ListRepo> = store.clone();
    let community_repo: Arc<dyn CommunityRepo> = store.clone();

    let engine = Arc::new(AggregationEngine::new(
        list_repo.clone(),
        community_repo.clone(),
    ));
    let state = AppState {
        users: Arc::new(UserService::new(user_repo.clone(), auth.clone())),
        user_repo,
        auth,
        lists: Arc::new(ListService::new(list_repo, engine)),
        community: Arc::new(CommunityService::new(community_repo)),
    };
    TestApp {
        router: api_adapters::router(state),
        store,
    }
}

/// Fires one request and returns (status, parsed body, session cookie if set).
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value, Option<String>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value, set_cookie)
}

/// Registers a user and returns the `token=...` cookie pair.
pub async fn register(router: &Router, username: &str) -> String {
    let (status, _, cookie) = send(
        router,
        "POST",
        "/register",
        None,
        Some(json!({
            "firstName": "Test",
            "lastName": "User",
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "longenough",
            "passwordVerify": "longenough",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    cookie.expect("register sets the session cookie")
}

/// Creates a list owned by the cookie's user and returns its id.
pub async fn create_list(router: &Router, cookie: &str, name: &str) -> String {
    let (status, body, _) = send(
        router,
        "POST",
        "/top5list",
        Some(cookie),
        Some(json!({
            "name": name,
            "items": ["?", "?", "?", "?", "?"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["top5List"]["id"].as_str().unwrap().to_string()
}

/// Publishes a list under `name` with the given items.
pub async fn publish_list(router: &Router, cookie: &str, id: &str, name: &str, items: [&str; 5]) {
    let (status, body, _) = send(
        router,
        "PUT",
        &format!("/top5list/{id}"),
        Some(cookie),
        Some(json!({
            "name": name,
            "items": items,
            "published": true,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "publish failed: {body}");
}
