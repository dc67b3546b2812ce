//! Registration, login, and session gating.

use axum::http::StatusCode;
use serde_json::json;

use integration_tests::{register, send, test_app};

#[tokio::test]
async fn register_logs_the_user_in() {
    let app = test_app();
    let cookie = register(&app.router, "alice").await;
    assert!(cookie.starts_with("token="));

    let (status, body, _) = send(&app.router, "GET", "/loggedIn", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loggedIn"], json!(true));
    assert_eq!(body["user"]["username"], json!("alice"));
}

#[tokio::test]
async fn list_routes_reject_missing_session() {
    let app = test_app();
    let (status, body, _) = send(&app.router, "GET", "/top5lists", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn login_accepts_email_or_username() {
    let app = test_app();
    register(&app.router, "alice").await;

    for identifier in ["alice", "alice@example.com"] {
        let (status, body, cookie) = send(
            &app.router,
            "POST",
            "/login",
            None,
            Some(json!({ "email": identifier, "password": "longenough" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert!(cookie.is_some());
    }
}

#[tokio::test]
async fn wrong_password_is_rejected_with_message() {
    let app = test_app();
    register(&app.router, "alice").await;

    let (status, body, _) = send(
        &app.router,
        "POST",
        "/login",
        None,
        Some(json!({ "email": "alice", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorMessage"], json!("That is not the correct password."));
}

#[tokio::test]
async fn unknown_identifier_is_rejected_with_message() {
    let app = test_app();
    let (status, body, _) = send(
        &app.router,
        "POST",
        "/login",
        None,
        Some(json!({ "email": "nobody", "password": "whatever1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errorMessage"],
        json!("That email or username is not registered.")
    );
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let app = test_app();
    register(&app.router, "alice").await;

    let (status, body, _) = send(
        &app.router,
        "POST",
        "/register",
        None,
        Some(json!({
            "firstName": "Other",
            "lastName": "Person",
            "username": "alice",
            "email": "other@example.com",
            "password": "longenough",
            "passwordVerify": "longenough",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errorMessage"],
        json!("An account with this username already exists.")
    );
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = test_app();
    let (status, body, cookie) = send(&app.router, "GET", "/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(cookie.as_deref(), Some("token="));
}
