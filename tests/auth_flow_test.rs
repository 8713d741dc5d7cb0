// ABOUTME: Integration tests for registration, login, and password change
// ABOUTME: Drives the full router over an in-memory database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use axum::http::StatusCode;
use helpers::axum_test::AxumTestRequest;
use helpers::test_utils::{create_test_resources, seed_user, token_for, TEST_PASSWORD};
use ladle::server::LadleServer;
use serde_json::{json, Value};

fn register_body(email: &str, username: &str) -> Value {
    json!({
        "email": email,
        "username": username,
        "first_name": "Julia",
        "last_name": "Child",
        "password": "beurre-blanc-52",
    })
}

#[tokio::test]
async fn test_register_login_me_round_trip() {
    let (resources, _media) = create_test_resources().await.unwrap();
    let app = LadleServer::router(&resources);

    let profile: Value = AxumTestRequest::post("/api/users")
        .json(&register_body("julia@example.com", "julia"))
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(profile["email"], "julia@example.com");
    assert_eq!(profile["username"], "julia");
    assert_eq!(profile["is_subscribed"], false);
    assert!(profile.get("password").is_none());
    assert!(profile.get("password_hash").is_none());

    let login: Value = AxumTestRequest::post("/api/auth/login")
        .json(&json!({"email": "julia@example.com", "password": "beurre-blanc-52"}))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let token = login["auth_token"].as_str().unwrap().to_owned();
    assert!(!token.is_empty());
    assert!(login["expires_at"].as_str().is_some());
    assert_eq!(login["user"]["username"], "julia");

    let me: Value = AxumTestRequest::get("/api/users/me")
        .bearer(&token)
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(me["email"], "julia@example.com");
    assert_eq!(me["id"], profile["id"]);
}

#[tokio::test]
async fn test_register_rejects_duplicate_email_and_username() {
    let (resources, _media) = create_test_resources().await.unwrap();
    let app = LadleServer::router(&resources);

    AxumTestRequest::post("/api/users")
        .json(&register_body("julia@example.com", "julia"))
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED);

    // Same email, different username
    let body: Value = AxumTestRequest::post("/api/users")
        .json(&register_body("julia@example.com", "julia2"))
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");

    // Same username, different email
    let body: Value = AxumTestRequest::post("/api/users")
        .json(&register_body("other@example.com", "julia"))
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_register_field_validation() {
    let (resources, _media) = create_test_resources().await.unwrap();
    let app = LadleServer::router(&resources);

    // Unusable email
    AxumTestRequest::post("/api/users")
        .json(&json!({
            "email": "not-an-email",
            "username": "julia",
            "first_name": "Julia",
            "last_name": "Child",
            "password": "beurre-blanc-52",
        }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Password below the minimum length
    AxumTestRequest::post("/api/users")
        .json(&json!({
            "email": "julia@example.com",
            "username": "julia",
            "first_name": "Julia",
            "last_name": "Child",
            "password": "short",
        }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Username with characters outside the allowed set
    AxumTestRequest::post("/api/users")
        .json(&json!({
            "email": "julia@example.com",
            "username": "julia child",
            "first_name": "Julia",
            "last_name": "Child",
            "password": "beurre-blanc-52",
        }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Empty first name
    AxumTestRequest::post("/api/users")
        .json(&json!({
            "email": "julia@example.com",
            "username": "julia",
            "first_name": "",
            "last_name": "Child",
            "password": "beurre-blanc-52",
        }))
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (resources, _media) = create_test_resources().await.unwrap();
    seed_user(&resources, "julia@example.com", "julia")
        .await
        .unwrap();
    let app = LadleServer::router(&resources);

    let body: Value = AxumTestRequest::post("/api/auth/login")
        .json(&json!({"email": "julia@example.com", "password": "wrong-password"}))
        .send(app.clone())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["error"]["code"], "AUTH_INVALID");

    // Unknown email gets the same answer as a wrong password
    let body: Value = AxumTestRequest::post("/api/auth/login")
        .json(&json!({"email": "nobody@example.com", "password": "wrong-password"}))
        .send(app)
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["error"]["code"], "AUTH_INVALID");
}

#[tokio::test]
async fn test_me_requires_valid_token() {
    let (resources, _media) = create_test_resources().await.unwrap();
    let app = LadleServer::router(&resources);

    AxumTestRequest::get("/api/users/me")
        .send(app.clone())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    AxumTestRequest::get("/api/users/me")
        .bearer("not-a-jwt")
        .send(app)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_set_password_rotates_credentials() {
    let (resources, _media) = create_test_resources().await.unwrap();
    let user = seed_user(&resources, "julia@example.com", "julia")
        .await
        .unwrap();
    let token = token_for(&resources, &user);
    let app = LadleServer::router(&resources);

    AxumTestRequest::post("/api/users/set_password")
        .bearer(&token)
        .json(&json!({
            "current_password": TEST_PASSWORD,
            "new_password": "new-password-123",
        }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // Old password no longer works
    AxumTestRequest::post("/api/auth/login")
        .json(&json!({"email": "julia@example.com", "password": TEST_PASSWORD}))
        .send(app.clone())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // New password does
    AxumTestRequest::post("/api/auth/login")
        .json(&json!({"email": "julia@example.com", "password": "new-password-123"}))
        .send(app)
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_set_password_rejects_wrong_current() {
    let (resources, _media) = create_test_resources().await.unwrap();
    let user = seed_user(&resources, "julia@example.com", "julia")
        .await
        .unwrap();
    let token = token_for(&resources, &user);
    let app = LadleServer::router(&resources);

    let body: Value = AxumTestRequest::post("/api/users/set_password")
        .bearer(&token)
        .json(&json!({
            "current_password": "not-the-password",
            "new_password": "new-password-123",
        }))
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}
