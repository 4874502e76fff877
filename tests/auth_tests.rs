// SPDX-License-Identifier: MIT
// Copyright 2026 GreenMatch Authors

//! Registration and login tests.

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_register_creates_account_and_session() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(serde_json::json!({
            "email": "anna@example.com",
            "name": "Anna",
            "password": "password123",
            "confirm_password": "password123",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user_id"].as_i64().is_some());
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_case_insensitively() {
    let (app, _state) = common::create_test_app();
    common::register(&app, "anna@example.com").await;

    // Same address with different case and surrounding whitespace
    let (status, body) = common::send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(serde_json::json!({
            "email": "  Anna@EXAMPLE.com ",
            "name": "Other",
            "password": "different456",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate_email");
}

#[tokio::test]
async fn test_register_requires_email_and_password() {
    let (app, _state) = common::create_test_app();

    for payload in [
        serde_json::json!({"email": "", "password": "password123"}),
        serde_json::json!({"email": "   ", "password": "password123"}),
        serde_json::json!({"email": "anna@example.com", "password": ""}),
    ] {
        let (status, body) =
            common::send(&app, "POST", "/auth/register", None, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_input");
    }
}

#[tokio::test]
async fn test_register_rejects_password_mismatch() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(serde_json::json!({
            "email": "anna@example.com",
            "password": "password123",
            "confirm_password": "password124",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let (app, _state) = common::create_test_app();
    common::register(&app, "anna@example.com").await;

    let (status, body) = common::send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(serde_json::json!({
            "email": "anna@example.com",
            "password": "wrong-password",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
async fn test_login_rejects_unknown_email() {
    let (app, _state) = common::create_test_app();

    let (status, _body) = common::send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(serde_json::json!({
            "email": "nobody@example.com",
            "password": "password123",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_token_authenticates_api_requests() {
    let (app, _state) = common::create_test_app();
    common::register(&app, "anna@example.com").await;

    let (status, body) = common::send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(serde_json::json!({
            "email": "Anna@Example.com",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = common::send(&app, "GET", "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "anna@example.com");
    assert_eq!(me["reward_points"], 0);
    assert_eq!(me["reward_level"], "Getting started");
}

#[tokio::test]
async fn test_api_requires_authentication() {
    let (app, _state) = common::create_test_app();

    let (status, _body) = common::send(&app, "GET", "/api/state", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _body) =
        common::send(&app, "GET", "/api/me", Some("not-a-valid-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
