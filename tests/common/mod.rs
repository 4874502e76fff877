// SPDX-License-Identifier: MIT
// Copyright 2026 GreenMatch Authors

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;

use greenmatch::config::Config;
use greenmatch::db::Database;
use greenmatch::routes::create_router;
use greenmatch::services::{Catalog, ChallengeGenerator, ProofReviewer};
use greenmatch::AppState;

/// Create a test app with an in-memory database and no Gemini client
/// (the generator runs in fallback-only mode).
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = Database::in_memory().expect("Failed to open in-memory database");
    let generator = ChallengeGenerator::new(None, Catalog::default());
    let reviewer = ProofReviewer::new(None);

    let state = Arc::new(AppState {
        config,
        db,
        generator,
        reviewer,
    });

    (create_router(state.clone()), state)
}

/// Create a session JWT for a user id.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: i64, signing_key: &[u8]) -> String {
    greenmatch::middleware::auth::create_jwt(user_id, signing_key).expect("JWT creation failed")
}

/// Send one request and return (status, parsed JSON body).
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
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

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Register a user and return a session token for them.
#[allow(dead_code)]
pub async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(serde_json::json!({
            "email": email,
            "name": "Test User",
            "password": "password123",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);
    body["token"].as_str().expect("token in response").to_string()
}

/// A profile submission body for tests.
#[allow(dead_code)]
pub fn profile_body(housing: &str, devices: &[&str], habits: &str) -> serde_json::Value {
    serde_json::json!({
        "name": "Anna",
        "age": 30,
        "country": "Germany",
        "housing": housing,
        "devices": devices,
        "motivations": ["Protect climate"],
        "habits": habits,
    })
}
