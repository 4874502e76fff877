// SPDX-License-Identifier: MIT
// Copyright 2026 GreenMatch Authors

//! Registration and login routes.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::user::normalize_email;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub password: String,
    /// Optional confirmation field from the registration form
    #[serde(default)]
    pub confirm_password: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub user_id: i64,
    pub token: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub token: String,
}

/// Create an account.
///
/// The email is normalized (trimmed, lowercased) before the uniqueness
/// check, so addresses differing only by case or whitespace collide.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<RegisterResponse>)> {
    let email = normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidInput(
            "email and password are required".to_string(),
        ));
    }
    if let Some(confirm) = &req.confirm_password {
        if confirm != &req.password {
            return Err(AppError::InvalidInput(
                "passwords do not match".to_string(),
            ));
        }
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
        .to_string();

    // Single atomic insert; a unique-constraint conflict surfaces as
    // DuplicateEmail without leaving partial state behind
    let user_id = state
        .db
        .create_user(&email, req.name.trim(), &password_hash)?;

    tracing::info!(user_id, "User registered");

    let token = create_jwt(user_id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(token.clone())),
        Json(RegisterResponse { user_id, token }),
    ))
}

/// Authenticate and start a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let email = normalize_email(&req.email);

    let user = state
        .db
        .get_user_by_email(&email)?
        .ok_or(AppError::InvalidCredentials)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored hash is invalid: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredentials)?;

    let token = create_jwt(user.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        jar.add(session_cookie(token.clone())),
        Json(LoginResponse {
            user_id: user.id,
            email: user.email,
            name: user.name,
            token,
        }),
    ))
}

/// End the session by clearing the cookie.
async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        jar.remove(Cookie::from(SESSION_COOKIE)),
        StatusCode::NO_CONTENT,
    )
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build()
}
