// SPDX-License-Identifier: MIT
// Copyright 2026 GreenMatch Authors

//! API routes for authenticated users.
//!
//! Every handler is one synchronous unit of work: load the user's state,
//! mutate it in memory, write it back, respond. Derived metrics are
//! recomputed on every read and never persisted.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Challenge, Difficulty, Profile, UserState};
use crate::AppState;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/state", get(get_state))
        .route("/api/profile", put(submit_profile))
        .route("/api/challenges/{id}/accept", post(accept_challenge))
        .route("/api/challenges/{id}/complete", post(complete_challenge))
        .route("/api/challenges/{id}/review", post(review_proof))
}

// ─── Responses ───────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub reward_points: u32,
    pub reward_level: String,
}

/// A challenge annotated with the user's progress on it.
#[derive(Serialize)]
pub struct ChallengeView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub estimated_monthly_co2_saving_kg: f64,
    pub why_it_fits: String,
    pub accepted: bool,
    pub completed: bool,
}

/// The full dashboard payload.
#[derive(Serialize)]
pub struct DashboardResponse {
    pub profile: Option<Profile>,
    pub challenges: Vec<ChallengeView>,
    pub accepted_count: usize,
    pub completed_count: usize,
    /// Sum of savings over accepted challenges, recomputed on every read
    pub potential_monthly_co2_kg: f64,
    pub reward_points: u32,
    pub reward_level: String,
}

fn dashboard(state: &UserState) -> DashboardResponse {
    let challenges = state
        .challenges
        .iter()
        .map(|c| ChallengeView {
            id: c.id.clone(),
            title: c.title.clone(),
            description: c.description.clone(),
            difficulty: c.difficulty,
            estimated_monthly_co2_saving_kg: c.estimated_monthly_co2_saving_kg,
            why_it_fits: c.why_it_fits.clone(),
            accepted: state.accepted_ids.contains(&c.id),
            completed: state.completed_ids.contains(&c.id),
        })
        .collect();

    DashboardResponse {
        profile: state.profile.clone(),
        challenges,
        accepted_count: state.accepted_ids.len(),
        completed_count: state.completed_ids.len(),
        potential_monthly_co2_kg: state.potential_monthly_co2(),
        reward_points: state.reward_points,
        reward_level: state.reward_level().label().to_string(),
    }
}

/// Load a user's state, substituting the empty default when the user has
/// never saved anything.
fn load_or_default(state: &AppState, user_id: i64) -> Result<UserState> {
    Ok(state.db.load_state(user_id)?.unwrap_or_default())
}

// ─── User ────────────────────────────────────────────────────

/// Get the current user's identity and reward summary.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let account = state
        .db
        .get_user_by_id(user.user_id)?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    let user_state = load_or_default(&state, user.user_id)?;

    Ok(Json(MeResponse {
        user_id: account.id,
        email: account.email,
        name: account.name,
        reward_points: user_state.reward_points,
        reward_level: user_state.reward_level().label().to_string(),
    }))
}

/// Get the full dashboard for the current user.
async fn get_state(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>> {
    let user_state = load_or_default(&state, user.user_id)?;
    Ok(Json(dashboard(&user_state)))
}

// ─── Profile Submission ──────────────────────────────────────

/// Submit (or resubmit) the profile and regenerate challenges.
///
/// The new challenge list wholesale replaces the previous one and both
/// accepted/completed sets are reset; reward points already earned are
/// kept.
async fn submit_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(mut profile): Json<Profile>,
) -> Result<Json<DashboardResponse>> {
    profile
        .validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    profile.fold_custom_motivation();

    tracing::info!(user_id = user.user_id, "Generating challenges");
    let challenges = state.generator.generate(&profile).await;

    let mut user_state = load_or_default(&state, user.user_id)?;
    user_state.profile = Some(profile);
    user_state.replace_challenges(challenges);

    state.db.save_state(user.user_id, &user_state)?;

    Ok(Json(dashboard(&user_state)))
}

// ─── Challenge Lifecycle ─────────────────────────────────────

/// Accept a challenge (+3 points, once).
///
/// A repeat accept is a no-op that still returns the dashboard; the id
/// must belong to the current challenge list.
async fn accept_challenge(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DashboardResponse>> {
    let mut user_state = load_or_default(&state, user.user_id)?;
    require_known_challenge(&user_state, &id)?;

    if user_state.accept(&id) {
        state.db.save_state(user.user_id, &user_state)?;
        tracing::info!(user_id = user.user_id, challenge = %id, "Challenge accepted");
    }

    Ok(Json(dashboard(&user_state)))
}

/// Mark an accepted challenge as completed (CO2-scaled points, once).
///
/// Completing before accepting is a no-op; the id must belong to the
/// current challenge list.
async fn complete_challenge(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DashboardResponse>> {
    let mut user_state = load_or_default(&state, user.user_id)?;
    require_known_challenge(&user_state, &id)?;

    if user_state.complete(&id) {
        state.db.save_state(user.user_id, &user_state)?;
        tracing::info!(user_id = user.user_id, challenge = %id, "Challenge completed");
    }

    Ok(Json(dashboard(&user_state)))
}

fn require_known_challenge(user_state: &UserState, id: &str) -> Result<()> {
    if !user_state.challenges.iter().any(|c| c.id == id) {
        return Err(AppError::NotFound(format!("Challenge {} not found", id)));
    }
    Ok(())
}

// ─── Proof Review ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ProofRequest {
    /// Base64-encoded image data
    pub image_base64: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
}

fn default_mime_type() -> String {
    "image/jpeg".to_string()
}

#[derive(Serialize)]
pub struct ProofReviewResponse {
    /// Opaque natural-language commentary, never parsed
    pub feedback: String,
}

/// Ask the model whether an uploaded photo plausibly relates to a
/// challenge.
async fn review_proof(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(req): Json<ProofRequest>,
) -> Result<Json<ProofReviewResponse>> {
    let user_state = load_or_default(&state, user.user_id)?;
    let challenge: &Challenge = user_state
        .challenges
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Challenge {} not found", id)))?;

    if BASE64.decode(&req.image_base64).is_err() {
        return Err(AppError::BadRequest(
            "image_base64 is not valid base64".to_string(),
        ));
    }

    let feedback = state
        .reviewer
        .review(challenge, &req.mime_type, &req.image_base64)
        .await;

    Ok(Json(ProofReviewResponse { feedback }))
}
