// SPDX-License-Identifier: MIT
// Copyright 2026 GreenMatch Authors

//! GreenMatch: a personal sustainability coach backend.
//!
//! This crate provides the API for collecting a user's sustainability
//! profile, generating personalized challenges (Gemini with a
//! deterministic fallback), and tracking per-user progress and rewards.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Database;
use services::{ChallengeGenerator, ProofReviewer};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub generator: ChallengeGenerator,
    pub reviewer: ProofReviewer,
}
