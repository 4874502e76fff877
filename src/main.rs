// SPDX-License-Identifier: MIT
// Copyright 2026 GreenMatch Authors

//! GreenMatch API Server
//!
//! Collects a user's sustainability profile, generates personalized
//! challenges (Gemini with a deterministic fallback), and tracks per-user
//! progress and reward points in a local SQLite store.

use greenmatch::{
    config::Config,
    db::Database,
    services::{Catalog, ChallengeGenerator, GeminiClient, ProofReviewer},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting GreenMatch API");

    // Open the SQLite database
    let db = Database::open(&config.database_path).expect("Failed to open database");

    // Load persona/company reference catalogs
    let catalog = Catalog::load_from_files(&config.personas_path, &config.companies_path)
        .expect("Failed to load reference catalogs");
    tracing::info!(
        personas = catalog.persona_count(),
        companies = catalog.company_count(),
        "Reference catalogs loaded"
    );

    // Gemini is optional: without an API key the generator runs in
    // fallback-only mode
    let gemini = config
        .gemini_api_key
        .clone()
        .map(|key| GeminiClient::new(key, config.gemini_model.clone()));
    if gemini.is_none() {
        tracing::warn!("GEMINI_API_KEY not set, challenge generation uses fallback only");
    }

    let generator = ChallengeGenerator::new(gemini.clone(), catalog);
    let reviewer = ProofReviewer::new(gemini);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        generator,
        reviewer,
    });

    // Build router
    let app = greenmatch::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("greenmatch=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
