// SPDX-License-Identifier: MIT
// Copyright 2026 GreenMatch Authors

//! Services module - business logic layer.

pub mod catalog;
pub mod gemini;
pub mod generator;
pub mod review;

pub use catalog::{Catalog, CatalogError};
pub use gemini::{GeminiClient, GeminiError};
pub use generator::{extract_json_block, fallback_challenges, ChallengeGenerator, ParseError};
pub use review::ProofReviewer;
