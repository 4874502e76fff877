//! A generated sustainability challenge.

use serde::{Deserialize, Serialize};

/// Challenge difficulty, as produced by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Advanced,
}

/// A single suggested sustainability action.
///
/// The `id` is unique within the owning user's current challenge list,
/// not globally. A full list is created atomically on each profile
/// submission and wholesale replaces the previous one; individual
/// challenges are never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    /// Rough monthly CO2 saving in kg; expected positive, nominally
    /// 3-100, not hard-enforced
    pub estimated_monthly_co2_saving_kg: f64,
    /// Why this challenge suits this user
    pub why_it_fits: String,
}
