//! Per-user aggregate state and the challenge lifecycle.
//!
//! A challenge moves through `proposed -> accepted -> completed`, with a
//! fixed point award on acceptance and a CO2-scaled award on completion.
//! Derived metrics (potential CO2 saving, reward level) are recomputed on
//! every read and never persisted.

use serde::Serialize;
use std::collections::HashSet;

use crate::models::{Challenge, Profile};

/// Points awarded for accepting a challenge.
pub const ACCEPT_POINTS: u32 = 3;
/// Minimum points awarded for completing a challenge.
pub const MIN_COMPLETION_POINTS: u32 = 5;
/// Completion award is the CO2 saving divided by this, floored.
const COMPLETION_DIVISOR: f64 = 5.0;

/// The aggregate persisted per user, always written and read as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    /// Absent until the first profile submission
    pub profile: Option<Profile>,
    /// Current challenge list (possibly empty)
    pub challenges: Vec<Challenge>,
    /// Ids of challenges the user has accepted
    pub accepted_ids: HashSet<String>,
    /// Ids of challenges the user has marked completed
    pub completed_ids: HashSet<String>,
    /// Cumulative reward points; never decreases
    pub reward_points: u32,
}

impl UserState {
    /// Accept a challenge.
    ///
    /// Valid only for an id present in the current challenge list and not
    /// already accepted. Awards a fixed point bonus on the first accept.
    ///
    /// Returns `true` if state changed, `false` for a repeat accept or an
    /// id outside the current list.
    pub fn accept(&mut self, id: &str) -> bool {
        if !self.challenges.iter().any(|c| c.id == id) {
            return false;
        }
        if !self.accepted_ids.insert(id.to_string()) {
            return false;
        }
        self.reward_points += ACCEPT_POINTS;
        true
    }

    /// Mark an accepted challenge as completed.
    ///
    /// Valid only for an id that is currently accepted and not yet
    /// completed, which keeps `completed_ids` a subset of `accepted_ids`.
    /// Awards `max(5, floor(co2_kg / 5))` points.
    ///
    /// Returns `true` if state changed.
    pub fn complete(&mut self, id: &str) -> bool {
        if !self.accepted_ids.contains(id) {
            return false;
        }
        if !self.completed_ids.insert(id.to_string()) {
            return false;
        }
        let co2_kg = self
            .challenges
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.estimated_monthly_co2_saving_kg)
            .unwrap_or(0.0);
        self.reward_points += completion_points(co2_kg);
        true
    }

    /// Replace the challenge list after regeneration.
    ///
    /// Clears both id sets; accumulated reward points are never revoked.
    pub fn replace_challenges(&mut self, challenges: Vec<Challenge>) {
        self.challenges = challenges;
        self.accepted_ids.clear();
        self.completed_ids.clear();
    }

    /// Sum of estimated monthly CO2 savings over accepted challenges.
    ///
    /// Completion does not matter here; an id in `completed_ids` that was
    /// never accepted (malformed external state) is not counted.
    pub fn potential_monthly_co2(&self) -> f64 {
        self.challenges
            .iter()
            .filter(|c| self.accepted_ids.contains(&c.id))
            .map(|c| c.estimated_monthly_co2_saving_kg)
            .sum()
    }

    /// The reward tier for the current point total.
    pub fn reward_level(&self) -> RewardLevel {
        RewardLevel::from_points(self.reward_points)
    }
}

/// Points for completing a challenge with the given CO2 saving.
fn completion_points(co2_kg: f64) -> u32 {
    let scaled = (co2_kg / COMPLETION_DIVISOR).floor();
    if scaled.is_finite() && scaled > f64::from(MIN_COMPLETION_POINTS) {
        scaled as u32
    } else {
        MIN_COMPLETION_POINTS
    }
}

/// Cosmetic reward tier, a step function of the point total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RewardLevel {
    GettingStarted,
    EcoStarter,
    ImpactExplorer,
    PlanetHero,
}

impl RewardLevel {
    /// Tier thresholds, evaluated highest first.
    pub fn from_points(points: u32) -> Self {
        if points >= 150 {
            RewardLevel::PlanetHero
        } else if points >= 80 {
            RewardLevel::ImpactExplorer
        } else if points >= 30 {
            RewardLevel::EcoStarter
        } else {
            RewardLevel::GettingStarted
        }
    }

    /// Display label shown next to the point counter.
    pub fn label(&self) -> &'static str {
        match self {
            RewardLevel::PlanetHero => "Planet Hero",
            RewardLevel::ImpactExplorer => "Impact Explorer",
            RewardLevel::EcoStarter => "Eco Starter",
            RewardLevel::GettingStarted => "Getting started",
        }
    }
}
