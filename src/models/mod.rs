// SPDX-License-Identifier: MIT
// Copyright 2026 GreenMatch Authors

//! Data models for the application.

pub mod challenge;
pub mod profile;
pub mod state;
pub mod user;

pub use challenge::{Challenge, Difficulty};
pub use profile::{Housing, Profile};
pub use state::{RewardLevel, UserState};
pub use user::User;
