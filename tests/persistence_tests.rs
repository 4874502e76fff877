// SPDX-License-Identifier: MIT
// Copyright 2026 GreenMatch Authors

//! User-state store round-trip tests against the in-memory database.

use std::collections::HashSet;

use greenmatch::db::Database;
use greenmatch::models::{Challenge, Difficulty, Housing, Profile, UserState};

fn full_state() -> UserState {
    let challenges = vec![
        Challenge {
            id: "heat_1c".to_string(),
            title: "Lower room temperature by 1\u{b0}C".to_string(),
            description: "Keep rooms cooler.".to_string(),
            difficulty: Difficulty::Easy,
            estimated_monthly_co2_saving_kg: 20.0,
            why_it_fits: "Low effort.".to_string(),
        },
        Challenge {
            id: "night_charging".to_string(),
            title: "Charge your EV mainly at night".to_string(),
            description: "Shift charging to off-peak hours.".to_string(),
            difficulty: Difficulty::Medium,
            estimated_monthly_co2_saving_kg: 30.0,
            why_it_fits: "You own an EV.".to_string(),
        },
    ];

    UserState {
        profile: Some(Profile {
            name: "Anna".to_string(),
            age: 30,
            country: "Germany".to_string(),
            housing: Housing::House,
            devices: vec!["Electric car (EV)".to_string()],
            motivations: vec!["Save money".to_string(), "Protect climate".to_string()],
            custom_motivation: None,
            habits: "I commute by car".to_string(),
        }),
        challenges,
        accepted_ids: HashSet::from(["heat_1c".to_string(), "night_charging".to_string()]),
        completed_ids: HashSet::from(["heat_1c".to_string()]),
        reward_points: 42,
    }
}

#[test]
fn test_state_round_trip_is_field_for_field_equal() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("anna@example.com", "Anna", "hash").unwrap();

    let state = full_state();
    db.save_state(user_id, &state).unwrap();

    let loaded = db.load_state(user_id).unwrap().expect("state should exist");
    assert_eq!(loaded, state);
}

#[test]
fn test_absent_state_loads_as_none() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("anna@example.com", "Anna", "hash").unwrap();

    assert!(db.load_state(user_id).unwrap().is_none());
    // Unknown user ids behave the same way
    assert!(db.load_state(9999).unwrap().is_none());
}

#[test]
fn test_save_overwrites_every_field() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("anna@example.com", "Anna", "hash").unwrap();

    db.save_state(user_id, &full_state()).unwrap();

    // A later save with emptied-out state replaces everything
    let mut emptied = UserState::default();
    emptied.reward_points = 42; // points carry over, the rest is reset
    db.save_state(user_id, &emptied).unwrap();

    let loaded = db.load_state(user_id).unwrap().unwrap();
    assert!(loaded.profile.is_none());
    assert!(loaded.challenges.is_empty());
    assert!(loaded.accepted_ids.is_empty());
    assert!(loaded.completed_ids.is_empty());
    assert_eq!(loaded.reward_points, 42);
}

#[test]
fn test_states_are_isolated_per_user() {
    let db = Database::in_memory().unwrap();
    let anna = db.create_user("anna@example.com", "Anna", "hash").unwrap();
    let ben = db.create_user("ben@example.com", "Ben", "hash").unwrap();

    db.save_state(anna, &full_state()).unwrap();

    assert!(db.load_state(ben).unwrap().is_none());
}
