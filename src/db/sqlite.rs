// SPDX-License-Identifier: MIT
// Copyright 2026 GreenMatch Authors

//! SQLite store with typed operations.
//!
//! Two tables:
//! - `users`: identity + password verifier, unique normalized email
//! - `user_state`: one row per user holding the serialized profile,
//!   challenge list, id sets, and the integer reward-point total
//!
//! The per-user state row is always written and read as a whole; saves
//! are single-statement upserts.

use rusqlite::{Connection, OptionalExtension};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use crate::error::AppError;
use crate::models::{Challenge, Profile, User, UserState};

/// SQLite database client.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (creating if needed) the database at `path` and run migrations.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(db_err)?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(db_err)?;

        migrate(&conn)?;

        tracing::info!(path = %path.as_ref().display(), "Database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database for tests.
    pub fn in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Connection) -> Result<T, AppError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| AppError::Database(format!("DB lock poisoned: {}", e)))?;
        f(&conn)
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Insert a new user, returning the assigned id.
    ///
    /// `email` must already be normalized. A unique-constraint violation
    /// maps to `DuplicateEmail`; the insert is a single statement, so a
    /// conflict leaves no partial state behind.
    pub fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<i64, AppError> {
        self.with_conn(|conn| {
            let created_at = chrono::Utc::now().to_rfc3339();
            conn.execute(
                "INSERT INTO users (email, name, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                (email, name, password_hash, created_at),
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    AppError::DuplicateEmail
                }
                other => db_err(other),
            })?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Look up a user by normalized email.
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, email, name, password_hash, created_at
                 FROM users WHERE email = ?1",
                [email],
                user_from_row,
            )
            .optional()
            .map_err(db_err)
        })
    }

    /// Look up a user by id.
    pub fn get_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, email, name, password_hash, created_at
                 FROM users WHERE id = ?1",
                [id],
                user_from_row,
            )
            .optional()
            .map_err(db_err)
        })
    }

    // ─── User State Operations ───────────────────────────────────

    /// Load the state row for a user.
    ///
    /// Returns `None` when the user has never saved state; the caller is
    /// responsible for substituting `UserState::default()`.
    pub fn load_state(&self, user_id: i64) -> Result<Option<UserState>, AppError> {
        self.with_conn(|conn| {
            let row: Option<StateRow> = conn
                .query_row(
                    "SELECT profile_json, challenges_json, accepted_ids_json,
                            completed_ids_json, reward_points
                     FROM user_state WHERE user_id = ?1",
                    [user_id],
                    |row| {
                        Ok(StateRow {
                            profile_json: row.get(0)?,
                            challenges_json: row.get(1)?,
                            accepted_ids_json: row.get(2)?,
                            completed_ids_json: row.get(3)?,
                            reward_points: row.get(4)?,
                        })
                    },
                )
                .optional()
                .map_err(db_err)?;

            row.map(StateRow::into_state).transpose()
        })
    }

    /// Save the full state row for a user (insert or overwrite every
    /// column in one statement).
    pub fn save_state(&self, user_id: i64, state: &UserState) -> Result<(), AppError> {
        let profile_json = state
            .profile
            .as_ref()
            .map(|p| encode_json(p))
            .transpose()?;
        let challenges_json = encode_json(&state.challenges)?;
        let accepted_json = encode_json(&id_vec(&state.accepted_ids))?;
        let completed_json = encode_json(&id_vec(&state.completed_ids))?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO user_state (user_id, profile_json, challenges_json,
                                         accepted_ids_json, completed_ids_json, reward_points)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(user_id) DO UPDATE SET
                     profile_json = excluded.profile_json,
                     challenges_json = excluded.challenges_json,
                     accepted_ids_json = excluded.accepted_ids_json,
                     completed_ids_json = excluded.completed_ids_json,
                     reward_points = excluded.reward_points",
                (
                    user_id,
                    profile_json,
                    challenges_json,
                    accepted_json,
                    completed_json,
                    state.reward_points,
                ),
            )
            .map_err(db_err)?;
            Ok(())
        })
    }
}

/// Raw `user_state` row before JSON decoding.
struct StateRow {
    profile_json: Option<String>,
    challenges_json: Option<String>,
    accepted_ids_json: Option<String>,
    completed_ids_json: Option<String>,
    reward_points: u32,
}

impl StateRow {
    fn into_state(self) -> Result<UserState, AppError> {
        let profile: Option<Profile> = self
            .profile_json
            .as_deref()
            .map(decode_json)
            .transpose()?;
        let challenges: Vec<Challenge> = self
            .challenges_json
            .as_deref()
            .map(decode_json)
            .transpose()?
            .unwrap_or_default();
        let accepted: Vec<String> = self
            .accepted_ids_json
            .as_deref()
            .map(decode_json)
            .transpose()?
            .unwrap_or_default();
        let completed: Vec<String> = self
            .completed_ids_json
            .as_deref()
            .map(decode_json)
            .transpose()?
            .unwrap_or_default();

        Ok(UserState {
            profile,
            challenges,
            accepted_ids: accepted.into_iter().collect::<HashSet<_>>(),
            completed_ids: completed.into_iter().collect::<HashSet<_>>(),
            reward_points: self.reward_points,
        })
    }
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn migrate(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            email           TEXT NOT NULL UNIQUE,
            name            TEXT NOT NULL,
            password_hash   TEXT NOT NULL,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_state (
            user_id             INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
            profile_json        TEXT,
            challenges_json     TEXT,
            accepted_ids_json   TEXT,
            completed_ids_json  TEXT,
            reward_points       INTEGER NOT NULL DEFAULT 0
        );
        ",
    )
    .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))
}

fn db_err(e: rusqlite::Error) -> AppError {
    AppError::Database(e.to_string())
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Database(format!("Failed to encode state column: {}", e)))
}

fn decode_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::Database(format!("Failed to decode state column: {}", e)))
}

/// Sorted id list for stable serialized output.
fn id_vec(ids: &HashSet<String>) -> Vec<String> {
    let mut out: Vec<String> = ids.iter().cloned().collect();
    out.sort();
    out
}
