//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use speakcoach_core::progression::{LevelSet, UserProgress};
use speakcoach_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_new_user: bool,
    pub total_sessions: i32,
    pub confidence_score: i16,
    pub streak: i32,
    pub max_streak: i32,
    pub points: i32,
    pub current_level: String,
    pub preferences: serde_json::Value,
    pub last_login_at: Option<Timestamp>,
    pub last_session_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Build the in-memory progression snapshot the core engine operates
    /// on, combining the user row with its level buckets.
    pub fn progress_snapshot(&self, levels: LevelSet) -> UserProgress {
        UserProgress {
            total_sessions: self.total_sessions,
            confidence_score: self.confidence_score,
            streak: self.streak,
            max_streak: self.max_streak,
            points: self.points,
            is_new_user: self.is_new_user,
            last_session_at: self.last_session_at,
            levels,
        }
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub is_new_user: bool,
    pub total_sessions: i32,
    pub confidence_score: i16,
    pub streak: i32,
    pub max_streak: i32,
    pub points: i32,
    pub current_level: String,
    pub preferences: serde_json::Value,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_new_user: user.is_new_user,
            total_sessions: user.total_sessions,
            confidence_score: user.confidence_score,
            streak: user.streak,
            max_streak: user.max_streak,
            points: user.points,
            current_level: user.current_level,
            preferences: user.preferences,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user at registration.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Compact stats block returned alongside an upload result.
#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub total_sessions: i32,
    pub confidence_score: i16,
    pub streak: i32,
    pub max_streak: i32,
    pub points: i32,
    pub is_new_user: bool,
}

impl UserStats {
    pub fn from_progress(progress: &UserProgress) -> Self {
        Self {
            total_sessions: progress.total_sessions,
            confidence_score: progress.confidence_score,
            streak: progress.streak,
            max_streak: progress.max_streak,
            points: progress.points,
            is_new_user: progress.is_new_user,
        }
    }
}
