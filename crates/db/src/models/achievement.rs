//! Achievement unlock records.
//!
//! Definitions live in `speakcoach_core::achievements`; only the unlock
//! events are persisted.

use serde::Serialize;
use sqlx::FromRow;
use speakcoach_core::types::{DbId, Timestamp};

/// A row from the `user_achievements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UnlockedAchievement {
    pub id: DbId,
    pub user_id: DbId,
    pub achievement_id: String,
    pub points_awarded: i32,
    pub unlocked_at: Timestamp,
}

/// A newly unlocked achievement as reported in the upload response.
#[derive(Debug, Clone, Serialize)]
pub struct NewAchievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub points: i32,
    pub unlocked_at: Timestamp,
}
