//! Per-level progress rows backing the user's difficulty buckets.

use serde::Serialize;
use sqlx::FromRow;
use speakcoach_core::progression::{LevelBucket, LevelSet};
use speakcoach_core::session::DifficultyLevel;
use speakcoach_core::types::{DbId, Timestamp};

/// A row from the `user_level_progress` table. One row per
/// (user, difficulty) pair, seeded at registration.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LevelProgressRow {
    pub id: DbId,
    pub user_id: DbId,
    pub level: String,
    pub progress: i16,
    pub session_count: i32,
    pub best_score: i16,
    pub total_time_secs: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LevelProgressRow {
    pub fn bucket(&self) -> LevelBucket {
        LevelBucket {
            progress: self.progress,
            session_count: self.session_count,
            best_score: self.best_score,
            total_time_secs: self.total_time_secs,
        }
    }
}

/// Assemble the core [`LevelSet`] from a user's progress rows.
///
/// Missing rows fall back to an empty bucket, so a user created before a
/// level existed still gets a usable snapshot.
pub fn rows_to_level_set(rows: &[LevelProgressRow]) -> LevelSet {
    let mut set = LevelSet::default();
    for row in rows {
        if let Ok(level) = row.level.parse::<DifficultyLevel>() {
            *set.bucket_mut(level) = row.bucket();
        }
    }
    set
}
