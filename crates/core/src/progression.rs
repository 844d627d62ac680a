//! User progression updates applied after each completed session.
//!
//! [`apply`] mutates an in-memory snapshot only; the db layer persists the
//! snapshot and the session row in one transaction so a completed session
//! is never visible without its stat updates.

use serde::{Deserialize, Serialize};

use crate::session::DifficultyLevel;
use crate::types::Timestamp;

/// Progress bucket for one difficulty level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelBucket {
    /// Completion percentage, clamped to 0-100.
    pub progress: i16,
    pub session_count: i32,
    /// Best session confidence score achieved at this level.
    pub best_score: i16,
    pub total_time_secs: i32,
}

/// Per-level buckets, one for each difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSet {
    pub easy: LevelBucket,
    pub medium: LevelBucket,
    pub hard: LevelBucket,
}

impl LevelSet {
    pub fn bucket(&self, level: DifficultyLevel) -> &LevelBucket {
        match level {
            DifficultyLevel::Easy => &self.easy,
            DifficultyLevel::Medium => &self.medium,
            DifficultyLevel::Hard => &self.hard,
        }
    }

    pub fn bucket_mut(&mut self, level: DifficultyLevel) -> &mut LevelBucket {
        match level {
            DifficultyLevel::Easy => &mut self.easy,
            DifficultyLevel::Medium => &mut self.medium,
            DifficultyLevel::Hard => &mut self.hard,
        }
    }

    /// True if any bucket has reached full progress.
    pub fn any_complete(&self) -> bool {
        [self.easy, self.medium, self.hard]
            .iter()
            .any(|b| b.progress >= 100)
    }
}

/// The durable progression state of a user, as loaded from the db.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub total_sessions: i32,
    /// Best-ever session confidence score; monotonically non-decreasing.
    pub confidence_score: i16,
    pub streak: i32,
    pub max_streak: i32,
    pub points: i32,
    pub is_new_user: bool,
    pub last_session_at: Option<Timestamp>,
    pub levels: LevelSet,
}

/// The slice of a completed session the progression update needs.
#[derive(Debug, Clone, Copy)]
pub struct SessionOutcome {
    pub level: DifficultyLevel,
    pub confidence_score: i16,
    pub duration_secs: i32,
}

/// How much one session advances a level's progress bar. Harder levels
/// need proportionally more sessions to complete.
fn progress_increment(level: DifficultyLevel) -> i16 {
    match level {
        DifficultyLevel::Easy => 10,
        DifficultyLevel::Medium => 8,
        DifficultyLevel::Hard => 6,
    }
}

/// Apply one completed session to the user's progression snapshot.
///
/// The streak is computed from the PREVIOUS `last_session_at` before it is
/// overwritten with `now`. "Same day" means the elapsed-time day floor is
/// zero, not a calendar-date comparison: a session at 23:59 followed by one
/// at 00:01 counts as a one-day gap and extends the streak.
pub fn apply(user: &mut UserProgress, session: &SessionOutcome, now: Timestamp) {
    user.total_sessions += 1;
    user.confidence_score = user.confidence_score.max(session.confidence_score);

    let bucket = user.levels.bucket_mut(session.level);
    bucket.session_count += 1;
    bucket.best_score = bucket.best_score.max(session.confidence_score);
    bucket.total_time_secs += session.duration_secs;
    bucket.progress = (bucket.progress + progress_increment(session.level)).min(100);

    match user.last_session_at {
        None => user.streak = 1,
        Some(last) => {
            let days_since_last = (now - last).num_days();
            if days_since_last == 1 {
                user.streak += 1;
            } else if days_since_last > 1 {
                user.streak = 1;
            }
            // days_since_last == 0: same-day repeat, streak unchanged.
        }
    }
    user.max_streak = user.max_streak.max(user.streak);
    user.last_session_at = Some(now);

    if user.is_new_user && user.total_sessions >= 1 {
        user.is_new_user = false;
    }
}
