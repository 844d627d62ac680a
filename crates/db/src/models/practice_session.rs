//! Practice-session entity model and projections.

use serde::Serialize;
use sqlx::FromRow;
use speakcoach_core::types::{DbId, Timestamp};

use super::status::{SessionStatus, StatusId};

/// A row from the `practice_sessions` table.
///
/// Metric columns are NULL until analysis has run; filler counters default
/// to zero. `feedback` and `improvements` hold the serialized
/// `speakcoach_core::scoring` structures.
#[derive(Debug, Clone, FromRow)]
pub struct PracticeSession {
    pub id: DbId,
    pub user_id: DbId,
    pub level: String,
    pub practice_type: String,
    pub status_id: StatusId,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub duration_secs: i32,
    pub audio_size_bytes: i64,
    pub transcript: Option<String>,
    pub confidence_score: Option<i16>,
    pub clarity_score: Option<i16>,
    pub pace_wpm: Option<i16>,
    pub volume_stability: Option<i16>,
    pub filler_um: i16,
    pub filler_uh: i16,
    pub filler_like: i16,
    pub filler_you_know: i16,
    pub filler_other: i16,
    pub filler_total: i16,
    pub feedback: Option<serde_json::Value>,
    pub improvements: Option<serde_json::Value>,
    pub degraded: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PracticeSession {
    pub fn status(&self) -> Option<SessionStatus> {
        SessionStatus::from_id(self.status_id)
    }
}

/// Public projection returned by session start and session listings.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: DbId,
    pub level: String,
    pub practice_type: String,
    pub status: &'static str,
    pub started_at: Timestamp,
}

impl From<&PracticeSession> for SessionSummary {
    fn from(session: &PracticeSession) -> Self {
        Self {
            id: session.id,
            level: session.level.clone(),
            practice_type: session.practice_type.clone(),
            status: session
                .status()
                .map_or("unknown", SessionStatus::as_str),
            started_at: session.started_at,
        }
    }
}

/// Compact completed-session projection for the recent-sessions listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentSessionRow {
    pub id: DbId,
    pub level: String,
    pub practice_type: String,
    pub confidence_score: Option<i16>,
    pub duration_secs: i32,
    pub completed_at: Option<Timestamp>,
    pub feedback: Option<serde_json::Value>,
}

/// Everything written to a session row when it completes.
#[derive(Debug, Clone)]
pub struct SessionCompletion {
    pub transcript: String,
    pub confidence_score: i16,
    pub clarity_score: i16,
    pub pace_wpm: i16,
    pub volume_stability: i16,
    pub filler_um: i16,
    pub filler_uh: i16,
    pub filler_like: i16,
    pub filler_you_know: i16,
    pub filler_other: i16,
    pub filler_total: i16,
    pub feedback: serde_json::Value,
    pub improvements: serde_json::Value,
    pub degraded: bool,
    pub completed_at: Timestamp,
}

/// Aggregates over a user's completed sessions, for the progress overview.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct SessionAggregates {
    pub total_sessions: i64,
    pub avg_confidence: f64,
    pub avg_clarity: f64,
    pub total_practice_time: i64,
    pub best_confidence_score: i16,
}
