//! Repository for the `practice_sessions` table.

use sqlx::PgPool;
use speakcoach_core::session::{DifficultyLevel, PracticeType};
use speakcoach_core::types::DbId;

use crate::models::practice_session::{PracticeSession, RecentSessionRow, SessionAggregates};
use crate::models::status::SessionStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, level, practice_type, status_id, started_at, \
    completed_at, duration_secs, audio_size_bytes, transcript, confidence_score, \
    clarity_score, pace_wpm, volume_stability, filler_um, filler_uh, filler_like, \
    filler_you_know, filler_other, filler_total, feedback, improvements, degraded, \
    created_at, updated_at";

/// Provides lifecycle and query operations for practice sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session in `started` status.
    ///
    /// The partial unique index on active sessions makes this fail with a
    /// `uq_`-prefixed constraint violation if the user already has one.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        level: DifficultyLevel,
        practice_type: PracticeType,
    ) -> Result<PracticeSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO practice_sessions (user_id, level, practice_type)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PracticeSession>(&query)
            .bind(user_id)
            .bind(level.as_str())
            .bind(practice_type.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a session by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PracticeSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM practice_sessions WHERE id = $1");
        sqlx::query_as::<_, PracticeSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the user's active session (started, recording, or analyzing),
    /// if any. At most one can exist.
    pub async fn find_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<PracticeSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM practice_sessions
             WHERE user_id = $1 AND status_id IN ($2, $3, $4)"
        );
        sqlx::query_as::<_, PracticeSession>(&query)
            .bind(user_id)
            .bind(SessionStatus::Started.id())
            .bind(SessionStatus::Recording.id())
            .bind(SessionStatus::Analyzing.id())
            .fetch_optional(pool)
            .await
    }

    /// Find a session awaiting upload (started or recording) owned by the
    /// given user.
    pub async fn find_pre_upload(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<PracticeSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM practice_sessions
             WHERE id = $1 AND user_id = $2 AND status_id IN ($3, $4)"
        );
        sqlx::query_as::<_, PracticeSession>(&query)
            .bind(id)
            .bind(user_id)
            .bind(SessionStatus::Started.id())
            .bind(SessionStatus::Recording.id())
            .fetch_optional(pool)
            .await
    }

    /// Transition a pre-upload session to `analyzing`, recording the
    /// server-clamped duration and audio size.
    ///
    /// Returns `None` if the session is no longer in a pre-upload status,
    /// which keeps the transition monotone under races.
    pub async fn mark_analyzing(
        pool: &PgPool,
        id: DbId,
        duration_secs: i32,
        audio_size_bytes: i64,
    ) -> Result<Option<PracticeSession>, sqlx::Error> {
        let query = format!(
            "UPDATE practice_sessions
             SET status_id = $2, duration_secs = $3, audio_size_bytes = $4
             WHERE id = $1 AND status_id IN ($5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PracticeSession>(&query)
            .bind(id)
            .bind(SessionStatus::Analyzing.id())
            .bind(duration_secs)
            .bind(audio_size_bytes)
            .bind(SessionStatus::Started.id())
            .bind(SessionStatus::Recording.id())
            .fetch_optional(pool)
            .await
    }

    /// Mark a session `failed`. Only reachable from non-terminal statuses;
    /// reserved for unrecoverable local errors (corrupt audio), never for
    /// provider failures.
    pub async fn mark_failed(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE practice_sessions
             SET status_id = $2, completed_at = NOW()
             WHERE id = $1 AND status_id IN ($3, $4, $5)",
        )
        .bind(id)
        .bind(SessionStatus::Failed.id())
        .bind(SessionStatus::Started.id())
        .bind(SessionStatus::Recording.id())
        .bind(SessionStatus::Analyzing.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a user's completed sessions, most recent first.
    pub async fn list_recent_completed(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<RecentSessionRow>, sqlx::Error> {
        sqlx::query_as::<_, RecentSessionRow>(
            "SELECT id, level, practice_type, confidence_score, duration_secs, \
                    completed_at, feedback
             FROM practice_sessions
             WHERE user_id = $1 AND status_id = $2
             ORDER BY completed_at DESC
             LIMIT $3",
        )
        .bind(user_id)
        .bind(SessionStatus::Completed.id())
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Aggregate statistics over a user's completed sessions.
    pub async fn aggregates_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<SessionAggregates, sqlx::Error> {
        sqlx::query_as::<_, SessionAggregates>(
            "SELECT COUNT(*) AS total_sessions,
                    COALESCE(AVG(confidence_score), 0)::DOUBLE PRECISION AS avg_confidence,
                    COALESCE(AVG(clarity_score), 0)::DOUBLE PRECISION AS avg_clarity,
                    COALESCE(SUM(duration_secs), 0)::BIGINT AS total_practice_time,
                    COALESCE(MAX(confidence_score), 0)::SMALLINT AS best_confidence_score
             FROM practice_sessions
             WHERE user_id = $1 AND status_id = $2",
        )
        .bind(user_id)
        .bind(SessionStatus::Completed.id())
        .fetch_one(pool)
        .await
    }
}
