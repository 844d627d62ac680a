//! The transactional completion write.
//!
//! A session's terminal update, the owning user's stat update, the touched
//! level bucket, and any achievement unlocks commit as ONE transaction, so
//! a completed session is never visible without its derived state (and
//! vice versa).

use sqlx::PgPool;
use speakcoach_core::progression::UserProgress;
use speakcoach_core::session::DifficultyLevel;
use speakcoach_core::types::{DbId, Timestamp};

use crate::models::practice_session::{PracticeSession, SessionCompletion};
use crate::models::status::SessionStatus;

/// One achievement unlock to persist with the completion.
#[derive(Debug, Clone)]
pub struct UnlockInsert {
    pub achievement_id: &'static str,
    pub points: i32,
    pub unlocked_at: Timestamp,
}

pub struct ProgressionRepo;

impl ProgressionRepo {
    /// Commit a session completion and all derived-state updates.
    ///
    /// `progress` is the POST-update snapshot produced by
    /// `speakcoach_core::progression::apply` plus any achievement points.
    /// The session row update is guarded on `analyzing` status, so a
    /// concurrent duplicate completion affects zero rows and the whole
    /// transaction rolls back via [`sqlx::Error::RowNotFound`].
    pub async fn commit_completion(
        pool: &PgPool,
        session_id: DbId,
        user_id: DbId,
        level: DifficultyLevel,
        completion: &SessionCompletion,
        progress: &UserProgress,
        unlocks: &[UnlockInsert],
    ) -> Result<PracticeSession, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let session = sqlx::query_as::<_, PracticeSession>(
            "UPDATE practice_sessions SET
                status_id = $2,
                completed_at = $3,
                transcript = $4,
                confidence_score = $5,
                clarity_score = $6,
                pace_wpm = $7,
                volume_stability = $8,
                filler_um = $9,
                filler_uh = $10,
                filler_like = $11,
                filler_you_know = $12,
                filler_other = $13,
                filler_total = $14,
                feedback = $15,
                improvements = $16,
                degraded = $17
             WHERE id = $1 AND status_id = $18
             RETURNING id, user_id, level, practice_type, status_id, started_at,
                completed_at, duration_secs, audio_size_bytes, transcript,
                confidence_score, clarity_score, pace_wpm, volume_stability,
                filler_um, filler_uh, filler_like, filler_you_know, filler_other,
                filler_total, feedback, improvements, degraded, created_at, updated_at",
        )
        .bind(session_id)
        .bind(SessionStatus::Completed.id())
        .bind(completion.completed_at)
        .bind(&completion.transcript)
        .bind(completion.confidence_score)
        .bind(completion.clarity_score)
        .bind(completion.pace_wpm)
        .bind(completion.volume_stability)
        .bind(completion.filler_um)
        .bind(completion.filler_uh)
        .bind(completion.filler_like)
        .bind(completion.filler_you_know)
        .bind(completion.filler_other)
        .bind(completion.filler_total)
        .bind(&completion.feedback)
        .bind(&completion.improvements)
        .bind(completion.degraded)
        .bind(SessionStatus::Analyzing.id())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE users SET
                total_sessions = $2,
                confidence_score = $3,
                streak = $4,
                max_streak = $5,
                points = $6,
                is_new_user = $7,
                last_session_at = $8
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(progress.total_sessions)
        .bind(progress.confidence_score)
        .bind(progress.streak)
        .bind(progress.max_streak)
        .bind(progress.points)
        .bind(progress.is_new_user)
        .bind(progress.last_session_at)
        .execute(&mut *tx)
        .await?;

        let bucket = progress.levels.bucket(level);
        sqlx::query(
            "INSERT INTO user_level_progress
                (user_id, level, progress, session_count, best_score, total_time_secs)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (user_id, level) DO UPDATE SET
                progress = EXCLUDED.progress,
                session_count = EXCLUDED.session_count,
                best_score = EXCLUDED.best_score,
                total_time_secs = EXCLUDED.total_time_secs",
        )
        .bind(user_id)
        .bind(level.as_str())
        .bind(bucket.progress)
        .bind(bucket.session_count)
        .bind(bucket.best_score)
        .bind(bucket.total_time_secs)
        .execute(&mut *tx)
        .await?;

        for unlock in unlocks {
            // DO NOTHING keeps a concurrent duplicate unlock from aborting
            // the whole completion; the unique index guarantees idempotence.
            sqlx::query(
                "INSERT INTO user_achievements
                    (user_id, achievement_id, points_awarded, unlocked_at)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (user_id, achievement_id) DO NOTHING",
            )
            .bind(user_id)
            .bind(unlock.achievement_id)
            .bind(unlock.points)
            .bind(unlock.unlocked_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(session)
    }
}
