//! Session lifecycle orchestration: start, upload/analyze/complete, recent.
//!
//! Lock discipline: the per-user lock is held for the two state
//! transitions (active-session check + create, and the completion
//! transaction) but NOT across the provider call, so a slow analysis
//! never blocks the user's reads or other users' sessions.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use speakcoach_core::achievements::{self, AchievementDef};
use speakcoach_core::analysis::{AnalysisContext, AnalysisProvider, SyntheticAnalyzer};
use speakcoach_core::audio;
use speakcoach_core::error::CoreError;
use speakcoach_core::progression::{self, SessionOutcome};
use speakcoach_core::scoring::{self, Feedback, Improvement};
use speakcoach_core::session::{DifficultyLevel, PracticeType};
use speakcoach_core::types::DbId;
use speakcoach_db::models::achievement::NewAchievement;
use speakcoach_db::models::level_progress::rows_to_level_set;
use speakcoach_db::models::practice_session::{
    PracticeSession, RecentSessionRow, SessionCompletion,
};
use speakcoach_db::models::user::UserStats;
use speakcoach_db::repositories::progression_repo::UnlockInsert;
use speakcoach_db::repositories::{
    AchievementRepo, LevelProgressRepo, ProgressionRepo, SessionRepo, UserRepo,
};
use speakcoach_db::DbPool;

use crate::error::{AppError, AppResult};

use super::locks::UserLocks;

/// Default and maximum page size for the recent-sessions listing.
const RECENT_DEFAULT_LIMIT: i64 = 5;
const RECENT_MAX_LIMIT: i64 = 50;

/// Everything the upload endpoint needs to build its response.
#[derive(Debug)]
pub struct UploadOutcome {
    pub session: PracticeSession,
    pub overall_score: i16,
    pub feedback: Feedback,
    pub improvements: Vec<Improvement>,
    pub user_stats: UserStats,
    pub new_achievements: Vec<NewAchievement>,
    /// True when the report came from the synthetic fallback rather than
    /// the configured provider.
    pub degraded: bool,
}

pub struct SessionEngine {
    pool: DbPool,
    provider: Arc<dyn AnalysisProvider>,
    fallback: SyntheticAnalyzer,
    analysis_timeout: Duration,
    locks: UserLocks,
    registry: &'static [AchievementDef],
}

impl SessionEngine {
    pub fn new(
        pool: DbPool,
        provider: Arc<dyn AnalysisProvider>,
        analysis_timeout: Duration,
    ) -> Self {
        Self {
            pool,
            provider,
            fallback: SyntheticAnalyzer::new(),
            analysis_timeout,
            locks: UserLocks::new(),
            registry: achievements::REGISTRY,
        }
    }

    /// Start a new practice session.
    ///
    /// Fails with `Conflict` if the user already has a session in an
    /// active status. The check runs under the per-user lock, and the
    /// partial unique index backs it up against anything that races past.
    pub async fn start(
        &self,
        user_id: DbId,
        level: DifficultyLevel,
        practice_type: PracticeType,
    ) -> AppResult<PracticeSession> {
        let lock = self.locks.for_user(user_id);
        let _guard = lock.lock().await;

        if SessionRepo::find_active_for_user(&self.pool, user_id)
            .await?
            .is_some()
        {
            return Err(AppError::Core(CoreError::Conflict(
                "You already have an active session. Please complete it first.".into(),
            )));
        }

        let session = SessionRepo::create(&self.pool, user_id, level, practice_type).await?;

        tracing::info!(
            session_id = session.id,
            user_id,
            level = %level,
            practice_type = %practice_type,
            "Practice session started",
        );

        Ok(session)
    }

    /// Upload audio for a pre-upload session, run analysis, and complete
    /// the session with all derived-state updates.
    pub async fn upload(
        &self,
        session_id: DbId,
        user_id: DbId,
        content_type: Option<&str>,
        audio_bytes: &[u8],
        reported_duration_secs: i64,
    ) -> AppResult<UploadOutcome> {
        // Declared-type and size problems are rejected before any state
        // change; the client can retry the same session.
        audio::validate_audio(content_type, audio_bytes)?;

        let duration_secs = audio::clamp_duration(reported_duration_secs);

        // Phase 1 (under the user lock): resolve the session and move it
        // to `analyzing`.
        let session = {
            let lock = self.locks.for_user(user_id);
            let _guard = lock.lock().await;

            let session = SessionRepo::find_pre_upload(&self.pool, session_id, user_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Session",
                    id: session_id,
                }))?;

            // Corrupt audio is unrecoverable: the session fails. This is
            // the only path to the `failed` status; provider errors
            // degrade instead.
            if audio::is_corrupt(audio_bytes) {
                SessionRepo::mark_failed(&self.pool, session.id).await?;
                tracing::warn!(session_id, user_id, "Corrupt audio upload; session failed");
                return Err(AppError::Core(CoreError::Validation(
                    "Audio file is empty or unreadable".into(),
                )));
            }

            SessionRepo::mark_analyzing(
                &self.pool,
                session.id,
                duration_secs,
                audio_bytes.len() as i64,
            )
            .await?
            .ok_or(AppError::Core(CoreError::Conflict(
                "Session is no longer awaiting upload".into(),
            )))?
        };

        let ctx = self.analysis_context(&session, duration_secs)?;

        // Phase 2 (no lock held): the provider call, under its timeout.
        // Timeout and provider errors are treated identically: degrade to
        // a synthetic report and complete the session anyway.
        let (report, degraded) = match tokio::time::timeout(
            self.analysis_timeout,
            self.provider.analyze(audio_bytes, &ctx),
        )
        .await
        {
            Ok(Ok(report)) => (report, false),
            Ok(Err(err)) => {
                tracing::warn!(
                    session_id,
                    error = %err,
                    "Analysis failed; falling back to synthetic report",
                );
                (self.fallback.generate(&ctx), true)
            }
            Err(_elapsed) => {
                tracing::warn!(
                    session_id,
                    timeout_secs = self.analysis_timeout.as_secs(),
                    "Analysis timed out; falling back to synthetic report",
                );
                (self.fallback.generate(&ctx), true)
            }
        };

        // Phase 3 (under the user lock): score, apply progression and
        // achievements to an in-memory snapshot, and commit everything in
        // one transaction.
        let lock = self.locks.for_user(user_id);
        let _guard = lock.lock().await;

        let user = UserRepo::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: user_id,
            }))?;
        let level_rows = LevelProgressRepo::list_for_user(&self.pool, user_id).await?;
        let mut progress = user.progress_snapshot(rows_to_level_set(&level_rows));

        let feedback = scoring::classify(&report);
        let improvements = scoring::improvements(&report);
        let overall_score = scoring::overall_score(&report);

        let now = Utc::now();
        let outcome = SessionOutcome {
            level: ctx.level,
            confidence_score: report.confidence_score,
            duration_secs,
        };
        progression::apply(&mut progress, &outcome, now);

        let already = AchievementRepo::unlocked_ids(&self.pool, user_id).await?;
        let unlock_result =
            achievements::check_unlocks(self.registry, &progress, &outcome, &already);
        for failed_id in &unlock_result.failed {
            tracing::error!(
                achievement_id = failed_id,
                user_id,
                "Achievement condition panicked; skipped",
            );
        }
        progress.points += unlock_result.unlocked.iter().map(|d| d.points).sum::<i32>();

        let unlocks: Vec<UnlockInsert> = unlock_result
            .unlocked
            .iter()
            .map(|def| UnlockInsert {
                achievement_id: def.id,
                points: def.points,
                unlocked_at: now,
            })
            .collect();
        let new_achievements: Vec<NewAchievement> = unlock_result
            .unlocked
            .iter()
            .map(|def| NewAchievement {
                id: def.id,
                title: def.title,
                description: def.description,
                points: def.points,
                unlocked_at: now,
            })
            .collect();

        let breakdown = report.filler_breakdown;
        let completion = SessionCompletion {
            transcript: report.transcript.clone(),
            confidence_score: report.confidence_score,
            clarity_score: report.clarity_score,
            pace_wpm: report.pace_wpm,
            volume_stability: report.volume_stability_score,
            filler_um: breakdown.um,
            filler_uh: breakdown.uh,
            filler_like: breakdown.like,
            filler_you_know: breakdown.you_know,
            filler_other: breakdown.other,
            filler_total: breakdown.total(),
            feedback: serde_json::to_value(&feedback)
                .map_err(|e| AppError::InternalError(format!("serializing feedback: {e}")))?,
            improvements: serde_json::to_value(&improvements)
                .map_err(|e| AppError::InternalError(format!("serializing improvements: {e}")))?,
            degraded,
            completed_at: now,
        };

        let session = ProgressionRepo::commit_completion(
            &self.pool,
            session.id,
            user_id,
            ctx.level,
            &completion,
            &progress,
            &unlocks,
        )
        .await?;

        tracing::info!(
            session_id = session.id,
            user_id,
            overall_score,
            degraded,
            unlocked = new_achievements.len(),
            "Practice session completed",
        );

        Ok(UploadOutcome {
            session,
            overall_score,
            feedback,
            improvements,
            user_stats: UserStats::from_progress(&progress),
            new_achievements,
            degraded,
        })
    }

    /// List the user's completed sessions, most recent first.
    pub async fn recent(
        &self,
        user_id: DbId,
        limit: Option<i64>,
    ) -> AppResult<Vec<RecentSessionRow>> {
        let limit = limit.unwrap_or(RECENT_DEFAULT_LIMIT).clamp(1, RECENT_MAX_LIMIT);
        Ok(SessionRepo::list_recent_completed(&self.pool, user_id, limit).await?)
    }

    /// Rebuild the typed analysis context from a session row. The level
    /// and practice type columns carry CHECK constraints, so a parse
    /// failure here means a corrupted row, not bad input.
    fn analysis_context(
        &self,
        session: &PracticeSession,
        duration_secs: i32,
    ) -> AppResult<AnalysisContext> {
        let level: DifficultyLevel = session.level.parse().map_err(|_| {
            AppError::InternalError(format!(
                "session {} has invalid level '{}'",
                session.id, session.level
            ))
        })?;
        let practice_type: PracticeType = session.practice_type.parse().map_err(|_| {
            AppError::InternalError(format!(
                "session {} has invalid practice type '{}'",
                session.id, session.practice_type
            ))
        })?;
        Ok(AnalysisContext {
            level,
            duration_secs,
            practice_type,
        })
    }
}
