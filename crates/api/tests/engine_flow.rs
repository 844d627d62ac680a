//! End-to-end engine tests: start -> upload -> complete, the
//! single-active-session rule under concurrency, and the degraded-analysis
//! fallback. These drive `SessionEngine` directly with a database pool;
//! the HTTP layer above it is a thin translation.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use sqlx::PgPool;
use speakcoach_api::engine::SessionEngine;
use speakcoach_api::error::AppError;
use speakcoach_core::analysis::{
    AnalysisContext, AnalysisError, AnalysisProvider, MetricsReport, SyntheticAnalyzer,
};
use speakcoach_core::error::CoreError;
use speakcoach_core::session::{DifficultyLevel, PracticeType};
use speakcoach_db::models::status::SessionStatus;
use speakcoach_db::models::user::{CreateUser, User};
use speakcoach_db::repositories::{SessionRepo, UserRepo};

const AUDIO: &[u8] = b"RIFF....WAVEfmt fake-audio-bytes";
const WAV: Option<&str> = Some("audio/wav");

async fn seed_user(pool: &PgPool) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Test Speaker".into(),
            email: "speaker@example.com".into(),
            password_hash: "$argon2id$fake-hash".into(),
        },
    )
    .await
    .expect("user creation should succeed")
}

fn engine_with(pool: PgPool, provider: Arc<dyn AnalysisProvider>) -> SessionEngine {
    SessionEngine::new(pool, provider, Duration::from_secs(5))
}

fn synthetic_engine(pool: PgPool) -> SessionEngine {
    engine_with(pool, Arc::new(SyntheticAnalyzer::with_seed(42)))
}

/// A provider that always errors, to exercise the degraded path.
struct FailingProvider;

#[async_trait]
impl AnalysisProvider for FailingProvider {
    async fn analyze(
        &self,
        _audio: &[u8],
        _ctx: &AnalysisContext,
    ) -> Result<MetricsReport, AnalysisError> {
        Err(AnalysisError::Provider("service unavailable".into()))
    }
}

/// A provider that never returns within the engine's budget.
struct SlowProvider;

#[async_trait]
impl AnalysisProvider for SlowProvider {
    async fn analyze(
        &self,
        _audio: &[u8],
        ctx: &AnalysisContext,
    ) -> Result<MetricsReport, AnalysisError> {
        tokio::time::sleep(Duration::from_secs(600)).await;
        Ok(SyntheticAnalyzer::with_seed(0).generate(ctx))
    }
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_upload_completes_and_progresses_the_user(pool: PgPool) {
    let user = seed_user(&pool).await;
    let engine = synthetic_engine(pool.clone());

    let session = engine
        .start(user.id, DifficultyLevel::Easy, PracticeType::Freestyle)
        .await
        .unwrap();
    assert_eq!(session.status(), Some(SessionStatus::Started));

    let outcome = engine
        .upload(session.id, user.id, WAV, AUDIO, 90)
        .await
        .unwrap();

    assert_eq!(outcome.session.status(), Some(SessionStatus::Completed));
    assert!(outcome.session.completed_at.is_some());
    assert!(outcome.session.transcript.is_some());
    assert!(!outcome.degraded);
    assert!(!outcome.improvements.is_empty());
    assert!((0..=100).contains(&outcome.overall_score));

    // Progression applied exactly once.
    assert_eq!(outcome.user_stats.total_sessions, 1);
    assert_eq!(outcome.user_stats.streak, 1);
    assert!(!outcome.user_stats.is_new_user);

    // The first-session achievement always unlocks on session one.
    assert!(outcome
        .new_achievements
        .iter()
        .any(|a| a.id == "first_session" && a.points == 10));

    // Persisted state matches the response.
    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.total_sessions, 1);
    assert!(!reloaded.is_new_user);
    assert_eq!(
        reloaded.confidence_score,
        outcome.user_stats.confidence_score
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completed_session_frees_the_active_slot(pool: PgPool) {
    let user = seed_user(&pool).await;
    let engine = synthetic_engine(pool.clone());

    let first = engine
        .start(user.id, DifficultyLevel::Easy, PracticeType::Freestyle)
        .await
        .unwrap();
    engine.upload(first.id, user.id, WAV, AUDIO, 60).await.unwrap();

    // The slot is free: a second start succeeds and counts separately.
    let second = engine
        .start(user.id, DifficultyLevel::Medium, PracticeType::Guided)
        .await
        .unwrap();
    let outcome = engine
        .upload(second.id, user.id, WAV, AUDIO, 60)
        .await
        .unwrap();

    assert_eq!(outcome.user_stats.total_sessions, 2);
    // Same-day repeat: streak unchanged.
    assert_eq!(outcome.user_stats.streak, 1);

    let recent = engine.recent(user.id, None).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].level, "medium");
    assert_eq!(recent[1].level, "easy");
}

// ---------------------------------------------------------------------------
// Single-active-session rule
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_start_conflicts_while_a_session_is_active(pool: PgPool) {
    let user = seed_user(&pool).await;
    let engine = synthetic_engine(pool.clone());

    engine
        .start(user.id, DifficultyLevel::Easy, PracticeType::Freestyle)
        .await
        .unwrap();

    let result = engine
        .start(user.id, DifficultyLevel::Easy, PracticeType::Freestyle)
        .await;
    assert_matches!(result, Err(AppError::Core(CoreError::Conflict(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_starts_admit_exactly_one_session(pool: PgPool) {
    let user = seed_user(&pool).await;
    let engine = Arc::new(synthetic_engine(pool.clone()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        let user_id = user.id;
        handles.push(tokio::spawn(async move {
            engine
                .start(user_id, DifficultyLevel::Easy, PracticeType::Freestyle)
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1, "exactly one concurrent start must win");

    let active = SessionRepo::find_active_for_user(&pool, user.id)
        .await
        .unwrap();
    assert!(active.is_some());
}

// ---------------------------------------------------------------------------
// Degraded analysis
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn provider_failure_degrades_but_completes(pool: PgPool) {
    let user = seed_user(&pool).await;
    let engine = engine_with(pool.clone(), Arc::new(FailingProvider));

    let session = engine
        .start(user.id, DifficultyLevel::Easy, PracticeType::Freestyle)
        .await
        .unwrap();
    let outcome = engine
        .upload(session.id, user.id, WAV, AUDIO, 60)
        .await
        .unwrap();

    // Never `failed` for provider errors: completed with synthetic data.
    assert_eq!(outcome.session.status(), Some(SessionStatus::Completed));
    assert!(outcome.degraded);
    assert!(outcome.session.degraded);
    assert!(outcome.session.confidence_score.is_some());

    // Progression still applied.
    assert_eq!(outcome.user_stats.total_sessions, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn provider_timeout_degrades_but_completes(pool: PgPool) {
    let user = seed_user(&pool).await;
    let engine = SessionEngine::new(
        pool.clone(),
        Arc::new(SlowProvider),
        Duration::from_millis(50),
    );

    let session = engine
        .start(user.id, DifficultyLevel::Easy, PracticeType::Freestyle)
        .await
        .unwrap();
    let outcome = engine
        .upload(session.id, user.id, WAV, AUDIO, 60)
        .await
        .unwrap();

    assert_eq!(outcome.session.status(), Some(SessionStatus::Completed));
    assert!(outcome.degraded);
}

// ---------------------------------------------------------------------------
// Upload validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_session_is_not_found(pool: PgPool) {
    let user = seed_user(&pool).await;
    let engine = synthetic_engine(pool.clone());

    let result = engine.upload(9999, user.id, WAV, AUDIO, 60).await;
    assert_matches!(
        result,
        Err(AppError::Core(CoreError::NotFound { entity: "Session", .. }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_for_another_users_session_is_not_found(pool: PgPool) {
    let owner = seed_user(&pool).await;
    let other = UserRepo::create(
        &pool,
        &CreateUser {
            name: "Other".into(),
            email: "other@example.com".into(),
            password_hash: "$argon2id$fake-hash".into(),
        },
    )
    .await
    .unwrap();

    let engine = synthetic_engine(pool.clone());
    let session = engine
        .start(owner.id, DifficultyLevel::Easy, PracticeType::Freestyle)
        .await
        .unwrap();

    let result = engine.upload(session.id, other.id, WAV, AUDIO, 60).await;
    assert_matches!(result, Err(AppError::Core(CoreError::NotFound { .. })));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bad_content_type_rejects_without_state_change(pool: PgPool) {
    let user = seed_user(&pool).await;
    let engine = synthetic_engine(pool.clone());

    let session = engine
        .start(user.id, DifficultyLevel::Easy, PracticeType::Freestyle)
        .await
        .unwrap();

    let result = engine
        .upload(session.id, user.id, Some("video/mp4"), AUDIO, 60)
        .await;
    assert_matches!(result, Err(AppError::Core(CoreError::Validation(_))));

    // The session is untouched: a corrected retry succeeds.
    let reloaded = SessionRepo::find_by_id(&pool, session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status(), Some(SessionStatus::Started));

    engine
        .upload(session.id, user.id, WAV, AUDIO, 60)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn corrupt_audio_fails_the_session(pool: PgPool) {
    let user = seed_user(&pool).await;
    let engine = synthetic_engine(pool.clone());

    let session = engine
        .start(user.id, DifficultyLevel::Easy, PracticeType::Freestyle)
        .await
        .unwrap();

    let result = engine.upload(session.id, user.id, WAV, b"", 60).await;
    assert_matches!(result, Err(AppError::Core(CoreError::Validation(_))));

    let reloaded = SessionRepo::find_by_id(&pool, session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status(), Some(SessionStatus::Failed));
    assert!(reloaded.completed_at.is_some());

    // A failed session frees the active slot.
    engine
        .start(user.id, DifficultyLevel::Easy, PracticeType::Freestyle)
        .await
        .unwrap();
}
