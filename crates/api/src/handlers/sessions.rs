//! Handlers for the `/sessions` resource (start, upload, recent).
//!
//! All endpoints require authentication via [`AuthUser`]. The heavy
//! lifting lives in [`crate::engine::SessionEngine`]; these handlers only
//! translate between HTTP and the engine.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use speakcoach_core::error::CoreError;
use speakcoach_core::scoring::{Feedback, Improvement};
use speakcoach_core::session::{DifficultyLevel, PracticeType};
use speakcoach_core::types::{DbId, Timestamp};
use speakcoach_db::models::achievement::NewAchievement;
use speakcoach_db::models::practice_session::SessionSummary;
use speakcoach_db::models::user::UserStats;

use crate::engine::UploadOutcome;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /sessions/start`.
///
/// Fields arrive as strings and are parsed explicitly so invalid values
/// produce a 400 `VALIDATION_ERROR` rather than a deserialization error.
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub level: String,
    pub practice_type: Option<String>,
}

/// Query parameters for `GET /sessions/recent`.
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    /// Maximum number of results. Defaults to 5, capped at 50.
    pub limit: Option<i64>,
}

/// Per-metric analysis block in the upload response.
#[derive(Debug, Serialize)]
pub struct AnalysisBody {
    pub confidence_score: i16,
    pub clarity_score: i16,
    pub pace_wpm: i16,
    pub volume_stability: i16,
    pub filler_count: FillerCounts,
}

#[derive(Debug, Serialize)]
pub struct FillerCounts {
    pub total: i16,
    pub um: i16,
    pub uh: i16,
    pub like: i16,
    pub you_know: i16,
    pub other: i16,
}

/// The completed session as returned by the upload endpoint.
#[derive(Debug, Serialize)]
pub struct SessionResultBody {
    pub id: DbId,
    pub status: &'static str,
    pub duration_secs: i32,
    pub transcript: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub analysis: AnalysisBody,
    pub feedback: Feedback,
    pub improvements: Vec<Improvement>,
    pub overall_score: i16,
}

/// Response body for `POST /sessions/{id}/upload`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub session: SessionResultBody,
    pub user_stats: UserStats,
    pub new_achievements: Vec<NewAchievement>,
    /// Present when analysis degraded to a synthetic report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

impl From<UploadOutcome> for UploadResponse {
    fn from(outcome: UploadOutcome) -> Self {
        let session = &outcome.session;
        Self {
            session: SessionResultBody {
                id: session.id,
                status: session
                    .status()
                    .map_or("unknown", |s| s.as_str()),
                duration_secs: session.duration_secs,
                transcript: session.transcript.clone(),
                completed_at: session.completed_at,
                analysis: AnalysisBody {
                    confidence_score: session.confidence_score.unwrap_or_default(),
                    clarity_score: session.clarity_score.unwrap_or_default(),
                    pace_wpm: session.pace_wpm.unwrap_or_default(),
                    volume_stability: session.volume_stability.unwrap_or_default(),
                    filler_count: FillerCounts {
                        total: session.filler_total,
                        um: session.filler_um,
                        uh: session.filler_uh,
                        like: session.filler_like,
                        you_know: session.filler_you_know,
                        other: session.filler_other,
                    },
                },
                feedback: outcome.feedback,
                improvements: outcome.improvements,
                overall_score: outcome.overall_score,
            },
            user_stats: outcome.user_stats,
            new_achievements: outcome.new_achievements,
            warning: outcome
                .degraded
                .then_some("Analysis completed with basic metrics"),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions/start
///
/// Start a new practice session. Returns 201 with the session summary, or
/// 409 if the user already has an active session.
pub async fn start_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<StartSessionRequest>,
) -> AppResult<impl IntoResponse> {
    let level: DifficultyLevel = input.level.parse().map_err(AppError::Core)?;
    let practice_type: PracticeType = match &input.practice_type {
        Some(raw) => raw.parse().map_err(AppError::Core)?,
        None => PracticeType::default(),
    };

    let session = state.engine.start(auth.user_id, level, practice_type).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SessionSummary::from(&session),
        }),
    ))
}

/// POST /api/v1/sessions/{id}/upload
///
/// Upload the recorded audio for a session (multipart: an `audio` part
/// plus a `duration` text field). Runs analysis, scoring, progression,
/// and achievement evaluation before responding.
pub async fn upload_audio(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<UploadResponse>>> {
    let mut audio: Option<(Option<String>, Vec<u8>)> = None;
    let mut reported_duration_secs: i64 = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("audio") => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Reading audio part: {e}")))?;
                audio = Some((content_type, bytes.to_vec()));
            }
            Some("duration") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Reading duration field: {e}")))?;
                reported_duration_secs = text.trim().parse().unwrap_or(0);
            }
            _ => {}
        }
    }

    let (content_type, bytes) = audio.ok_or_else(|| {
        AppError::Core(CoreError::Validation("Audio file is required".into()))
    })?;

    let outcome = state
        .engine
        .upload(
            session_id,
            auth.user_id,
            content_type.as_deref(),
            &bytes,
            reported_duration_secs,
        )
        .await?;

    Ok(Json(DataResponse {
        data: outcome.into(),
    }))
}

/// GET /api/v1/sessions/recent
///
/// The user's completed sessions, most recent first.
pub async fn recent_sessions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<RecentQuery>,
) -> AppResult<impl IntoResponse> {
    let sessions = state.engine.recent(auth.user_id, params.limit).await?;
    Ok(Json(DataResponse { data: sessions }))
}
