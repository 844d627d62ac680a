//! Handler for the `/progress` resource.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use speakcoach_core::error::CoreError;
use speakcoach_db::models::level_progress::LevelProgressRow;
use speakcoach_db::repositories::{LevelProgressRepo, SessionRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// The user's durable counters, as maintained by the progression engine.
#[derive(Debug, Serialize)]
pub struct ProgressUser {
    pub total_sessions: i32,
    pub confidence_score: i16,
    pub streak: i32,
    pub max_streak: i32,
    pub points: i32,
}

/// Aggregates computed over the user's completed sessions.
#[derive(Debug, Serialize)]
pub struct OverallStats {
    pub total_sessions: i64,
    pub avg_confidence: i64,
    pub avg_clarity: i64,
    pub total_practice_time: i64,
    pub best_confidence_score: i16,
}

/// Response body for `GET /progress/overview`.
#[derive(Debug, Serialize)]
pub struct ProgressOverview {
    pub user: ProgressUser,
    pub overall: OverallStats,
    pub levels: Vec<LevelProgressRow>,
}

/// GET /api/v1/progress/overview
///
/// The user's progression counters plus aggregates over their completed
/// sessions and the per-level buckets.
pub async fn overview(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<ProgressOverview>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let aggregates = SessionRepo::aggregates_for_user(&state.pool, auth.user_id).await?;
    let levels = LevelProgressRepo::list_for_user(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: ProgressOverview {
            user: ProgressUser {
                total_sessions: user.total_sessions,
                confidence_score: user.confidence_score,
                streak: user.streak,
                max_streak: user.max_streak,
                points: user.points,
            },
            overall: OverallStats {
                total_sessions: aggregates.total_sessions,
                avg_confidence: aggregates.avg_confidence.round() as i64,
                avg_clarity: aggregates.avg_clarity.round() as i64,
                total_practice_time: aggregates.total_practice_time,
                best_confidence_score: aggregates.best_confidence_score,
            },
            levels,
        },
    }))
}
