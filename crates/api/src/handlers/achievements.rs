//! Handler for the `/achievements` resource.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use speakcoach_core::achievements::REGISTRY;
use speakcoach_core::types::Timestamp;
use speakcoach_db::repositories::AchievementRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// One achievement definition annotated with the caller's unlock state.
#[derive(Debug, Serialize)]
pub struct AchievementView {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub points: i32,
    pub unlocked: bool,
    pub unlocked_at: Option<Timestamp>,
}

/// GET /api/v1/achievements
///
/// The full achievement registry, each entry annotated with whether (and
/// when) the authenticated user unlocked it.
pub async fn list_achievements(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<AchievementView>>>> {
    let unlocked = AchievementRepo::list_for_user(&state.pool, auth.user_id).await?;

    let views = REGISTRY
        .iter()
        .map(|def| {
            let record = unlocked.iter().find(|a| a.achievement_id == def.id);
            AchievementView {
                id: def.id,
                title: def.title,
                description: def.description,
                points: def.points,
                unlocked: record.is_some(),
                unlocked_at: record.map(|a| a.unlocked_at),
            }
        })
        .collect();

    Ok(Json(DataResponse { data: views }))
}
