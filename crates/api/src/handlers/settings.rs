//! Handlers for the `/settings` resource (user preferences).
//!
//! Preferences are a JSONB document on the user row; updates merge the
//! provided fields into the existing document rather than replacing it.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use speakcoach_core::error::CoreError;
use speakcoach_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const ALLOWED_THEMES: &[&str] = &["light", "dark", "auto"];
const ALLOWED_LANGUAGES: &[&str] = &["en", "es", "fr", "de"];

/// Request body for `PUT /settings/preferences`. All fields optional;
/// only provided fields are changed.
#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub theme: Option<String>,
    pub notifications: Option<bool>,
    /// Daily reminder time in `HH:MM` (24-hour).
    pub reminder_time: Option<String>,
    pub language: Option<String>,
    pub sound_effects: Option<bool>,
}

/// GET /api/v1/settings
///
/// The authenticated user's preference document.
pub async fn get_settings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: user.preferences,
    }))
}

/// PUT /api/v1/settings/preferences
///
/// Merge the provided preference fields into the user's document and
/// return the updated document.
pub async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdatePreferencesRequest>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    if let Some(theme) = &input.theme {
        if !ALLOWED_THEMES.contains(&theme.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Theme must be one of: {}",
                ALLOWED_THEMES.join(", ")
            ))));
        }
    }
    if let Some(language) = &input.language {
        if !ALLOWED_LANGUAGES.contains(&language.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Language must be one of: {}",
                ALLOWED_LANGUAGES.join(", ")
            ))));
        }
    }
    if let Some(reminder) = &input.reminder_time {
        chrono::NaiveTime::parse_from_str(reminder, "%H:%M").map_err(|_| {
            AppError::Core(CoreError::Validation(
                "Reminder time must be in HH:MM format".into(),
            ))
        })?;
    }

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let mut preferences = match user.preferences {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };

    if let Some(theme) = input.theme {
        preferences.insert("theme".into(), theme.into());
    }
    if let Some(notifications) = input.notifications {
        preferences.insert("notifications".into(), notifications.into());
    }
    if let Some(reminder_time) = input.reminder_time {
        preferences.insert("reminder_time".into(), reminder_time.into());
    }
    if let Some(language) = input.language {
        preferences.insert("language".into(), language.into());
    }
    if let Some(sound_effects) = input.sound_effects {
        preferences.insert("sound_effects".into(), sound_effects.into());
    }

    let preferences = serde_json::Value::Object(preferences);
    let updated = UserRepo::update_preferences(&state.pool, auth.user_id, &preferences)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: updated.preferences,
    }))
}
