pub mod achievements;
pub mod auth;
pub mod health;
pub mod progress;
pub mod sessions;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                 register (public)
/// /auth/login                    login (public)
/// /auth/refresh                  refresh (public)
/// /auth/logout                   logout (requires auth)
/// /auth/me                       current user profile
///
/// /sessions/start                start a practice session (POST)
/// /sessions/{id}/upload          upload audio + analyze (POST, multipart)
/// /sessions/recent               recent completed sessions (GET)
///
/// /progress/overview             progression counters + aggregates (GET)
///
/// /achievements                  registry with unlock state (GET)
///
/// /settings                      preference document (GET)
/// /settings/preferences          merge preference update (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/sessions", sessions::router())
        .nest("/progress", progress::router())
        .nest("/achievements", achievements::router())
        .nest("/settings", settings::router())
}
