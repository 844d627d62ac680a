//! Route definitions for the `/sessions` resource.
//!
//! All endpoints require authentication.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Upload body limit: the 10 MiB audio cap plus multipart overhead.
const UPLOAD_BODY_LIMIT: usize = 12 * 1024 * 1024;

/// Routes mounted at `/sessions`.
///
/// ```text
/// POST   /start          -> start_session
/// POST   /{id}/upload    -> upload_audio (multipart)
/// GET    /recent         -> recent_sessions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(sessions::start_session))
        .route(
            "/{id}/upload",
            post(sessions::upload_audio).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/recent", get(sessions::recent_sessions))
}
