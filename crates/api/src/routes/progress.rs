//! Route definitions for the `/progress` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/progress`.
pub fn router() -> Router<AppState> {
    Router::new().route("/overview", get(progress::overview))
}
