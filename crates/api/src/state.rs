use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::SessionEngine;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: speakcoach_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The session lifecycle engine (per-user locks, analysis, progression).
    pub engine: Arc<SessionEngine>,
}
