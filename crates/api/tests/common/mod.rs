use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::PgPool;

use speakcoach_api::auth::jwt::JwtConfig;
use speakcoach_api::config::{AnalysisConfig, AnalysisMode, ServerConfig};
use speakcoach_api::engine::SessionEngine;
use speakcoach_api::routes;
use speakcoach_api::state::AppState;
use speakcoach_core::analysis::SyntheticAnalyzer;

/// Build a test `ServerConfig` with safe defaults and a known JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 30,
        },
        analysis: AnalysisConfig {
            mode: AnalysisMode::Synthetic,
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 5,
        },
    }
}

/// Build the application router with the given database pool and the
/// synthetic analysis provider.
///
/// This mirrors the router construction in `main.rs` (minus the outer
/// middleware layers, which are exercised in production configuration)
/// so integration tests hit the same routes and extractors.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let engine = Arc::new(SessionEngine::new(
        pool.clone(),
        Arc::new(SyntheticAnalyzer::with_seed(42)),
        Duration::from_secs(config.analysis.timeout_secs),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config),
        engine,
    };

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .with_state(state)
}
