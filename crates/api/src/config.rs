use std::time::Duration;

use crate::auth::jwt::JwtConfig;

/// Which analysis provider implementation to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Deterministic synthetic reports; no external service involved.
    Synthetic,
    /// The remote ML analysis service, with the synthetic analyzer as the
    /// degraded-mode fallback.
    Remote,
}

/// Analysis provider configuration.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub mode: AnalysisMode,
    /// Base URL of the remote analysis service.
    pub base_url: String,
    /// Budget for one provider call, including connection setup.
    pub timeout_secs: u64,
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`). Must comfortably
    /// exceed the analysis timeout so uploads are not cut off mid-analysis.
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Analysis provider selection and budget.
    pub analysis: AnalysisConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `60`                       |
    /// | `ANALYSIS_MODE`         | `synthetic`                |
    /// | `ANALYSIS_SERVICE_URL`  | `http://localhost:8000`    |
    /// | `ANALYSIS_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let analysis_mode = match std::env::var("ANALYSIS_MODE")
            .unwrap_or_else(|_| "synthetic".into())
            .to_lowercase()
            .as_str()
        {
            "remote" => AnalysisMode::Remote,
            "synthetic" => AnalysisMode::Synthetic,
            other => panic!("ANALYSIS_MODE must be 'synthetic' or 'remote', got '{other}'"),
        };

        let analysis_base_url = std::env::var("ANALYSIS_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".into());

        let analysis_timeout_secs: u64 = std::env::var("ANALYSIS_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("ANALYSIS_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            analysis: AnalysisConfig {
                mode: analysis_mode,
                base_url: analysis_base_url,
                timeout_secs: analysis_timeout_secs,
            },
        }
    }
}
