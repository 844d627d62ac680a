//! Analysis provider construction.
//!
//! The engine depends only on `Arc<dyn AnalysisProvider>`; which
//! implementation backs it is decided once at startup from configuration.

pub mod remote;

use std::sync::Arc;

use speakcoach_core::analysis::{AnalysisProvider, SyntheticAnalyzer};

use crate::config::{AnalysisConfig, AnalysisMode};

pub use remote::RemoteAnalyzer;

/// Build the configured analysis provider.
pub fn build_provider(
    config: &AnalysisConfig,
) -> Result<Arc<dyn AnalysisProvider>, reqwest::Error> {
    match config.mode {
        AnalysisMode::Synthetic => Ok(Arc::new(SyntheticAnalyzer::new())),
        AnalysisMode::Remote => {
            let remote = RemoteAnalyzer::new(config.base_url.clone(), config.timeout())?;
            Ok(Arc::new(remote))
        }
    }
}
