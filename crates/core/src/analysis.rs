//! Speech-analysis provider contract and the synthetic implementation.
//!
//! The session engine depends only on [`AnalysisProvider`]; whether the
//! report comes from the remote ML service or from [`SyntheticAnalyzer`]
//! is a startup configuration decision. The synthetic analyzer doubles as
//! the degraded-mode fallback when the remote provider errors or times out.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::session::{DifficultyLevel, PracticeType};

/// Context passed alongside the raw audio to every provider call.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext {
    pub level: DifficultyLevel,
    pub duration_secs: i32,
    pub practice_type: PracticeType,
}

/// Per-category filler-word counts detected in a recording.
///
/// Field names match the wire format of the ML service response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillerBreakdown {
    #[serde(default)]
    pub um: i16,
    #[serde(default)]
    pub uh: i16,
    #[serde(default)]
    pub like: i16,
    #[serde(default)]
    pub you_know: i16,
    #[serde(default)]
    pub other: i16,
}

impl FillerBreakdown {
    /// Total filler count across all categories.
    pub fn total(&self) -> i16 {
        self.um + self.uh + self.like + self.you_know + self.other
    }
}

/// Structured speech metrics returned by a provider.
///
/// Scores are 0-100 except `pace_wpm` (words per minute, 0-500).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    pub transcript: String,
    pub confidence_score: i16,
    pub clarity_score: i16,
    pub pace_wpm: i16,
    pub volume_stability_score: i16,
    pub filler_breakdown: FillerBreakdown,
}

/// Errors a provider call can fail with.
///
/// These are always recovered locally by degrading to a synthetic report;
/// they never reach the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Analysis timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Analysis provider error: {0}")]
    Provider(String),

    #[error("Invalid analysis response: {0}")]
    InvalidResponse(String),
}

/// Capability interface for speech analysis.
///
/// Implementations must treat the audio as opaque bytes; validation of
/// content type and size happens before this call (see [`crate::audio`]).
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(
        &self,
        audio: &[u8],
        ctx: &AnalysisContext,
    ) -> Result<MetricsReport, AnalysisError>;
}

// ---------------------------------------------------------------------------
// Synthetic analyzer
// ---------------------------------------------------------------------------

/// Per-level dampening applied to the sampled base scores. Harder levels
/// produce lower synthetic scores, mirroring real-session difficulty.
fn level_multipliers(level: DifficultyLevel) -> (f64, f64) {
    match level {
        DifficultyLevel::Easy => (0.8, 0.9),
        DifficultyLevel::Medium => (0.7, 0.8),
        DifficultyLevel::Hard => (0.6, 0.7),
    }
}

/// Canned transcript per practice type.
fn transcript_for(practice_type: PracticeType) -> &'static str {
    match practice_type {
        PracticeType::Freestyle => {
            "Hello everyone. I'm here to practice my public speaking skills. \
             Today I want to talk about the importance of confidence in communication."
        }
        PracticeType::Guided => {
            "Following the guided prompts, I'm working on my articulation and pacing. \
             The exercises are helping me focus on clear pronunciation."
        }
        PracticeType::Interview => {
            "Thank you for the opportunity to interview. I have experience in my field \
             and I'm passionate about contributing to your team's success."
        }
        PracticeType::Presentation => {
            "Good morning everyone. Today's presentation covers our quarterly results \
             and future projections. Let me start by outlining key achievements."
        }
    }
}

/// Generates plausible speech metrics without touching any audio.
///
/// Used as the configured provider in development and tests, and as the
/// fallback when the remote provider fails. Construct with [`with_seed`]
/// for reproducible reports.
///
/// [`with_seed`]: SyntheticAnalyzer::with_seed
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticAnalyzer {
    seed: Option<u64>,
}

impl SyntheticAnalyzer {
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// A seeded analyzer produces the same report for the same context.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Generate a report synchronously. The trait impl delegates here;
    /// the engine also calls this directly on the degraded path.
    pub fn generate(&self, ctx: &AnalysisContext) -> MetricsReport {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let (conf_mult, clarity_mult) = level_multipliers(ctx.level);

        let base_confidence: f64 = 45.0 + rng.random_range(0.0..35.0);
        let base_clarity: f64 = 50.0 + rng.random_range(0.0..35.0);

        let confidence_score = (base_confidence * conf_mult).min(100.0).round() as i16;
        let clarity_score = (base_clarity * clarity_mult).min(100.0).round() as i16;
        let volume_stability_score = (60.0_f64 + rng.random_range(0.0..35.0)).round() as i16;
        let pace_wpm = (120.0_f64 + rng.random_range(0.0..60.0)).round() as i16;

        // Weaker sessions produce more fillers.
        let filler_factor = (f64::from(100 - confidence_score) / 100.0).max(0.5);
        let total = (rng.random_range(0.0..8.0) * filler_factor).round() as i16;

        let um = (f64::from(total) * 0.3).round() as i16;
        let uh = (f64::from(total) * 0.2).round() as i16;
        let like = (f64::from(total) * 0.4).round() as i16;
        let you_know = (f64::from(total) * 0.1).round() as i16;
        let other = (total - um - uh - like - you_know).max(0);

        MetricsReport {
            transcript: transcript_for(ctx.practice_type).to_string(),
            confidence_score,
            clarity_score,
            pace_wpm,
            volume_stability_score,
            filler_breakdown: FillerBreakdown {
                um,
                uh,
                like,
                you_know,
                other,
            },
        }
    }
}

#[async_trait]
impl AnalysisProvider for SyntheticAnalyzer {
    async fn analyze(
        &self,
        _audio: &[u8],
        ctx: &AnalysisContext,
    ) -> Result<MetricsReport, AnalysisError> {
        Ok(self.generate(ctx))
    }
}
