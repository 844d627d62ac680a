//! The remote ML analysis service client.

use std::time::Duration;

use async_trait::async_trait;
use speakcoach_core::analysis::{
    AnalysisContext, AnalysisError, AnalysisProvider, MetricsReport,
};

/// Calls the external analysis service over HTTP.
///
/// The request is a multipart POST of the raw audio plus session context;
/// the response body is a JSON [`MetricsReport`]. The reqwest client's
/// timeout covers the whole call, so the engine's own timeout is a second
/// line of defense rather than the only one.
pub struct RemoteAnalyzer {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl RemoteAnalyzer {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            timeout_secs: timeout.as_secs(),
        })
    }

    /// Bounds-check a report coming off the wire. A provider returning
    /// out-of-range scores would otherwise corrupt best-score tracking.
    fn validate_report(report: &MetricsReport) -> Result<(), AnalysisError> {
        let in_score_range =
            |v: i16| (0..=100).contains(&v);

        if !in_score_range(report.confidence_score)
            || !in_score_range(report.clarity_score)
            || !in_score_range(report.volume_stability_score)
        {
            return Err(AnalysisError::InvalidResponse(
                "score outside 0-100 range".into(),
            ));
        }
        if !(0..=500).contains(&report.pace_wpm) {
            return Err(AnalysisError::InvalidResponse(
                "pace outside 0-500 range".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AnalysisProvider for RemoteAnalyzer {
    async fn analyze(
        &self,
        audio: &[u8],
        ctx: &AnalysisContext,
    ) -> Result<MetricsReport, AnalysisError> {
        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name("speech.wav")
            .mime_str("audio/wav")
            .map_err(|e| AnalysisError::Provider(format!("building multipart body: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("audio", part)
            .text("level", ctx.level.as_str())
            .text("duration", ctx.duration_secs.to_string())
            .text("practice_type", ctx.practice_type.as_str());

        let response = self
            .client
            .post(format!("{}/analyze-speech", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisError::Timeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    AnalysisError::Provider(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(AnalysisError::Provider(format!(
                "analysis service returned {}",
                response.status()
            )));
        }

        let report: MetricsReport = response
            .json()
            .await
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;

        Self::validate_report(&report)?;
        Ok(report)
    }
}
