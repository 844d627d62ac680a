//! Feedback classification and improvement ranking over a metrics report.
//!
//! All thresholds here are product-defined and load-bearing: the mobile
//! client renders feedback statuses verbatim and the overall score feeds
//! ranking and best-score tracking. Change them only with the product copy.

use serde::{Deserialize, Serialize};

use crate::analysis::MetricsReport;

/// Classification for one feedback axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Excellent,
    Good,
    NeedsWork,
    Slow,
    Fast,
}

/// One axis of session feedback: status + display message, plus the raw
/// value formatted for display (absent on the overall axis).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisFeedback {
    pub status: FeedbackStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Full per-session feedback record, stored on the session row as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub pace: AxisFeedback,
    pub confidence: AxisFeedback,
    pub clarity: AxisFeedback,
    pub overall: AxisFeedback,
}

/// The skill area an improvement suggestion targets.
///
/// Serialized names match the product copy shown in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImprovementArea {
    Confidence,
    Clarity,
    Pace,
    #[serde(rename = "Filler Words")]
    FillerWords,
    Volume,
    Engagement,
    Practice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A single ranked improvement suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Improvement {
    pub area: ImprovementArea,
    pub suggestion: String,
    pub priority: Priority,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Pace band considered ideal, in words per minute.
const PACE_IDEAL_MIN: i16 = 120;
const PACE_IDEAL_MAX: i16 = 160;

/// Score cutoffs shared by the confidence, clarity, and overall axes.
const SCORE_EXCELLENT: i16 = 80;
const SCORE_GOOD: i16 = 60;

/// Classify a metrics report into per-axis feedback.
pub fn classify(report: &MetricsReport) -> Feedback {
    let pace = report.pace_wpm;
    let pace_feedback = if (PACE_IDEAL_MIN..=PACE_IDEAL_MAX).contains(&pace) {
        AxisFeedback {
            status: FeedbackStatus::Excellent,
            message: format!("Perfect pace at {pace} WPM!"),
            value: Some(format!("{pace} WPM")),
        }
    } else if pace < PACE_IDEAL_MIN {
        AxisFeedback {
            status: FeedbackStatus::Slow,
            message: format!("Try speaking faster. Current: {pace} WPM"),
            value: Some(format!("{pace} WPM")),
        }
    } else {
        AxisFeedback {
            status: FeedbackStatus::Fast,
            message: format!("Slow down slightly. Current: {pace} WPM"),
            value: Some(format!("{pace} WPM")),
        }
    };

    let confidence = report.confidence_score;
    let confidence_feedback = if confidence >= SCORE_EXCELLENT {
        AxisFeedback {
            status: FeedbackStatus::Excellent,
            message: "Great confidence level!".to_string(),
            value: Some(format!("{confidence}%")),
        }
    } else if confidence >= SCORE_GOOD {
        AxisFeedback {
            status: FeedbackStatus::Good,
            message: "Good confidence, keep practicing!".to_string(),
            value: Some(format!("{confidence}%")),
        }
    } else {
        AxisFeedback {
            status: FeedbackStatus::NeedsWork,
            message: "Focus on building confidence".to_string(),
            value: Some(format!("{confidence}%")),
        }
    };

    let clarity = report.clarity_score;
    let clarity_feedback = if clarity >= SCORE_EXCELLENT {
        AxisFeedback {
            status: FeedbackStatus::Excellent,
            message: "Very clear speech!".to_string(),
            value: Some(format!("{clarity}%")),
        }
    } else if clarity >= SCORE_GOOD {
        AxisFeedback {
            status: FeedbackStatus::Good,
            message: "Good clarity, minor improvements possible".to_string(),
            value: Some(format!("{clarity}%")),
        }
    } else {
        AxisFeedback {
            status: FeedbackStatus::NeedsWork,
            message: "Focus on enunciation and clarity".to_string(),
            value: Some(format!("{clarity}%")),
        }
    };

    let avg = (f64::from(confidence) + f64::from(clarity)) / 2.0;
    let overall = if avg >= f64::from(SCORE_EXCELLENT) {
        AxisFeedback {
            status: FeedbackStatus::Excellent,
            message: "Outstanding performance! Keep up the great work.".to_string(),
            value: None,
        }
    } else if avg >= f64::from(SCORE_GOOD) {
        AxisFeedback {
            status: FeedbackStatus::Good,
            message: "Good progress! Continue practicing to improve further.".to_string(),
            value: None,
        }
    } else {
        AxisFeedback {
            status: FeedbackStatus::NeedsWork,
            message: "Keep practicing! Focus on the highlighted areas for improvement."
                .to_string(),
            value: None,
        }
    };

    Feedback {
        pace: pace_feedback,
        confidence: confidence_feedback,
        clarity: clarity_feedback,
        overall,
    }
}

// ---------------------------------------------------------------------------
// Improvement suggestions
// ---------------------------------------------------------------------------

/// Axis score below which a high-priority suggestion is emitted.
const SUGGESTION_SCORE_CUTOFF: i16 = 70;
/// Filler count above which the filler-word suggestion triggers.
const FILLER_CUTOFF: i16 = 5;
/// Pace above which the slow-down suggestion triggers.
const PACE_FAST_CUTOFF: i16 = 180;

/// Build the ranked improvement list for a report.
///
/// Rules trigger independently; the list is ordered high to low priority
/// and is never empty (a generic keep-practicing suggestion backstops it).
pub fn improvements(report: &MetricsReport) -> Vec<Improvement> {
    let mut out = Vec::new();

    if report.confidence_score < SUGGESTION_SCORE_CUTOFF {
        out.push(Improvement {
            area: ImprovementArea::Confidence,
            suggestion: "Practice deep breathing before speaking and maintain good posture"
                .to_string(),
            priority: Priority::High,
        });
    }

    if report.clarity_score < SUGGESTION_SCORE_CUTOFF {
        out.push(Improvement {
            area: ImprovementArea::Clarity,
            suggestion: "Speak more slowly and focus on clear enunciation of each word"
                .to_string(),
            priority: Priority::High,
        });
    }

    if report.filler_breakdown.total() > FILLER_CUTOFF {
        out.push(Improvement {
            area: ImprovementArea::FillerWords,
            suggestion: "Pause instead of using filler words like \"um\" and \"like\""
                .to_string(),
            priority: Priority::Medium,
        });
    }

    if report.pace_wpm > PACE_FAST_CUTOFF {
        out.push(Improvement {
            area: ImprovementArea::Pace,
            suggestion: "Slow down your speaking rate for better comprehension".to_string(),
            priority: Priority::Medium,
        });
    }

    if out.is_empty() {
        out.push(Improvement {
            area: ImprovementArea::Practice,
            suggestion: "Continue regular practice sessions to maintain and improve your skills"
                .to_string(),
            priority: Priority::Low,
        });
    }

    out
}

// ---------------------------------------------------------------------------
// Overall score
// ---------------------------------------------------------------------------

/// Weighted blend of the four metrics, rounded half-up to an integer.
///
/// This is the canonical session score used for ranking, display, and
/// best-score tracking: 40% confidence, 30% clarity, 20% normalized pace
/// (pace/2 capped at 50), 10% volume stability.
pub fn overall_score(report: &MetricsReport) -> i16 {
    let pace_component = if report.pace_wpm > 0 {
        (f64::from(report.pace_wpm) / 2.0).min(50.0)
    } else {
        0.0
    };

    let blended = f64::from(report.confidence_score) * 0.4
        + f64::from(report.clarity_score) * 0.3
        + pace_component * 0.2
        + f64::from(report.volume_stability_score) * 0.1;

    // f64::round rounds half away from zero, which is half-up for the
    // non-negative scores involved here.
    blended.round() as i16
}
