//! Structured evaluation output.

use serde::{Deserialize, Serialize};

use super::{FailureReason, QualityMetrics, Verdict};
use crate::error::Stage;

/// Complete evaluation result for a single upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Name of the upload (file path or client-supplied name).
    pub name: String,
    /// Timestamp of evaluation (RFC 3339).
    pub timestamp: String,
    /// Decoded image dimensions.
    pub dimensions: ImageDimensions,
    /// Whether the blur check failed.
    pub is_blurry: bool,
    /// Variance of the Laplacian response.
    pub blur_score: f64,
    /// Whether a face was detected.
    pub face_detected: bool,
    /// Center-weighted brightness, `0..=100`.
    pub brightness: f64,
    /// Short-side resolution in pixels.
    pub resolution: u32,
    /// Eye-line angle in degrees, if a face with landmarks was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pose_angle: Option<f64>,
    /// Overall decision.
    pub is_acceptable: bool,
    /// Rejection reasons, in reporting order.
    pub reasons: Vec<ReasonDetail>,
    /// Extractor stages that failed and were counted as failing checks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_stages: Vec<Stage>,
}

impl QualityReport {
    /// Assembles a report from the metrics and the verdict they produced.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        timestamp: impl Into<String>,
        dimensions: ImageDimensions,
        metrics: &QualityMetrics,
        verdict: &Verdict,
    ) -> Self {
        Self {
            name: name.into(),
            timestamp: timestamp.into(),
            dimensions,
            is_blurry: verdict.has(FailureReason::TooBlurry),
            blur_score: metrics.blur_score,
            face_detected: metrics.face_detected,
            brightness: metrics.brightness,
            resolution: metrics.resolution,
            pose_angle: metrics.pose_angle,
            is_acceptable: verdict.accepted,
            reasons: verdict.reasons.iter().copied().map(ReasonDetail::from).collect(),
            failed_stages: metrics.failed_stages.clone(),
        }
    }

    /// Joins the reason messages in reporting order, for user-facing notices.
    #[must_use]
    pub fn summary(&self) -> String {
        self.reasons
            .iter()
            .map(|r| r.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A rejection reason with its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonDetail {
    /// Machine-readable reason.
    pub code: FailureReason,
    /// Human-readable message.
    pub message: String,
}

impl From<FailureReason> for ReasonDetail {
    fn from(code: FailureReason) -> Self {
        Self {
            code,
            message: code.message().to_string(),
        }
    }
}

/// Image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
