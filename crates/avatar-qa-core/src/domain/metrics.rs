//! Per-evaluation measurements.

use serde::{Deserialize, Serialize};

use super::Thresholds;
use crate::error::Stage;
use crate::policy::evaluate;

/// Measurements extracted from one decoded image.
///
/// Values of stages listed in `failed_stages` are placeholders; the policy
/// evaluator fails the corresponding check regardless of the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Variance of the Laplacian response. Lower is blurrier.
    pub blur_score: f64,
    /// Center-weighted brightness on the `0..=100` scale.
    pub brightness: f64,
    /// Length of the image's short side in pixels.
    pub resolution: u32,
    /// Whether at least one face was found.
    pub face_detected: bool,
    /// Signed eye-line angle in degrees; `None` when no landmarks were available.
    pub pose_angle: Option<f64>,
    /// Stages whose extractor failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_stages: Vec<Stage>,
}

impl QualityMetrics {
    /// Returns true if the given stage failed during extraction.
    #[must_use]
    pub fn stage_failed(&self, stage: Stage) -> bool {
        self.failed_stages.contains(&stage)
    }

    /// Returns true if the metrics pass every check under `thresholds`.
    #[must_use]
    pub fn is_acceptable(&self, thresholds: &Thresholds) -> bool {
        evaluate(self, thresholds).accepted
    }
}
