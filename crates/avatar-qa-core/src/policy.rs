//! Policy evaluation: metrics plus thresholds to a verdict.

use crate::domain::{FailureReason, QualityMetrics, Thresholds, Verdict};
use crate::error::Stage;
use crate::modules::PoseAssessment;

/// Evaluates every check independently and collects the failures.
///
/// A stage listed in `metrics.failed_stages` fails its own check. Pose only
/// matters when a face was detected; without one, `NoFace` is reported and
/// the pose check is skipped.
#[must_use]
pub fn evaluate(metrics: &QualityMetrics, thresholds: &Thresholds) -> Verdict {
    let mut reasons = Vec::new();

    if metrics.stage_failed(Stage::Blur) || metrics.blur_score < thresholds.blur_min {
        reasons.push(FailureReason::TooBlurry);
    }

    let face_missing = metrics.stage_failed(Stage::FaceDetection) || !metrics.face_detected;
    if face_missing {
        reasons.push(FailureReason::NoFace);
    }

    let brightness_ok =
        (thresholds.brightness_low..=thresholds.brightness_high).contains(&metrics.brightness);
    if metrics.stage_failed(Stage::Brightness) || !brightness_ok {
        reasons.push(FailureReason::BadBrightness);
    }

    if metrics.stage_failed(Stage::Resolution) || metrics.resolution < thresholds.resolution_min {
        reasons.push(FailureReason::LowResolution);
    }

    let pose = if face_missing {
        PoseAssessment::Unknown
    } else {
        PoseAssessment::assess(metrics.pose_angle, thresholds.face_angle_max)
    };
    if pose == PoseAssessment::Tilted {
        reasons.push(FailureReason::NotFrontal);
    }

    Verdict::from_reasons(reasons)
}
