//! Frontal pose estimation from eye landmarks.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{FaceDetection, FaceLandmarks};

/// Pose of the primary face relative to a tilt tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseAssessment {
    /// No face or no landmarks; the pose check does not apply.
    Unknown,
    /// Eye line within tolerance.
    Frontal,
    /// Eye line tilted beyond tolerance.
    Tilted,
}

impl PoseAssessment {
    /// Classifies a measured angle. Frontal iff `|angle| < max_angle`.
    #[must_use]
    pub fn assess(angle: Option<f64>, max_angle: f64) -> Self {
        match angle {
            None => Self::Unknown,
            Some(a) if a.abs() < max_angle => Self::Frontal,
            Some(_) => Self::Tilted,
        }
    }
}

/// Signed angle of the eye line against the horizontal, in degrees.
///
/// Runs from the image-left eye to the image-right eye; positive when the
/// right eye sits lower in the image.
#[must_use]
pub fn eye_line_angle(landmarks: &FaceLandmarks) -> f64 {
    let dx = f64::from(landmarks.right_eye.x) - f64::from(landmarks.left_eye.x);
    let dy = f64::from(landmarks.right_eye.y) - f64::from(landmarks.left_eye.y);
    dy.atan2(dx).to_degrees()
}

/// Measures the eye-line angle of a detected face.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseEstimator;

impl PoseEstimator {
    /// Returns the angle of `face`, or `None` when there is no face or it has
    /// no landmarks.
    #[must_use]
    pub fn estimate(&self, face: Option<&FaceDetection>) -> Option<f64> {
        let landmarks = face?.landmarks.as_ref()?;
        let angle = eye_line_angle(landmarks);
        debug!(angle, "eye-line angle");
        Some(angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BoundingBox, Point};

    fn landmarks(left: (f32, f32), right: (f32, f32)) -> FaceLandmarks {
        FaceLandmarks {
            left_eye: Point::new(left.0, left.1),
            right_eye: Point::new(right.0, right.1),
            nose: Point::new((left.0 + right.0) / 2.0, left.1 + 20.0),
        }
    }

    #[test]
    fn test_level_eyes_are_zero() {
        let angle = eye_line_angle(&landmarks((100.0, 50.0), (160.0, 50.0)));
        assert!(angle.abs() < 1e-9);
    }

    #[test]
    fn test_signed_angle() {
        let down = eye_line_angle(&landmarks((0.0, 0.0), (10.0, 10.0)));
        assert!((down - 45.0).abs() < 1e-9);
        let up = eye_line_angle(&landmarks((0.0, 10.0), (10.0, 0.0)));
        assert!((up + 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_landmarks() {
        // Coincident eyes
        let same = eye_line_angle(&landmarks((5.0, 5.0), (5.0, 5.0)));
        assert!(same.abs() < 1e-9);
        // Vertical eye line
        let vertical = eye_line_angle(&landmarks((5.0, 0.0), (5.0, 10.0)));
        assert!((vertical - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_swapped_eyes_are_not_frontal() {
        let angle = eye_line_angle(&landmarks((160.0, 50.0), (100.0, 50.0)));
        assert!((angle.abs() - 180.0).abs() < 1e-9);
        assert_eq!(PoseAssessment::assess(Some(angle), 25.0), PoseAssessment::Tilted);
    }

    #[test]
    fn test_assess_is_strict() {
        assert_eq!(PoseAssessment::assess(None, 25.0), PoseAssessment::Unknown);
        assert_eq!(PoseAssessment::assess(Some(24.9), 25.0), PoseAssessment::Frontal);
        assert_eq!(PoseAssessment::assess(Some(-24.9), 25.0), PoseAssessment::Frontal);
        assert_eq!(PoseAssessment::assess(Some(25.0), 25.0), PoseAssessment::Tilted);
        assert_eq!(PoseAssessment::assess(Some(-30.0), 25.0), PoseAssessment::Tilted);
    }

    #[test]
    fn test_estimate_requires_landmarks() {
        let mut face = FaceDetection {
            bbox: BoundingBox {
                x: 0,
                y: 0,
                width: 100,
                height: 100,
            },
            confidence: 0.9,
            landmarks: None,
        };
        assert_eq!(PoseEstimator.estimate(None), None);
        assert_eq!(PoseEstimator.estimate(Some(&face)), None);

        face.landmarks = Some(landmarks((30.0, 40.0), (70.0, 40.0)));
        assert_eq!(PoseEstimator.estimate(Some(&face)), Some(0.0));
    }
}
