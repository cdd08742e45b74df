//! Face detection stage.
//!
//! Wraps a [`FaceDetector`] with face-size bounds and picks the primary face.

#![allow(clippy::cast_precision_loss)]

use std::sync::Arc;

use anyhow::{ensure, Result};
use tracing::debug;

use crate::domain::{primary_face, FaceDetection, ImageBuffer, MetricExtractor};
use crate::error::Stage;
use crate::ports::FaceDetector;

/// Face size bounds, as fractions of the image's short side.
#[derive(Debug, Clone)]
pub struct FaceConfig {
    /// Smallest accepted face side.
    pub min_face_fraction: f32,
    /// Largest accepted face side.
    pub max_face_fraction: f32,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            min_face_fraction: 0.05,
            max_face_fraction: 1.0,
        }
    }
}

/// Detects faces and selects the one used for the pose check.
pub struct FaceDetectionStage {
    detector: Arc<dyn FaceDetector>,
    config: FaceConfig,
}

impl FaceDetectionStage {
    /// Creates a new face detection stage around a shared detector.
    #[must_use]
    pub fn new(detector: Arc<dyn FaceDetector>, config: FaceConfig) -> Self {
        Self { detector, config }
    }

    /// Returns the stage configuration.
    #[must_use]
    pub const fn config(&self) -> &FaceConfig {
        &self.config
    }

    fn within_bounds(&self, face: &FaceDetection, short_side: f32) -> bool {
        let side = face.bbox.width.max(face.bbox.height) as f32 / short_side;
        (self.config.min_face_fraction..=self.config.max_face_fraction).contains(&side)
    }
}

impl MetricExtractor for FaceDetectionStage {
    type Output = Option<FaceDetection>;

    fn stage(&self) -> Stage {
        Stage::FaceDetection
    }

    fn extract(&self, image: &ImageBuffer) -> Result<Option<FaceDetection>> {
        ensure!(
            self.config.min_face_fraction <= self.config.max_face_fraction,
            "min_face_fraction {} exceeds max_face_fraction {}",
            self.config.min_face_fraction,
            self.config.max_face_fraction
        );

        let detections = self.detector.detect(image)?;
        let short_side = image.width().min(image.height()) as f32;
        let candidates: Vec<FaceDetection> = detections
            .into_iter()
            .filter(|face| {
                let keep = self.within_bounds(face, short_side);
                if !keep {
                    debug!("Skipping face outside size bounds: {:?}", face.bbox);
                }
                keep
            })
            .collect();

        debug!("Found {} faces", candidates.len());
        Ok(primary_face(&candidates).cloned())
    }
}

/// A detector that never finds a face.
///
/// Used when face detection is switched off; every evaluation then reports
/// no face.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledFaceDetector;

impl FaceDetector for DisabledFaceDetector {
    fn detect(&self, _image: &ImageBuffer) -> Result<Vec<FaceDetection>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::BoundingBox;
    use image::DynamicImage;

    struct FixedDetector(Vec<FaceDetection>);

    impl FaceDetector for FixedDetector {
        fn detect(&self, _image: &ImageBuffer) -> Result<Vec<FaceDetection>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenDetector;

    impl FaceDetector for BrokenDetector {
        fn detect(&self, _image: &ImageBuffer) -> Result<Vec<FaceDetection>> {
            anyhow::bail!("inference failed")
        }
    }

    fn face(x: u32, y: u32, size: u32, confidence: f32) -> FaceDetection {
        FaceDetection {
            bbox: BoundingBox {
                x,
                y,
                width: size,
                height: size,
            },
            confidence,
            landmarks: None,
        }
    }

    fn image() -> ImageBuffer {
        ImageBuffer::from_image(DynamicImage::new_rgb8(400, 300)).unwrap()
    }

    fn stage(faces: Vec<FaceDetection>) -> FaceDetectionStage {
        FaceDetectionStage::new(Arc::new(FixedDetector(faces)), FaceConfig::default())
    }

    #[test]
    fn test_no_faces() {
        let result = stage(vec![]).extract(&image()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_picks_primary_face() {
        let faces = vec![face(10, 10, 60, 0.8), face(150, 80, 120, 0.97)];
        let primary = stage(faces).extract(&image()).unwrap().unwrap();
        assert_eq!(primary.bbox.x, 150);
    }

    #[test]
    fn test_filters_tiny_faces() {
        // 10px on a 300px short side is below the 5% floor
        let faces = vec![face(10, 10, 10, 0.99), face(150, 80, 100, 0.8)];
        let primary = stage(faces).extract(&image()).unwrap().unwrap();
        assert_eq!(primary.bbox.width, 100);
    }

    #[test]
    fn test_filters_oversized_faces() {
        let config = FaceConfig {
            min_face_fraction: 0.05,
            max_face_fraction: 0.5,
        };
        let detector = Arc::new(FixedDetector(vec![face(0, 0, 200, 0.9)]));
        let result = FaceDetectionStage::new(detector, config)
            .extract(&image())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_detector_error_propagates() {
        let stage = FaceDetectionStage::new(Arc::new(BrokenDetector), FaceConfig::default());
        assert!(stage.extract(&image()).is_err());
        assert_eq!(stage.stage(), Stage::FaceDetection);
    }

    #[test]
    fn test_inverted_bounds_fail() {
        let config = FaceConfig {
            min_face_fraction: 0.8,
            max_face_fraction: 0.2,
        };
        let stage = FaceDetectionStage::new(Arc::new(DisabledFaceDetector), config);
        assert!(stage.extract(&image()).is_err());
    }

    #[test]
    fn test_disabled_detector_finds_nothing() {
        let faces = DisabledFaceDetector.detect(&image()).unwrap();
        assert!(faces.is_empty());
    }
}
