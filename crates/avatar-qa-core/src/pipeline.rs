//! The evaluation pipeline: bytes to metrics to verdict.

use std::sync::Arc;
use std::time::Instant;

use image::ImageFormat;
use tracing::{debug, warn};

use crate::decode::{decode, sniff_format};
use crate::domain::{
    ImageBuffer, ImageDimensions, MetricExtractor, QualityMetrics, QualityReport, Thresholds,
    Upload, Verdict,
};
use crate::error::{QualityError, Stage};
use crate::modules::{
    to_percent, BlurConfig, BlurEstimator, BrightnessConfig, BrightnessEstimator, FaceConfig,
    FaceDetectionStage, PoseEstimator, ResolutionEstimator,
};
use crate::policy::evaluate;
use crate::ports::FaceDetector;

/// Extractor settings for a [`QualityPipeline`].
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Blur estimator settings.
    pub blur: BlurConfig,
    /// Brightness estimator settings.
    pub brightness: BrightnessConfig,
    /// Face size bounds.
    pub faces: FaceConfig,
}

/// Outcome of one successful evaluation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Decoded image size.
    pub dimensions: ImageDimensions,
    /// Extracted measurements.
    pub metrics: QualityMetrics,
    /// Accept/reject decision.
    pub verdict: Verdict,
}

impl Evaluation {
    /// Turns the evaluation into a serializable report.
    #[must_use]
    pub fn into_report(self, name: impl Into<String>, timestamp: impl Into<String>) -> QualityReport {
        QualityReport::new(
            name,
            timestamp,
            self.dimensions,
            &self.metrics,
            &self.verdict,
        )
    }
}

/// Stateless avatar quality pipeline.
///
/// Holds only configuration and the shared face detector, so one instance
/// can serve concurrent evaluations.
pub struct QualityPipeline {
    blur: BlurEstimator,
    brightness: BrightnessEstimator,
    resolution: ResolutionEstimator,
    faces: FaceDetectionStage,
    pose: PoseEstimator,
    thresholds: Thresholds,
}

impl QualityPipeline {
    /// Creates a pipeline with default thresholds.
    #[must_use]
    pub fn new(detector: Arc<dyn FaceDetector>, config: PipelineConfig) -> Self {
        Self::with_thresholds(detector, config, Thresholds::default())
    }

    /// Creates a pipeline with explicit default thresholds.
    #[must_use]
    pub fn with_thresholds(
        detector: Arc<dyn FaceDetector>,
        config: PipelineConfig,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            blur: BlurEstimator::new(config.blur),
            brightness: BrightnessEstimator::new(config.brightness),
            resolution: ResolutionEstimator,
            faces: FaceDetectionStage::new(detector, config.faces),
            pose: PoseEstimator,
            thresholds,
        }
    }

    /// Thresholds used when a call does not override them.
    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Runs every extractor over a decoded image.
    ///
    /// A failing extractor is logged and recorded in
    /// [`QualityMetrics::failed_stages`]; the others still run.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError::Internal`] only if every extractor failed.
    pub fn measure(&self, image: &ImageBuffer) -> Result<QualityMetrics, QualityError> {
        let mut failures = StageFailures::default();

        let blur_score = failures.run(&self.blur, image).unwrap_or(0.0);
        let brightness = failures
            .run(&self.brightness, image)
            .map_or(0.0, to_percent);
        let resolution = failures.run(&self.resolution, image).unwrap_or(0);
        let face = failures.run(&self.faces, image).flatten();
        let pose_angle = self.pose.estimate(face.as_ref());

        if failures.stages.len() == EXTRACTOR_COUNT {
            let (stage, message) = failures.first.unwrap_or((Stage::Blur, String::new()));
            return Err(QualityError::Internal { stage, message });
        }

        Ok(QualityMetrics {
            blur_score,
            brightness,
            resolution,
            face_detected: face.is_some(),
            pose_angle,
            failed_stages: failures.stages,
        })
    }

    /// Measures and judges an already decoded image.
    ///
    /// # Errors
    ///
    /// See [`QualityPipeline::measure`].
    pub fn evaluate_image(
        &self,
        image: &ImageBuffer,
        thresholds: Option<&Thresholds>,
    ) -> Result<Evaluation, QualityError> {
        let thresholds = thresholds.unwrap_or(&self.thresholds);
        let metrics = self.measure(image)?;
        let verdict = evaluate(&metrics, thresholds);
        let (width, height) = image.dimensions();
        Ok(Evaluation {
            dimensions: ImageDimensions::new(width, height),
            metrics,
            verdict,
        })
    }

    /// Decodes and evaluates encoded image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError::Decode`] before any metric is computed if the
    /// bytes cannot be decoded.
    pub fn evaluate_bytes(
        &self,
        bytes: &[u8],
        thresholds: Option<&Thresholds>,
    ) -> Result<Evaluation, QualityError> {
        let start = Instant::now();
        let image = decode(bytes)?;
        let evaluation = self.evaluate_image(&image, thresholds)?;
        debug!(
            accepted = evaluation.verdict.accepted,
            elapsed_ms = start.elapsed().as_millis(),
            "Evaluation finished"
        );
        Ok(evaluation)
    }

    /// Evaluates an upload, warning when its declared content type disagrees
    /// with the sniffed format.
    ///
    /// # Errors
    ///
    /// See [`QualityPipeline::evaluate_bytes`].
    pub fn evaluate_upload(
        &self,
        upload: &Upload,
        thresholds: Option<&Thresholds>,
    ) -> Result<Evaluation, QualityError> {
        if let Some(declared) = upload.content_type.as_deref() {
            check_content_type(&upload.name, declared, sniff_format(&upload.bytes));
        }
        self.evaluate_bytes(&upload.bytes, thresholds)
    }
}

/// Blur, brightness, resolution and face detection.
const EXTRACTOR_COUNT: usize = 4;

#[derive(Default)]
struct StageFailures {
    stages: Vec<Stage>,
    first: Option<(Stage, String)>,
}

impl StageFailures {
    fn run<E: MetricExtractor>(&mut self, extractor: &E, image: &ImageBuffer) -> Option<E::Output> {
        match extractor.extract(image) {
            Ok(value) => Some(value),
            Err(e) => {
                let stage = extractor.stage();
                warn!(%stage, "Stage failed: {e:#}");
                self.stages.push(stage);
                self.first.get_or_insert_with(|| (stage, format!("{e:#}")));
                None
            }
        }
    }
}

fn check_content_type(name: &str, declared: &str, sniffed: Option<ImageFormat>) -> bool {
    let declared_format = ImageFormat::from_mime_type(declared);
    let matches = declared_format.is_some() && declared_format == sniffed;
    if !matches {
        warn!(
            "Declared content type {declared} of {name} does not match sniffed format {}",
            sniffed.map_or("unknown", |f| f.to_mime_type())
        );
    }
    matches
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::{BoundingBox, FaceDetection, FaceLandmarks, FailureReason, Point};
    use crate::modules::DisabledFaceDetector;
    use image::{DynamicImage, GrayImage, Luma};

    struct CenteredFace {
        tilt: f32,
    }

    impl FaceDetector for CenteredFace {
        fn detect(&self, image: &ImageBuffer) -> anyhow::Result<Vec<FaceDetection>> {
            let (w, h) = image.dimensions();
            let side = w.min(h) / 2;
            let (x, y) = ((w - side) / 2, (h - side) / 2);
            let (cx, cy) = (x as f32 + side as f32 / 2.0, y as f32 + side as f32 / 3.0);
            let half = side as f32 / 4.0;
            Ok(vec![FaceDetection {
                bbox: BoundingBox {
                    x,
                    y,
                    width: side,
                    height: side,
                },
                confidence: 0.95,
                landmarks: Some(FaceLandmarks {
                    left_eye: Point::new(cx - half, cy - self.tilt),
                    right_eye: Point::new(cx + half, cy + self.tilt),
                    nose: Point::new(cx, cy + half),
                }),
            }])
        }
    }

    struct BrokenDetector;

    impl FaceDetector for BrokenDetector {
        fn detect(&self, _image: &ImageBuffer) -> anyhow::Result<Vec<FaceDetection>> {
            anyhow::bail!("model crashed")
        }
    }

    fn textured(width: u32, height: u32) -> ImageBuffer {
        let img = GrayImage::from_fn(width, height, |x, y| {
            Luma([if (x / 4 + y / 4) % 2 == 0 { 200 } else { 60 }])
        });
        ImageBuffer::from_image(DynamicImage::ImageLuma8(img)).unwrap()
    }

    fn pipeline(detector: Arc<dyn FaceDetector>) -> QualityPipeline {
        QualityPipeline::new(detector, PipelineConfig::default())
    }

    #[test]
    fn test_sharp_frontal_accepted() {
        let p = pipeline(Arc::new(CenteredFace { tilt: 0.0 }));
        let evaluation = p.evaluate_image(&textured(640, 480), None).unwrap();
        assert!(evaluation.verdict.accepted, "{:?}", evaluation.verdict);
        assert!(evaluation.metrics.face_detected);
        assert_eq!(evaluation.metrics.pose_angle, Some(0.0));
    }

    #[test]
    fn test_tilted_face_rejected() {
        let p = pipeline(Arc::new(CenteredFace { tilt: 40.0 }));
        let evaluation = p.evaluate_image(&textured(640, 480), None).unwrap();
        assert_eq!(evaluation.verdict.reasons, vec![FailureReason::NotFrontal]);
    }

    #[test]
    fn test_disabled_detector_reports_no_face() {
        let p = pipeline(Arc::new(DisabledFaceDetector));
        let evaluation = p.evaluate_image(&textured(640, 480), None).unwrap();
        assert_eq!(evaluation.verdict.reasons, vec![FailureReason::NoFace]);
        assert_eq!(evaluation.metrics.pose_angle, None);
    }

    #[test]
    fn test_detector_failure_is_isolated() {
        let p = pipeline(Arc::new(BrokenDetector));
        let evaluation = p.evaluate_image(&textured(640, 480), None).unwrap();
        assert_eq!(evaluation.metrics.failed_stages, vec![Stage::FaceDetection]);
        assert_eq!(evaluation.verdict.reasons, vec![FailureReason::NoFace]);
    }

    #[test]
    fn test_invalid_blur_kernel_fails_blur_only() {
        let config = PipelineConfig {
            blur: BlurConfig { kernel_size: 2 },
            ..Default::default()
        };
        let p = QualityPipeline::new(Arc::new(CenteredFace { tilt: 0.0 }), config);
        let evaluation = p.evaluate_image(&textured(640, 480), None).unwrap();
        assert_eq!(evaluation.metrics.failed_stages, vec![Stage::Blur]);
        assert_eq!(evaluation.verdict.reasons, vec![FailureReason::TooBlurry]);
    }

    #[test]
    fn test_threshold_override() {
        let p = pipeline(Arc::new(CenteredFace { tilt: 0.0 }));
        let strict = Thresholds {
            resolution_min: 1000,
            ..Thresholds::default()
        };
        let evaluation = p.evaluate_image(&textured(640, 480), Some(&strict)).unwrap();
        assert_eq!(evaluation.verdict.reasons, vec![FailureReason::LowResolution]);
    }

    #[test]
    fn test_decode_error_before_metrics() {
        let p = pipeline(Arc::new(BrokenDetector));
        let err = p.evaluate_bytes(b"\x89PNG\r\n\x1a\nbroken", None).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_content_type_check() {
        assert!(check_content_type("a.png", "image/png", Some(ImageFormat::Png)));
        assert!(!check_content_type("a.png", "image/jpeg", Some(ImageFormat::Png)));
        assert!(!check_content_type("a.png", "text/plain", None));
    }

    #[test]
    fn test_into_report() {
        let p = pipeline(Arc::new(DisabledFaceDetector));
        let report = p
            .evaluate_image(&textured(320, 320), None)
            .unwrap()
            .into_report("a.png", "2024-01-01T00:00:00Z");
        assert_eq!(report.name, "a.png");
        assert!(!report.is_acceptable);
        assert_eq!(report.reasons.len(), 1);
        assert_eq!(report.dimensions, ImageDimensions::new(320, 320));
    }

    #[test]
    fn test_pipeline_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QualityPipeline>();
    }
}
