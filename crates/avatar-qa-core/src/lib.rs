//! Avatar QA Core - domain logic and the evaluation pipeline
//!
//! This crate decodes uploaded photos, measures blur, brightness, resolution,
//! face presence and head tilt, and turns the measurements into an
//! accept/reject verdict with ordered reasons.

pub mod decode;
pub mod domain;
pub mod error;
pub mod inference;
pub mod modules;
pub mod pipeline;
pub mod policy;
pub mod ports;

pub use decode::decode;
pub use domain::{
    primary_face, BoundingBox, FaceDetection, FaceLandmarks, FailureReason, ImageBuffer,
    ImageDimensions, MetricExtractor, Point, Preset, QualityMetrics, QualityReport, ReasonDetail,
    Thresholds, Upload, Verdict,
};
pub use error::{DecodeError, QualityError, Stage};
pub use inference::{BlazeFaceDetector, DetectorConfig};
pub use modules::{
    BlurConfig, BrightnessConfig, DisabledFaceDetector, FaceConfig, PoseAssessment,
};
pub use pipeline::{Evaluation, PipelineConfig, QualityPipeline};
pub use policy::evaluate;
pub use ports::{FaceDetector, ProgressEvent, ProgressSink, ResultOutput, UploadSource};
