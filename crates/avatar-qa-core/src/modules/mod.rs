//! Metric extractors.
//!
//! Each extractor measures one property of a decoded image independently of
//! the others.

mod blur;
mod brightness;
mod faces;
mod pose;
mod resolution;

pub use blur::{laplacian_variance, BlurConfig, BlurEstimator, LaplacianKernel, MAX_KERNEL_SIZE};
pub use brightness::{
    center_weighted_mean, to_percent, BrightnessConfig, BrightnessEstimator, MAX_LUMINANCE,
};
pub use faces::{DisabledFaceDetector, FaceConfig, FaceDetectionStage};
pub use pose::{eye_line_angle, PoseAssessment, PoseEstimator};
pub use resolution::ResolutionEstimator;
