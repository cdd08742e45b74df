//! Core domain types for avatar quality evaluation.

mod buffer;
mod extractor;
mod face;
mod metrics;
mod report;
mod thresholds;
mod upload;
mod verdict;

pub use buffer::ImageBuffer;
pub use extractor::MetricExtractor;
pub use face::{primary_face, BoundingBox, FaceDetection, FaceLandmarks, Point};
pub use metrics::QualityMetrics;
pub use report::{ImageDimensions, QualityReport, ReasonDetail};
pub use thresholds::{Preset, Thresholds};
pub use upload::Upload;
pub use verdict::{FailureReason, Verdict};
