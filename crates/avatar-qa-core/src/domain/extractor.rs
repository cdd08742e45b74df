//! Metric extractor trait.

use super::ImageBuffer;
use crate::error::Stage;

/// A single, independent measurement over a decoded image.
///
/// Extractors hold only configuration and are safe to share between
/// concurrent evaluations.
pub trait MetricExtractor: Send + Sync {
    /// The measured value.
    type Output;

    /// The pipeline stage this extractor implements.
    fn stage(&self) -> Stage;

    /// Measures the image.
    ///
    /// # Errors
    ///
    /// Returns an error if the measurement cannot be computed; the pipeline
    /// records the failure and fails the stage's own check.
    fn extract(&self, image: &ImageBuffer) -> anyhow::Result<Self::Output>;
}
