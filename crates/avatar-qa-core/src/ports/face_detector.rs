//! Face detector port.

use crate::domain::{FaceDetection, ImageBuffer};

/// Finds faces in a decoded image.
///
/// Implementations are loaded once and shared read-only between concurrent
/// evaluations.
pub trait FaceDetector: Send + Sync {
    /// Returns every face found, in pixel coordinates of `image`.
    ///
    /// An image without faces yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if inference itself fails.
    fn detect(&self, image: &ImageBuffer) -> anyhow::Result<Vec<FaceDetection>>;
}
