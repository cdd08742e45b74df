//! Resolution measurement.

use anyhow::Result;
use tracing::debug;

use crate::domain::{ImageBuffer, MetricExtractor};
use crate::error::Stage;

/// Measures the short side of the image.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionEstimator;

impl MetricExtractor for ResolutionEstimator {
    type Output = u32;

    fn stage(&self) -> Stage {
        Stage::Resolution
    }

    fn extract(&self, image: &ImageBuffer) -> Result<u32> {
        let (width, height) = image.dimensions();
        let resolution = width.min(height);
        debug!(width, height, resolution, "resolution");
        Ok(resolution)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::DynamicImage;

    fn measure(width: u32, height: u32) -> u32 {
        let buffer = ImageBuffer::from_image(DynamicImage::new_luma8(width, height)).unwrap();
        ResolutionEstimator.extract(&buffer).unwrap()
    }

    #[test]
    fn test_short_side() {
        assert_eq!(measure(1024, 768), 768);
        assert_eq!(measure(150, 200), 150);
        assert_eq!(measure(512, 512), 512);
        assert_eq!(measure(1, 4000), 1);
    }
}
