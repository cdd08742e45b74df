//! Decoded pixel grid.

use image::{DynamicImage, GenericImageView, GrayImage};

use crate::error::DecodeError;

/// An immutable decoded image.
///
/// Both dimensions are always at least one pixel; construction fails otherwise,
/// so extractors never see an empty grid.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    image: DynamicImage,
}

impl ImageBuffer {
    /// Wraps an already decoded image.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ZeroSized`] if either dimension is zero.
    pub fn from_image(image: DynamicImage) -> Result<Self, DecodeError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(DecodeError::ZeroSized);
        }
        Ok(Self {
            width,
            height,
            image,
        })
    }

    /// Image width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The underlying decoded image.
    #[must_use]
    pub const fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Converts to 8-bit luminance.
    #[must_use]
    pub fn to_luma8(&self) -> GrayImage {
        self.image.to_luma8()
    }
}
