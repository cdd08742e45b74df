//! Synthetic image builders for testing.

use std::io::Cursor;

use avatar_qa_core::{ImageBuffer, Upload};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};

/// Builder for creating synthetic test images.
///
/// Provides convenience methods for generating images with specific
/// characteristics (sharp, blurry, dark, bright, etc.).
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    // === Sharp/High-Contrast Images ===

    /// Creates a high-contrast checkerboard pattern (very sharp edges).
    #[must_use]
    pub fn checkerboard(width: u32, height: u32) -> ImageBuffer {
        Self::checkerboard_with_cell_size(width, height, 8)
    }

    /// Creates a black and white checkerboard with custom cell size.
    #[must_use]
    pub fn checkerboard_with_cell_size(width: u32, height: u32, cell_size: u32) -> ImageBuffer {
        Self::two_tone_checkerboard(width, height, cell_size, 255, 0)
    }

    /// Creates a checkerboard alternating between two gray levels.
    ///
    /// The mean brightness is the average of the two levels, so this is the
    /// basis for sharp images at a chosen exposure.
    #[must_use]
    pub fn two_tone_checkerboard(
        width: u32,
        height: u32,
        cell_size: u32,
        light: u8,
        dark: u8,
    ) -> ImageBuffer {
        let cell = cell_size.max(1);
        gray(GrayImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Luma([light])
            } else {
                Luma([dark])
            }
        }))
    }

    /// Creates vertical bars pattern (sharp edges).
    #[must_use]
    pub fn vertical_bars(width: u32, height: u32, bar_width: u32) -> ImageBuffer {
        let bar = bar_width.max(1);
        gray(GrayImage::from_fn(width, height, |x, _| {
            if (x / bar) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        }))
    }

    /// A sharp, evenly lit photo stand-in: mid-gray texture with fine detail.
    #[must_use]
    pub fn portrait(width: u32, height: u32) -> ImageBuffer {
        Self::two_tone_checkerboard(width, height, 4, 190, 70)
    }

    // === Blurry Images ===

    /// Creates a uniform gray image (no edges, simulates severe blur).
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> ImageBuffer {
        gray(GrayImage::from_fn(width, height, |_, _| Luma([value])))
    }

    /// Creates a smooth horizontal gradient (low variance, simulates defocus).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn horizontal_gradient(width: u32, height: u32) -> ImageBuffer {
        gray(GrayImage::from_fn(width, height, |x, _| {
            Luma([((u32::from(u8::MAX) * x) / width.max(1)) as u8])
        }))
    }

    // === Brightness Images ===

    /// Sharp texture whose levels stay at or below `max_brightness`.
    #[must_use]
    pub fn dark_image(width: u32, height: u32, max_brightness: u8) -> ImageBuffer {
        Self::two_tone_checkerboard(width, height, 4, max_brightness, 0)
    }

    /// Sharp texture whose levels stay at or above `min_brightness`.
    #[must_use]
    pub fn bright_image(width: u32, height: u32, min_brightness: u8) -> ImageBuffer {
        Self::two_tone_checkerboard(width, height, 4, 255, min_brightness)
    }

    /// Bright disc in the center of a dark frame.
    #[must_use]
    pub fn bright_center(width: u32, height: u32) -> ImageBuffer {
        Self::disc(width, height, 240, 15)
    }

    /// Dark disc in the center of a bright frame.
    #[must_use]
    pub fn dark_center(width: u32, height: u32) -> ImageBuffer {
        Self::disc(width, height, 15, 240)
    }

    #[allow(clippy::cast_precision_loss)]
    fn disc(width: u32, height: u32, inside: u8, outside: u8) -> ImageBuffer {
        let (cx, cy) = ((width / 2) as f32, (height / 2) as f32);
        let radius = width.min(height) as f32 / 4.0;
        gray(GrayImage::from_fn(width, height, |x, y| {
            let d = (x as f32 - cx).hypot(y as f32 - cy);
            Luma([if d < radius { inside } else { outside }])
        }))
    }

    // === Special Test Images ===

    /// Creates a 1x1 pixel image (edge case).
    #[must_use]
    pub fn single_pixel(value: u8) -> ImageBuffer {
        Self::uniform_gray(1, 1, value)
    }

    /// Creates an RGB color image.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> ImageBuffer {
        let img = RgbImage::from_fn(width, height, |_, _| Rgb([r, g, b]));
        wrap(DynamicImage::ImageRgb8(img))
    }
}

/// Encoding helpers for tests that go through the decoder.
impl SyntheticImageBuilder {
    /// Encodes an image in the given format.
    ///
    /// # Panics
    ///
    /// Panics if the encoder rejects the image.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn encode(image: &ImageBuffer, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .image()
            .write_to(&mut Cursor::new(&mut bytes), format)
            .expect("synthetic image should encode");
        bytes
    }

    /// Encodes an image as PNG.
    #[must_use]
    pub fn png_bytes(image: &ImageBuffer) -> Vec<u8> {
        Self::encode(image, ImageFormat::Png)
    }

    /// Wraps an image as a PNG upload with a matching content type.
    #[must_use]
    pub fn png_upload(name: &str, image: &ImageBuffer) -> Upload {
        Upload::new(name, Self::png_bytes(image)).with_content_type("image/png")
    }
}

fn gray(img: GrayImage) -> ImageBuffer {
    wrap(DynamicImage::ImageLuma8(img))
}

#[allow(clippy::expect_used)]
fn wrap(image: DynamicImage) -> ImageBuffer {
    ImageBuffer::from_image(image).expect("synthetic images are never empty")
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checkerboard_dimensions() {
        let img = SyntheticImageBuilder::checkerboard(100, 80);
        assert_eq!(img.dimensions(), (100, 80));
    }

    #[test]
    fn test_checkerboard_pattern() {
        let img = SyntheticImageBuilder::checkerboard_with_cell_size(16, 16, 8);
        let luma = img.to_luma8();

        // Top-left cell (0,0) should be white (255)
        assert_eq!(luma.get_pixel(0, 0).0[0], 255);
        // Next cell should be black (0)
        assert_eq!(luma.get_pixel(8, 0).0[0], 0);
    }

    #[test]
    fn test_uniform_gray() {
        let img = SyntheticImageBuilder::uniform_gray(50, 50, 100);
        assert!(img.to_luma8().pixels().all(|p| p.0[0] == 100));
    }

    #[test]
    fn test_gradient_range() {
        let luma = SyntheticImageBuilder::horizontal_gradient(256, 10).to_luma8();
        assert!(luma.get_pixel(0, 0).0[0] < 5);
        assert!(luma.get_pixel(255, 0).0[0] > 250);
    }

    #[test]
    fn test_dark_and_bright_levels() {
        let dark = SyntheticImageBuilder::dark_image(16, 16, 20).to_luma8();
        let bright = SyntheticImageBuilder::bright_image(16, 16, 235).to_luma8();
        assert!(dark.pixels().all(|p| p.0[0] <= 20));
        assert!(bright.pixels().all(|p| p.0[0] >= 235));
    }

    #[test]
    fn test_bright_center_layout() {
        let luma = SyntheticImageBuilder::bright_center(100, 60).to_luma8();
        assert_eq!(luma.get_pixel(50, 30).0[0], 240);
        assert_eq!(luma.get_pixel(0, 0).0[0], 15);
    }

    #[test]
    fn test_single_pixel() {
        let img = SyntheticImageBuilder::single_pixel(42);
        assert_eq!(img.dimensions(), (1, 1));
        assert_eq!(img.to_luma8().get_pixel(0, 0).0[0], 42);
    }

    #[test]
    fn test_rgb_image() {
        let img = SyntheticImageBuilder::rgb_uniform(10, 10, 255, 0, 128);
        assert_eq!(img.image().color().channel_count(), 3);
        assert_eq!(img.image().to_rgb8().get_pixel(5, 5).0, [255, 0, 128]);
    }

    #[test]
    fn test_png_upload_decodes() {
        let img = SyntheticImageBuilder::portrait(40, 30);
        let upload = SyntheticImageBuilder::png_upload("p.png", &img);
        assert_eq!(upload.content_type.as_deref(), Some("image/png"));
        let decoded = avatar_qa_core::decode(&upload.bytes).expect("decodes");
        assert_eq!(decoded.dimensions(), (40, 30));
    }
}
