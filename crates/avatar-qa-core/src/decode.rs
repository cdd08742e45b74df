//! Byte-stream decoding.
//!
//! The format is always sniffed from the leading bytes; a content type
//! declared by the uploader is never trusted.

use std::io::Cursor;

use image::error::{ImageError, LimitErrorKind};
use image::{ImageFormat, ImageReader, Limits};
use tracing::debug;

use crate::domain::ImageBuffer;
use crate::error::DecodeError;

/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 16_384;

/// Largest decoder allocation, in bytes.
pub const MAX_ALLOC: u64 = 512 * 1024 * 1024;

/// Detects the image format from magic bytes.
#[must_use]
pub fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Decodes an encoded raster image.
///
/// # Errors
///
/// Returns a [`DecodeError`] for empty input, unknown or unsupported formats,
/// truncated or corrupt data, oversized images and zero-sized images.
pub fn decode(bytes: &[u8]) -> Result<ImageBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let format = sniff_format(bytes).ok_or(DecodeError::UnknownFormat)?;
    debug!("Sniffed {format:?} ({} bytes)", bytes.len());

    // The JPEG decoder pads a cut-off scan instead of failing
    if format == ImageFormat::Jpeg && !has_jpeg_eoi(bytes) {
        return Err(DecodeError::Corrupt("missing JPEG end-of-image marker".into()));
    }

    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_DIMENSION);
    limits.max_image_height = Some(MAX_DIMENSION);
    limits.max_alloc = Some(MAX_ALLOC);

    let mut reader = ImageReader::with_format(Cursor::new(bytes), format);
    reader.limits(limits);

    let image = reader.decode().map_err(map_image_error)?;
    ImageBuffer::from_image(image)
}

/// True if the stream ends with `FF D9`, ignoring trailing zero or whitespace padding.
fn has_jpeg_eoi(bytes: &[u8]) -> bool {
    let end = bytes
        .iter()
        .rposition(|b| !matches!(b, 0x00 | b' ' | b'\t' | b'\r' | b'\n'))
        .map_or(0, |i| i + 1);
    bytes[..end].ends_with(&[0xFF, 0xD9])
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(e) => DecodeError::Unsupported(e.to_string()),
        ImageError::Limits(e) => match e.kind() {
            LimitErrorKind::DimensionError | LimitErrorKind::InsufficientMemory => {
                DecodeError::TooLarge(e.to_string())
            }
            _ => DecodeError::Unsupported(e.to_string()),
        },
        other => DecodeError::Corrupt(other.to_string()),
    }
}
