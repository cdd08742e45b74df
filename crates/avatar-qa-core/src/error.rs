//! Error types for the evaluation pipeline.
//!
//! A rejected avatar is not an error: it is a [`Verdict`](crate::Verdict)
//! with reasons. Only undecodable input and total extractor breakdown
//! surface as errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The upload could not be turned into an [`ImageBuffer`](crate::ImageBuffer).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Zero-length input.
    #[error("upload is empty")]
    Empty,
    /// The leading bytes match no known raster format.
    #[error("unrecognized image format")]
    UnknownFormat,
    /// The format was recognized but cannot be decoded by this build.
    #[error("unsupported image format: {0}")]
    Unsupported(String),
    /// Truncated or otherwise malformed image data.
    #[error("image data is corrupt or truncated: {0}")]
    Corrupt(String),
    /// Dimensions or allocation exceed the decoder limits.
    #[error("image exceeds decoder limits: {0}")]
    TooLarge(String),
    /// The image decoded to a zero-width or zero-height grid.
    #[error("image has zero-sized dimensions")]
    ZeroSized,
}

/// Fallible pipeline stages, used for logging and for recording extractor failures.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Laplacian-variance sharpness.
    Blur,
    /// Center-weighted luminance.
    Brightness,
    /// Short-side resolution.
    Resolution,
    /// Face detection.
    FaceDetection,
}

impl Stage {
    /// Stable lowercase name of the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Brightness => "brightness",
            Self::Resolution => "resolution",
            Self::FaceDetection => "face_detection",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`QualityPipeline`](crate::QualityPipeline).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum QualityError {
    /// Input bytes are not a decodable image. No metrics were computed.
    #[error("failed to decode image: {0}")]
    Decode(#[from] DecodeError),
    /// Every extractor failed, so there is nothing meaningful to evaluate.
    #[error("internal processing error in {stage} stage: {message}")]
    Internal {
        /// The first stage that failed.
        stage: Stage,
        /// Description of the failure.
        message: String,
    },
}

impl QualityError {
    /// Returns true if the error was caused by undecodable input.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
