//! Test support utilities for avatar-qa.
//!
//! Provides mocks, synthetic image builders and stand-in face detectors for
//! testing the evaluation pipeline without model weights.
//!
//! # Example
//!
//! ```
//! use avatar_qa_test_support::{MockUploadSource, SyntheticImageBuilder};
//!
//! // Create synthetic test images
//! let sharp = SyntheticImageBuilder::checkerboard(128, 128);
//! let blurry = SyntheticImageBuilder::uniform_gray(128, 128, 128);
//!
//! // Wrap them as uploads
//! let source = MockUploadSource::new(vec![
//!     SyntheticImageBuilder::png_upload("sharp.png", &sharp),
//!     SyntheticImageBuilder::png_upload("blurry.png", &blurry),
//! ]);
//! ```

mod builders;
mod mocks;

pub use builders::SyntheticImageBuilder;
pub use mocks::{
    FailingFaceDetector, MockProgressSink, MockResultOutput, MockUploadSource, StubFaceDetector,
};
