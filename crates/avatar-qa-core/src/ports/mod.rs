//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the domain core and external adapters.

mod face_detector;
mod progress;
mod result_output;
mod upload_source;

pub use face_detector::FaceDetector;
pub use progress::{ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
pub use upload_source::UploadSource;
