//! Progress reporting port for UI integration.

use crate::domain::QualityReport;

/// Events emitted while a batch of uploads is evaluated.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Evaluation started for an upload.
    Started {
        /// Upload name.
        name: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total uploads in batch, if known.
        total: Option<usize>,
    },
    /// Evaluation produced a report.
    Completed {
        /// The quality report.
        report: QualityReport,
    },
    /// An upload was skipped because it could not be read or decoded.
    Skipped {
        /// Upload name.
        name: String,
        /// Reason for skipping.
        reason: String,
    },
    /// All uploads have been processed.
    Finished {
        /// Uploads that produced a report.
        processed: usize,
        /// Uploads that were skipped.
        skipped: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
