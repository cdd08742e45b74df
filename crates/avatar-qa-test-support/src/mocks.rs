//! Mock implementations of core port traits.

#![allow(clippy::cast_precision_loss)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use avatar_qa_core::{
    BoundingBox, FaceDetection, FaceDetector, FaceLandmarks, ImageBuffer, Point, ProgressEvent,
    ProgressSink, QualityReport, ResultOutput, Upload, UploadSource,
};

/// Mock implementation of `UploadSource` for testing.
///
/// Yields pre-built uploads, optionally followed by unreadable entries, and
/// tracks iteration for assertions.
pub struct MockUploadSource {
    uploads: Vec<Upload>,
    unreadable: Vec<String>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockUploadSource {
    /// Creates a new mock source with the given uploads.
    #[must_use]
    pub fn new(uploads: Vec<Upload>) -> Self {
        Self {
            uploads,
            unreadable: Vec::new(),
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Adds an entry that fails to read.
    #[must_use]
    pub fn with_unreadable(mut self, name: impl Into<String>) -> Self {
        self.unreadable.push(name.into());
        self
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl UploadSource for MockUploadSource {
    fn uploads(&self) -> Box<dyn Iterator<Item = anyhow::Result<Upload>> + Send + '_> {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        let ok = self.uploads.iter().cloned().map(Ok);
        let failed = self
            .unreadable
            .iter()
            .map(|name| Err(anyhow::anyhow!("Failed to read {name}")));
        Box::new(ok.chain(failed))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.uploads.len() + self.unreadable.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures reports for later assertions.
pub struct MockResultOutput {
    reports: Arc<Mutex<Vec<QualityReport>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured reports.
    #[must_use]
    pub fn reports(&self) -> Vec<QualityReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, report: &QualityReport) -> anyhow::Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Completed { .. }))
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Skipped { .. }))
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { processed, skipped } => Some((*processed, *skipped)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| pred(e))
            .count()
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[derive(Debug, Clone, Copy)]
enum StubFace {
    None,
    Centered { tilt_degrees: f32, confidence: f32 },
}

/// Face detector stand-in that places one face in the middle of any image.
///
/// The face covers half of the short side and its eye line is tilted by the
/// requested angle, so pose checks can be driven without model weights.
pub struct StubFaceDetector {
    face: StubFace,
    calls: AtomicUsize,
}

impl StubFaceDetector {
    /// A level, centered face.
    #[must_use]
    pub const fn frontal() -> Self {
        Self::tilted(0.0)
    }

    /// A centered face whose eye line is rotated by `degrees`.
    #[must_use]
    pub const fn tilted(degrees: f32) -> Self {
        Self {
            face: StubFace::Centered {
                tilt_degrees: degrees,
                confidence: 0.95,
            },
            calls: AtomicUsize::new(0),
        }
    }

    /// Never finds a face.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            face: StubFace::None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `detect` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FaceDetector for StubFaceDetector {
    fn detect(&self, image: &ImageBuffer) -> anyhow::Result<Vec<FaceDetection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let StubFace::Centered {
            tilt_degrees,
            confidence,
        } = self.face
        else {
            return Ok(Vec::new());
        };

        let (w, h) = image.dimensions();
        let side = (w.min(h) / 2).max(1);
        let (x, y) = ((w - side) / 2, (h - side) / 2);
        let cx = x as f32 + side as f32 / 2.0;
        let cy = y as f32 + side as f32 * 0.4;
        let half = side as f32 / 5.0;
        let (sin, cos) = tilt_degrees.to_radians().sin_cos();

        Ok(vec![FaceDetection {
            bbox: BoundingBox {
                x,
                y,
                width: side,
                height: side,
            },
            confidence,
            landmarks: Some(FaceLandmarks {
                left_eye: Point::new(cx - half * cos, cy - half * sin),
                right_eye: Point::new(cx + half * cos, cy + half * sin),
                nose: Point::new(cx, cy + half),
            }),
        }])
    }
}

/// Face detector whose inference always fails.
#[derive(Debug, Default)]
pub struct FailingFaceDetector;

impl FaceDetector for FailingFaceDetector {
    fn detect(&self, _image: &ImageBuffer) -> anyhow::Result<Vec<FaceDetection>> {
        anyhow::bail!("face model unavailable")
    }
}
