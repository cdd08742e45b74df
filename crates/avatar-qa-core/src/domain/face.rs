//! Face detection results.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X coordinate of the top-left corner.
    pub x: u32,
    /// Y coordinate of the top-left corner.
    pub y: u32,
    /// Box width.
    pub width: u32,
    /// Box height.
    pub height: u32,
}

impl BoundingBox {
    /// Box area in pixels.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// A point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Eye and nose positions of a detected face.
///
/// `left_eye` is the eye on the left side of the image (the subject's right eye).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    /// Eye on the image's left side.
    pub left_eye: Point,
    /// Eye on the image's right side.
    pub right_eye: Point,
    /// Nose tip.
    pub nose: Point,
}

/// A single detected face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    /// Face bounding box.
    pub bbox: BoundingBox,
    /// Detection confidence (0.0 to 1.0).
    pub confidence: f32,
    /// Landmarks, when the detector provides them.
    pub landmarks: Option<FaceLandmarks>,
}

/// Picks the detection used downstream.
///
/// Highest confidence wins; ties go to the larger box, then to the box that
/// comes first in raster order (top-most, then left-most).
#[must_use]
pub fn primary_face(detections: &[FaceDetection]) -> Option<&FaceDetection> {
    detections.iter().min_by(|a, b| rank(a, b))
}

fn rank(a: &FaceDetection, b: &FaceDetection) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| b.bbox.area().cmp(&a.bbox.area()))
        .then_with(|| a.bbox.y.cmp(&b.bbox.y))
        .then_with(|| a.bbox.x.cmp(&b.bbox.x))
}
