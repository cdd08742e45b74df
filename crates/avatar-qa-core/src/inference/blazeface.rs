//! `BlazeFace` face detection model.
//!
//! Implements the `BlazeFace` architecture for fast face detection with keypoints,
//! plus a [`FaceDetector`] adapter that runs it over a small pyramid of centered
//! crops so that faces filling only part of a large photo are still found.
//! Based on the paper "`BlazeFace`: Sub-millisecond Neural Face Detection on Mobile GPUs"
//! and the `PyTorch` implementation at <https://github.com/hollance/BlazeFace-PyTorch>.

// Allow common ML code patterns
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{conv2d, Conv2d, Conv2dConfig, VarBuilder};
use tracing::{debug, info};

use super::{get_device, load_safetensors, sigmoid};
use crate::domain::{BoundingBox, FaceDetection, FaceLandmarks, ImageBuffer, Point};
use crate::ports::FaceDetector;

/// Input image size for `BlazeFace`.
pub const INPUT_SIZE: usize = 128;

/// Number of anchor boxes (detections).
const NUM_ANCHORS: usize = 896;

/// Smallest crop, in pixels, the pyramid will feed to the network.
const MIN_CROP_SIDE: u32 = 32;

/// Tunables for [`BlazeFaceDetector`].
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Minimum detection confidence.
    pub min_confidence: f32,
    /// IOU above which overlapping detections are suppressed.
    pub nms_threshold: f32,
    /// Zoom factor between pyramid levels; `<= 1.0` runs a single pass.
    pub scale_step: f32,
    /// Maximum number of pyramid levels, including the full frame.
    pub max_scales: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.75,
            nms_threshold: 0.3,
            scale_step: 1.5,
            max_scales: 3,
        }
    }
}

/// Raw network output for one anchor, in normalized `[0,1]` coordinates of
/// the network input.
#[derive(Debug, Clone)]
struct RawDetection {
    /// `[x_min, y_min, x_max, y_max]`.
    bbox: [f32; 4],
    score: f32,
    /// Six keypoints: right eye, left eye, nose, mouth, right ear, left ear
    /// (from the subject's point of view).
    keypoints: [[f32; 2]; 6],
}

/// `BlazeBlock` - the core building block of `BlazeFace`.
///
/// Uses depthwise separable convolution with optional stride.
/// Note: This implementation uses biased convolutions (BatchNorm folded in)
/// to match the pretrained hollance/BlazeFace-PyTorch weights.
struct BlazeBlock {
    depthwise: Conv2d,
    pointwise: Conv2d,
    channel_pad: usize,
    stride: usize,
}

impl BlazeBlock {
    #[allow(clippy::similar_names)]
    fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        stride: usize,
        vb: &VarBuilder,
    ) -> Result<Self> {
        let padding = if stride == 2 {
            0
        } else {
            (kernel_size - 1) / 2
        };

        // Depthwise convolution (with bias - BatchNorm folded in)
        let depthwise = conv2d(
            in_channels,
            in_channels,
            kernel_size,
            Conv2dConfig {
                stride,
                padding,
                groups: in_channels,
                ..Conv2dConfig::default()
            },
            vb.pp("depthwise"),
        )?;

        // Pointwise convolution (with bias - BatchNorm folded in)
        let pointwise = conv2d(
            in_channels,
            out_channels,
            1,
            Conv2dConfig::default(),
            vb.pp("pointwise"),
        )?;

        let channel_pad = out_channels.saturating_sub(in_channels);

        Ok(Self {
            depthwise,
            pointwise,
            channel_pad,
            stride,
        })
    }
}

impl Module for BlazeBlock {
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        // Pad input for stride=2 (asymmetric padding)
        let x_padded = if self.stride == 2 {
            x.pad_with_zeros(2, 0, 2)?.pad_with_zeros(3, 0, 2)?
        } else {
            x.clone()
        };

        // Depthwise + ReLU (bias included, no BatchNorm)
        let h = self.depthwise.forward(&x_padded)?;
        let h = h.relu()?;

        // Pointwise (bias included, no BatchNorm)
        let h = self.pointwise.forward(&h)?;

        // Residual connection
        let residual = if self.stride == 2 {
            // Max pool for spatial downsampling
            let pool_size = 2;
            x.max_pool2d(pool_size)?
        } else {
            x.clone()
        };

        // Pad channels if needed
        let residual = if self.channel_pad > 0 {
            residual.pad_with_zeros(1, 0, self.channel_pad)?
        } else {
            residual
        };

        // Add residual and apply ReLU
        (h + residual)?.relu()
    }
}

/// `BlazeFace` face detection model.
///
/// Uses pretrained weights from hollance/BlazeFace-PyTorch with BatchNorm
/// folded into convolutional biases.
pub struct BlazeFace {
    // Initial convolution (with bias, no BatchNorm)
    conv0: Conv2d,

    // Backbone 1 (produces 16x16 feature map)
    backbone1: Vec<BlazeBlock>,

    // Backbone 2 (produces 8x8 feature map)
    backbone2: Vec<BlazeBlock>,

    // Detection heads for 16x16
    classifier_16: Conv2d,
    regressor_16: Conv2d,

    // Detection heads for 8x8
    classifier_8: Conv2d,
    regressor_8: Conv2d,

    // Anchor boxes
    anchors: Tensor,

    device: Device,
}

impl BlazeFace {
    /// Creates a new `BlazeFace` model from weights.
    ///
    /// # Errors
    ///
    /// Returns an error if model weights cannot be loaded or are invalid.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder) -> Result<Self> {
        let device = vb.device().clone();

        // Initial 5x5 conv: 3 -> 24 channels, stride 2 (with bias, no BatchNorm)
        let conv0 = conv2d(
            3,
            24,
            5,
            Conv2dConfig {
                stride: 2,
                padding: 0,
                ..Conv2dConfig::default()
            },
            vb.pp("conv0"),
        )?;

        // Backbone 1: 128 -> 64 -> 32 -> 16 -> 8 (produces 88 channels at 8x8 after all strides)
        // Input: 64x64 after initial conv, two stride-2 blocks reduce to 16x16
        let backbone1_config = [
            (24, 24, 3, 1),
            (24, 28, 3, 1),
            (28, 32, 3, 2), // stride 2: 64x64 -> 32x32
            (32, 36, 3, 1),
            (36, 42, 3, 1),
            (42, 48, 3, 2), // stride 2: 32x32 -> 16x16
            (48, 56, 3, 1),
            (56, 64, 3, 1),
            (64, 72, 3, 1),
            (72, 80, 3, 1),
            (80, 88, 3, 1),
        ];

        let mut backbone1 = Vec::new();
        for (i, (in_c, out_c, k, s)) in backbone1_config.iter().enumerate() {
            let block = BlazeBlock::new(*in_c, *out_c, *k, *s, &vb.pp(format!("backbone1.{i}")))?;
            backbone1.push(block);
        }

        // Backbone 2: produces 96 channels at 8x8
        let backbone2_config = [
            (88, 96, 3, 2), // stride 2: 16x16 -> 8x8
            (96, 96, 3, 1),
            (96, 96, 3, 1),
            (96, 96, 3, 1),
            (96, 96, 3, 1),
        ];

        let mut backbone2 = Vec::new();
        for (i, (in_c, out_c, k, s)) in backbone2_config.iter().enumerate() {
            let block = BlazeBlock::new(*in_c, *out_c, *k, *s, &vb.pp(format!("backbone2.{i}")))?;
            backbone2.push(block);
        }

        // Detection heads for 16x16 (512 anchors, 2 per location)
        let classifier_16 =
            conv2d(88, 2, 1, Conv2dConfig::default(), vb.pp("classifier_16"))?;
        let regressor_16 =
            conv2d(88, 32, 1, Conv2dConfig::default(), vb.pp("regressor_16"))?;

        // Detection heads for 8x8 (384 anchors, 6 per location)
        let classifier_8 =
            conv2d(96, 6, 1, Conv2dConfig::default(), vb.pp("classifier_8"))?;
        let regressor_8 = conv2d(96, 96, 1, Conv2dConfig::default(), vb.pp("regressor_8"))?;

        // Generate anchor boxes
        let anchors = Self::generate_anchors(&device)?;

        Ok(Self {
            conv0,
            backbone1,
            backbone2,
            classifier_16,
            regressor_16,
            classifier_8,
            regressor_8,
            anchors,
            device,
        })
    }

    /// Generates anchor boxes for the two feature map scales.
    fn generate_anchors(device: &Device) -> Result<Tensor> {
        let mut anchors = Vec::with_capacity(NUM_ANCHORS * 4);

        // 16x16 feature map: 2 anchors per location = 512 anchors
        for y in 0..16_u8 {
            for x in 0..16_u8 {
                for _ in 0..2 {
                    let cx = (f32::from(x) + 0.5) / 16.0;
                    let cy = (f32::from(y) + 0.5) / 16.0;
                    anchors.extend_from_slice(&[cx, cy, 1.0, 1.0]);
                }
            }
        }

        // 8x8 feature map: 6 anchors per location = 384 anchors
        for y in 0..8_u8 {
            for x in 0..8_u8 {
                for _ in 0..6 {
                    let cx = (f32::from(x) + 0.5) / 8.0;
                    let cy = (f32::from(y) + 0.5) / 8.0;
                    anchors.extend_from_slice(&[cx, cy, 1.0, 1.0]);
                }
            }
        }

        Tensor::from_vec(anchors, (NUM_ANCHORS, 4), device)
            .context("Failed to create anchors tensor")
    }

    /// Preprocesses an image for `BlazeFace` input.
    ///
    /// # Arguments
    /// * `image` - RGB image as `DynamicImage`
    ///
    /// # Returns
    /// Tensor of shape (1, 3, 128, 128) normalized to `[-1, 1]`
    ///
    /// # Errors
    ///
    /// Returns an error if tensor creation fails.
    pub fn preprocess(&self, image: &image::DynamicImage) -> Result<Tensor> {
        // Resize to 128x128
        let resized = image.resize_exact(
            INPUT_SIZE as u32,
            INPUT_SIZE as u32,
            image::imageops::FilterType::Lanczos3,
        );
        let rgb = resized.to_rgb8();

        // Convert to tensor and normalize to [-1, 1]
        let data: Vec<f32> = rgb
            .pixels()
            .flat_map(|p| {
                [
                    (f32::from(p[0]) / 127.5) - 1.0,
                    (f32::from(p[1]) / 127.5) - 1.0,
                    (f32::from(p[2]) / 127.5) - 1.0,
                ]
            })
            .collect();

        // Reshape to (1, 3, 128, 128) - NCHW format
        let tensor = Tensor::from_vec(data, (1, INPUT_SIZE, INPUT_SIZE, 3), &self.device)?;
        tensor
            .permute((0, 3, 1, 2))?
            .to_dtype(DType::F32)
            .context("Failed to preprocess image")
    }

    /// Runs face detection on a preprocessed input tensor.
    fn forward(&self, x: &Tensor) -> Result<(Tensor, Tensor)> {
        // Initial convolution with asymmetric padding (bias included, no BatchNorm)
        let x = x.pad_with_zeros(2, 1, 2)?.pad_with_zeros(3, 1, 2)?;
        let x = self.conv0.forward(&x)?;
        let x = x.relu()?;

        // Backbone 1
        let mut h = x;
        for block in &self.backbone1 {
            h = block.forward(&h)?;
        }
        let feature_16 = h.clone();

        // Backbone 2
        for block in &self.backbone2 {
            h = block.forward(&h)?;
        }
        let feature_8 = h;

        // Detection heads for 16x16
        let c1 = self.classifier_16.forward(&feature_16)?;
        let c1 = c1.permute((0, 2, 3, 1))?.reshape((1, 512, 1))?;

        let r1 = self.regressor_16.forward(&feature_16)?;
        let r1 = r1.permute((0, 2, 3, 1))?.reshape((1, 512, 16))?;

        // Detection heads for 8x8
        let c2 = self.classifier_8.forward(&feature_8)?;
        let c2 = c2.permute((0, 2, 3, 1))?.reshape((1, 384, 1))?;

        let r2 = self.regressor_8.forward(&feature_8)?;
        let r2 = r2.permute((0, 2, 3, 1))?.reshape((1, 384, 16))?;

        // Concatenate outputs
        let scores = Tensor::cat(&[c1, c2], 1)?;
        let boxes = Tensor::cat(&[r1, r2], 1)?;

        Ok((scores, boxes))
    }

    /// Runs the network on one image and returns every anchor scoring at
    /// least `min_confidence`, before suppression.
    fn detect_raw(&self, image: &image::DynamicImage, min_confidence: f32) -> Result<Vec<RawDetection>> {
        let input = self.preprocess(image)?;
        let (scores, boxes) = self.forward(&input)?;
        self.decode_detections(&scores, &boxes, min_confidence)
    }

    /// Decodes raw network output into candidate detections.
    fn decode_detections(
        &self,
        scores: &Tensor,
        boxes: &Tensor,
        min_confidence: f32,
    ) -> Result<Vec<RawDetection>> {
        let scores = scores.squeeze(0)?.to_vec2::<f32>()?;
        let boxes = boxes.squeeze(0)?.to_vec2::<f32>()?;
        let anchors = self.anchors.to_vec2::<f32>()?;

        let mut detections = Vec::new();
        let input_size_f32 = INPUT_SIZE as f32;

        for i in 0..NUM_ANCHORS {
            let score = sigmoid(scores[i][0]);

            if score < min_confidence {
                continue;
            }

            let anchor = &anchors[i];
            let box_data = &boxes[i];

            // Decode bounding box (center format -> corner format)
            let cx = anchor[0] + box_data[0] / input_size_f32;
            let cy = anchor[1] + box_data[1] / input_size_f32;
            let w = box_data[2] / input_size_f32;
            let h = box_data[3] / input_size_f32;

            let x_min = (cx - w / 2.0).clamp(0.0, 1.0);
            let y_min = (cy - h / 2.0).clamp(0.0, 1.0);
            let x_max = (cx + w / 2.0).clamp(0.0, 1.0);
            let y_max = (cy + h / 2.0).clamp(0.0, 1.0);

            // Decode 6 keypoints
            let mut keypoints = [[0.0f32; 2]; 6];
            for (k, keypoint) in keypoints.iter_mut().enumerate() {
                let kp_x = anchor[0] + box_data[4 + k * 2] / input_size_f32;
                let kp_y = anchor[1] + box_data[4 + k * 2 + 1] / input_size_f32;
                *keypoint = [kp_x.clamp(0.0, 1.0), kp_y.clamp(0.0, 1.0)];
            }

            detections.push(RawDetection {
                bbox: [x_min, y_min, x_max, y_max],
                score,
                keypoints,
            });
        }

        Ok(detections)
    }
}

/// A region of the source image fed to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Crop {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// A detection mapped back to source pixel coordinates.
#[derive(Debug, Clone)]
struct Candidate {
    bbox: [f32; 4],
    score: f32,
    keypoints: [[f32; 2]; 3],
}

impl Candidate {
    fn from_raw(raw: &RawDetection, crop: Crop) -> Self {
        let (ox, oy) = (crop.x as f32, crop.y as f32);
        let (w, h) = (crop.width as f32, crop.height as f32);
        let map = |p: [f32; 2]| [ox + p[0] * w, oy + p[1] * h];
        let [x0, y0] = map([raw.bbox[0], raw.bbox[1]]);
        let [x1, y1] = map([raw.bbox[2], raw.bbox[3]]);
        Self {
            bbox: [x0, y0, x1, y1],
            score: raw.score,
            keypoints: [
                map(raw.keypoints[0]),
                map(raw.keypoints[1]),
                map(raw.keypoints[2]),
            ],
        }
    }

    #[allow(clippy::cast_sign_loss)]
    fn into_detection(self) -> FaceDetection {
        let point = |p: [f32; 2]| Point::new(p[0], p[1]);
        let [x0, y0, x1, y1] = self.bbox.map(|v| v.max(0.0));
        FaceDetection {
            bbox: BoundingBox {
                x: x0.round() as u32,
                y: y0.round() as u32,
                width: (x1 - x0).round() as u32,
                height: (y1 - y0).round() as u32,
            },
            confidence: self.score,
            // The subject's right eye appears on the image's left
            landmarks: Some(FaceLandmarks {
                left_eye: point(self.keypoints[0]),
                right_eye: point(self.keypoints[1]),
                nose: point(self.keypoints[2]),
            }),
        }
    }
}

/// Full frame followed by progressively tighter centered square crops.
#[allow(clippy::cast_sign_loss)]
fn pyramid(width: u32, height: u32, config: &DetectorConfig) -> Vec<Crop> {
    let mut crops = vec![Crop {
        x: 0,
        y: 0,
        width,
        height,
    }];
    if config.scale_step <= 1.0 {
        return crops;
    }

    let mut side = width.min(height) as f32;
    for _ in 1..config.max_scales {
        side /= config.scale_step;
        let s = side.round() as u32;
        if s < MIN_CROP_SIDE {
            break;
        }
        crops.push(Crop {
            x: (width - s) / 2,
            y: (height - s) / 2,
            width: s,
            height: s,
        });
    }
    crops
}

/// Non-maximum suppression, highest score first.
fn nms(mut candidates: Vec<Candidate>, threshold: f32) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut keep: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        if keep.iter().all(|k| iou(&k.bbox, &candidate.bbox) < threshold) {
            keep.push(candidate);
        }
    }
    keep
}

/// Intersection over Union for two bounding boxes.
fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);

    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);

    let union = area_a + area_b - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

/// [`FaceDetector`] backed by a loaded `BlazeFace` network.
pub struct BlazeFaceDetector {
    model: BlazeFace,
    config: DetectorConfig,
}

impl BlazeFaceDetector {
    /// Wraps an already constructed model.
    #[must_use]
    pub const fn new(model: BlazeFace, config: DetectorConfig) -> Self {
        Self { model, config }
    }

    /// Loads `BlazeFace` weights from a safetensors file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold valid
    /// `BlazeFace` weights.
    pub fn load(path: impl AsRef<Path>, config: DetectorConfig) -> Result<Self> {
        let path = path.as_ref();
        let device = get_device();
        let vb = load_safetensors(path, &device).context("Failed to load BlazeFace weights")?;
        let model = BlazeFace::new(vb).context("Failed to create BlazeFace model")?;
        info!("Loaded BlazeFace from {}", path.display());
        Ok(Self::new(model, config))
    }

    /// Returns the detector configuration.
    #[must_use]
    pub const fn config(&self) -> &DetectorConfig {
        &self.config
    }
}

impl FaceDetector for BlazeFaceDetector {
    fn detect(&self, image: &ImageBuffer) -> Result<Vec<FaceDetection>> {
        let (width, height) = image.dimensions();
        let mut candidates = Vec::new();

        for crop in pyramid(width, height, &self.config) {
            let view = image
                .image()
                .crop_imm(crop.x, crop.y, crop.width, crop.height);
            let raw = self
                .model
                .detect_raw(&view, self.config.min_confidence)
                .context("Face detection failed")?;
            debug!("{} candidates in {crop:?}", raw.len());
            candidates.extend(raw.iter().map(|r| Candidate::from_raw(r, crop)));
        }

        Ok(nms(candidates, self.config.nms_threshold)
            .into_iter()
            .map(Candidate::into_detection)
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn candidate(bbox: [f32; 4], score: f32) -> Candidate {
        Candidate {
            bbox,
            score,
            keypoints: [[0.0; 2]; 3],
        }
    }

    #[test]
    fn test_iou_no_overlap() {
        let a = [0.0, 0.0, 0.5, 0.5];
        let b = [0.6, 0.6, 1.0, 1.0];
        assert!((iou(&a, &b) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_full_overlap() {
        let a = [0.0, 0.0, 1.0, 1.0];
        let b = [0.0, 0.0, 1.0, 1.0];
        assert!((iou(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_partial_overlap() {
        let a = [0.0, 0.0, 0.5, 0.5];
        let b = [0.25, 0.25, 0.75, 0.75];
        // Intersection: 0.25 * 0.25 = 0.0625
        // Union: 0.25 + 0.25 - 0.0625 = 0.4375
        let expected = 0.0625 / 0.4375;
        assert!((iou(&a, &b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_nms_keeps_best_of_overlapping() {
        let kept = nms(
            vec![
                candidate([0.0, 0.0, 100.0, 100.0], 0.8),
                candidate([5.0, 5.0, 105.0, 105.0], 0.9),
                candidate([300.0, 300.0, 380.0, 380.0], 0.76),
            ],
            0.3,
        );
        assert_eq!(kept.len(), 2);
        assert!((kept[0].score - 0.9).abs() < 1e-6);
        assert!((kept[1].score - 0.76).abs() < 1e-6);
    }

    #[test]
    fn test_pyramid_single_pass() {
        let config = DetectorConfig {
            scale_step: 1.0,
            ..Default::default()
        };
        assert_eq!(pyramid(640, 480, &config).len(), 1);
    }

    #[test]
    fn test_pyramid_centered_crops() {
        let config = DetectorConfig {
            scale_step: 2.0,
            max_scales: 3,
            ..Default::default()
        };
        let crops = pyramid(640, 480, &config);
        assert_eq!(crops.len(), 3);
        assert_eq!(
            crops[1],
            Crop {
                x: 200,
                y: 120,
                width: 240,
                height: 240
            }
        );
        assert_eq!(crops[2].width, 120);
    }

    #[test]
    fn test_pyramid_stops_at_min_side() {
        let config = DetectorConfig {
            scale_step: 2.0,
            max_scales: 10,
            ..Default::default()
        };
        let crops = pyramid(100, 100, &config);
        assert!(crops.iter().all(|c| c.width >= MIN_CROP_SIDE || c.x == 0));
        assert_eq!(crops.len(), 2);
    }

    #[test]
    fn test_candidate_maps_crop_to_pixels() {
        let raw = RawDetection {
            bbox: [0.25, 0.25, 0.75, 0.75],
            score: 0.9,
            keypoints: [
                [0.4, 0.4],
                [0.6, 0.4],
                [0.5, 0.55],
                [0.5, 0.7],
                [0.3, 0.45],
                [0.7, 0.45],
            ],
        };
        let crop = Crop {
            x: 100,
            y: 50,
            width: 200,
            height: 200,
        };
        let face = Candidate::from_raw(&raw, crop).into_detection();
        assert_eq!(
            face.bbox,
            BoundingBox {
                x: 150,
                y: 100,
                width: 100,
                height: 100
            }
        );
        let landmarks = face.landmarks.unwrap();
        assert!((landmarks.left_eye.x - 180.0).abs() < 1e-3);
        assert!((landmarks.right_eye.x - 220.0).abs() < 1e-3);
        assert!((landmarks.nose.y - 160.0).abs() < 1e-3);
    }

    #[test]
    fn test_untrained_network_finds_nothing() {
        let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
        let detector = BlazeFaceDetector::new(BlazeFace::new(vb).unwrap(), DetectorConfig::default());
        let image = ImageBuffer::from_image(image::DynamicImage::new_rgb8(160, 120)).unwrap();
        // Zero logits score 0.5, below the default confidence floor
        assert!(detector.detect(&image).unwrap().is_empty());
    }
}
