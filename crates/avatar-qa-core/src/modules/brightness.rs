//! Brightness estimation.
//!
//! Averages luminance with weights that fall off with distance from the
//! image center, so the area where a face is expected dominates the
//! background.

#![allow(clippy::cast_precision_loss)]

use anyhow::{ensure, Result};
use image::GrayImage;
use tracing::debug;

use crate::domain::{ImageBuffer, MetricExtractor};
use crate::error::Stage;

/// Full-scale luminance of an 8-bit channel.
pub const MAX_LUMINANCE: f64 = 255.0;

/// Configuration for brightness estimation.
#[derive(Debug, Clone)]
pub struct BrightnessConfig {
    /// Weight of the center pixel relative to the far background (1.0 = flat average).
    pub center_weight: f64,
    /// Decay radius as a fraction of the image's short side.
    pub decay_fraction: f64,
}

impl Default for BrightnessConfig {
    fn default() -> Self {
        Self {
            center_weight: 2.0,
            decay_fraction: 0.25,
        }
    }
}

/// Center-weighted brightness estimator.
///
/// Produces raw luminance in `0.0..=255.0`; see [`to_percent`] for the scale
/// thresholds use.
pub struct BrightnessEstimator {
    config: BrightnessConfig,
}

impl BrightnessEstimator {
    /// Creates a new brightness estimator with the given configuration.
    #[must_use]
    pub const fn new(config: BrightnessConfig) -> Self {
        Self { config }
    }

    /// Returns the estimator configuration.
    #[must_use]
    pub const fn config(&self) -> &BrightnessConfig {
        &self.config
    }
}

impl Default for BrightnessEstimator {
    fn default() -> Self {
        Self::new(BrightnessConfig::default())
    }
}

impl MetricExtractor for BrightnessEstimator {
    type Output = f64;

    fn stage(&self) -> Stage {
        Stage::Brightness
    }

    fn extract(&self, image: &ImageBuffer) -> Result<f64> {
        let luminance = center_weighted_mean(&image.to_luma8(), &self.config)?;
        debug!(luminance, percent = to_percent(luminance), "brightness");
        Ok(luminance)
    }
}

/// Converts raw 8-bit luminance to the `0..=100` scale.
#[must_use]
pub fn to_percent(luminance: f64) -> f64 {
    (luminance / MAX_LUMINANCE * 100.0).clamp(0.0, 100.0)
}

/// Weighted mean luminance with weight `1 + (c - 1) * exp(-d / r)`.
///
/// `d` is the distance from `(width / 2, height / 2)` and `r` is the short
/// side times `decay_fraction`.
///
/// # Errors
///
/// Returns an error if the configuration would produce non-positive weights
/// or a non-positive decay radius.
pub fn center_weighted_mean(gray: &GrayImage, config: &BrightnessConfig) -> Result<f64> {
    ensure!(
        config.center_weight.is_finite() && config.center_weight > 0.0,
        "center_weight must be positive, got {}",
        config.center_weight
    );
    ensure!(
        config.decay_fraction.is_finite() && config.decay_fraction > 0.0,
        "decay_fraction must be positive, got {}",
        config.decay_fraction
    );

    let (width, height) = gray.dimensions();
    ensure!(width > 0 && height > 0, "empty luminance buffer");

    let center_x = f64::from(width / 2);
    let center_y = f64::from(height / 2);
    let radius = f64::from(width.min(height)) * config.decay_fraction;
    let boost = config.center_weight - 1.0;

    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for (x, y, pixel) in gray.enumerate_pixels() {
        let dx = f64::from(x) - center_x;
        let dy = f64::from(y) - center_y;
        let distance = dx.hypot(dy);
        let weight = boost.mul_add((-distance / radius).exp(), 1.0);
        weighted += weight * f64::from(pixel.0[0]);
        total_weight += weight;
    }

    Ok(weighted / total_weight)
}
