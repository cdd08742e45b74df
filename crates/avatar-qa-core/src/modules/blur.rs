//! Blur estimation.
//!
//! Sharpness is measured as the variance of a Laplacian (second-derivative)
//! response over the luminance channel. Few sharp edges give a low variance.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]

use anyhow::{bail, Result};
use image::GrayImage;
use tracing::debug;

use crate::domain::{ImageBuffer, MetricExtractor};
use crate::error::Stage;

/// Largest supported aperture.
pub const MAX_KERNEL_SIZE: u32 = 31;

/// Configuration for blur estimation.
#[derive(Debug, Clone)]
pub struct BlurConfig {
    /// Laplacian aperture: `1` for the 4-neighbour kernel, or an odd size up to 31.
    /// Larger apertures smooth more and respond to coarser edges.
    pub kernel_size: u32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self { kernel_size: 3 }
    }
}

/// Laplacian-variance blur estimator.
pub struct BlurEstimator {
    config: BlurConfig,
}

impl BlurEstimator {
    /// Creates a new blur estimator with the given configuration.
    #[must_use]
    pub const fn new(config: BlurConfig) -> Self {
        Self { config }
    }

    /// Returns the estimator configuration.
    #[must_use]
    pub const fn config(&self) -> &BlurConfig {
        &self.config
    }
}

impl Default for BlurEstimator {
    fn default() -> Self {
        Self::new(BlurConfig::default())
    }
}

impl MetricExtractor for BlurEstimator {
    type Output = f64;

    fn stage(&self) -> Stage {
        Stage::Blur
    }

    fn extract(&self, image: &ImageBuffer) -> Result<f64> {
        let kernel = LaplacianKernel::new(self.config.kernel_size)?;
        let score = laplacian_variance(&image.to_luma8(), &kernel);
        debug!(kernel_size = self.config.kernel_size, score, "blur score");
        Ok(score)
    }
}

/// Square Laplacian aperture.
#[derive(Debug, Clone)]
pub struct LaplacianKernel {
    size: usize,
    weights: Vec<f64>,
}

impl LaplacianKernel {
    /// Builds the aperture for the given kernel size.
    ///
    /// # Errors
    ///
    /// Returns an error unless `size` is 1 or an odd number in `3..=31`.
    pub fn new(size: u32) -> Result<Self> {
        if size == 1 {
            return Ok(Self {
                size: 3,
                weights: vec![0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0],
            });
        }
        if size % 2 == 0 || !(3..=MAX_KERNEL_SIZE).contains(&size) {
            bail!("kernel size must be 1 or an odd number in 3..={MAX_KERNEL_SIZE}, got {size}");
        }

        let n = size as usize;
        let smooth = binomial(n);
        let second = convolve_1d(&[1.0, -2.0, 1.0], &binomial(n - 2));

        // d²/dx² + d²/dy², each smoothed across the other axis
        let mut weights = vec![0.0; n * n];
        for row in 0..n {
            for col in 0..n {
                weights[row * n + col] = smooth[row] * second[col] + second[row] * smooth[col];
            }
        }

        Ok(Self { size: n, weights })
    }

    /// Side length of the square aperture.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Row-major weights.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Binomial coefficients of row `n - 1` (`n` taps).
fn binomial(n: usize) -> Vec<f64> {
    let mut row = vec![1.0];
    for _ in 1..n {
        let mut next = vec![1.0; row.len() + 1];
        for i in 1..row.len() {
            next[i] = row[i - 1] + row[i];
        }
        row = next;
    }
    row
}

fn convolve_1d(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Mirrors an out-of-range index without repeating the edge pixel.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn reflect_101(index: i64, len: i64) -> u32 {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let mut i = index.rem_euclid(period);
    if i >= len {
        i = period - i;
    }
    // Safe: 0 <= i < len <= u32::MAX
    i as u32
}

/// Population variance of the Laplacian response.
#[must_use]
pub fn laplacian_variance(gray: &GrayImage, kernel: &LaplacianKernel) -> f64 {
    let (width, height) = gray.dimensions();
    let (w, h) = (i64::from(width), i64::from(height));
    let n = kernel.size() as i64;
    let half = n / 2;

    let mut sum = 0.0;
    let mut sum_sq = 0.0;

    for y in 0..h {
        for x in 0..w {
            let mut response = 0.0;
            for ky in 0..n {
                let sy = reflect_101(y + ky - half, h);
                for kx in 0..n {
                    let weight = kernel.weights()[(ky * n + kx) as usize];
                    if weight == 0.0 {
                        continue;
                    }
                    let sx = reflect_101(x + kx - half, w);
                    response += weight * f64::from(gray.get_pixel(sx, sy).0[0]);
                }
            }
            sum += response;
            sum_sq += response * response;
        }
    }

    let count = (w * h) as f64;
    let mean = sum / count;
    (sum_sq / count - mean * mean).max(0.0)
}
