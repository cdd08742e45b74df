//! ML inference using Candle.
//!
//! Provides safetensors weight loading and the `BlazeFace` face detector.

mod blazeface;
mod device;
mod loader;

pub use blazeface::{BlazeFace, BlazeFaceDetector, DetectorConfig, INPUT_SIZE};
pub use device::get_device;
pub use loader::{load_safetensors, weights_from_bytes};

/// Logistic function applied to raw classifier logits.
#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.999);
        assert!(sigmoid(-10.0) < 0.001);
    }
}
