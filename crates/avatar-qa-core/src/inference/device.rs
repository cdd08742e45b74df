//! Device selection for inference.

use candle_core::Device;
use tracing::info;

/// Picks the inference device once at detector load time.
///
/// Uses Metal or CUDA when the matching cargo feature is enabled and a
/// device is present; otherwise the CPU.
#[must_use]
pub fn get_device() -> Device {
    #[cfg(feature = "metal")]
    {
        if let Ok(device) = Device::new_metal(0) {
            info!("Using Metal device for face detection");
            return device;
        }
    }

    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            info!("Using CUDA device for face detection");
            return device;
        }
    }

    info!("Using CPU for face detection");
    Device::Cpu
}
