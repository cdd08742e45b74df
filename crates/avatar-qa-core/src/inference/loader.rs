//! Safetensors weight loading.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use safetensors::SafeTensors;
use tracing::debug;

/// Reads a safetensors file into a `VarBuilder` on `device`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid safetensors.
pub fn load_safetensors(path: impl AsRef<Path>, device: &Device) -> Result<VarBuilder<'static>> {
    let path = path.as_ref();
    debug!("Loading safetensors from {}", path.display());

    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read model file: {}", path.display()))?;

    weights_from_bytes(&data, device)
        .with_context(|| format!("Failed to parse safetensors: {}", path.display()))
}

/// Parses in-memory safetensors data into a `VarBuilder` on `device`.
///
/// # Errors
///
/// Returns an error if the data is malformed or holds an unsupported dtype.
pub fn weights_from_bytes(data: &[u8], device: &Device) -> Result<VarBuilder<'static>> {
    let tensors = SafeTensors::deserialize(data)?;

    let mut tensor_map: HashMap<String, Tensor> = HashMap::with_capacity(tensors.len());
    for (name, view) in tensors.tensors() {
        let dtype = candle_dtype(view.dtype())?;
        let tensor = Tensor::from_raw_buffer(view.data(), dtype, view.shape(), device)
            .with_context(|| format!("Failed to create tensor '{name}'"))?;
        tensor_map.insert(name, tensor);
    }
    debug!("Loaded {} tensors", tensor_map.len());

    Ok(VarBuilder::from_tensors(tensor_map, DType::F32, device))
}

fn candle_dtype(dtype: safetensors::Dtype) -> Result<DType> {
    use safetensors::Dtype as S;
    Ok(match dtype {
        S::F32 => DType::F32,
        S::F64 => DType::F64,
        S::F16 => DType::F16,
        S::BF16 => DType::BF16,
        S::I64 => DType::I64,
        S::U8 => DType::U8,
        S::U32 => DType::U32,
        other => bail!("Unsupported dtype: {other:?}"),
    })
}
