use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use burn::backend::ndarray::NdArrayDevice;

/// Default CPU backend. The scan is strictly sequential over sites, so for the
/// small lattices VAN is trained on the CPU backend is usually the fastest.
pub type CpuBackend = burn::backend::NdArray<f32>;

/// CPU backend with f64 elements, used where exact normalization checks matter.
pub type CpuBackendF64 = burn::backend::NdArray<f64>;

pub fn init_cpu_device() -> NdArrayDevice {
    NdArrayDevice::default()
}

#[cfg(feature = "gpu")]
pub type WgpuBackend = burn::backend::Wgpu;

#[cfg(feature = "gpu")]
pub fn init_gpu_device() -> burn::backend::wgpu::WgpuDevice {
    // Burn's WGPU backend uses Default::default() for device creation
    // Metal backend is automatically selected on macOS when available
    burn::backend::wgpu::WgpuDevice::default()
}

// Helper to ensure Metal is selected
#[cfg(feature = "gpu")]
pub fn ensure_metal_backend() {
    std::env::set_var("BURN_WGPU_BACKEND", "metal");
}

/// Where the model tensors live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Cpu,
    Gpu,
}

impl DeviceKind {
    /// Whether this build can place tensors on the requested device.
    pub fn is_available(self) -> bool {
        match self {
            DeviceKind::Cpu => true,
            DeviceKind::Gpu => cfg!(feature = "gpu"),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(DeviceKind::Cpu),
            "gpu" | "wgpu" | "cuda" | "metal" => Ok(DeviceKind::Gpu),
            other => Err(format!("unknown device '{other}', expected 'cpu' or 'gpu'")),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Cpu => write!(f, "cpu"),
            DeviceKind::Gpu => write!(f, "gpu"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_kind_parse() {
        assert_eq!("cpu".parse::<DeviceKind>(), Ok(DeviceKind::Cpu));
        assert_eq!(" CUDA ".parse::<DeviceKind>(), Ok(DeviceKind::Gpu));
        assert!("tpu".parse::<DeviceKind>().is_err());
        assert!(DeviceKind::Cpu.is_available());
    }
}
