//! Host read-back helpers.
//!
//! Backends differ in their float element type (`f32` on Wgpu and the default
//! NdArray, `f64` on [`CpuBackendF64`](crate::backend::CpuBackendF64)), so all
//! read-back goes through an explicit conversion to `f64`.

use burn::prelude::Backend;
use burn::tensor::{ElementConversion, Tensor};

/// Copy a float tensor to the host as row-major `f64` values.
pub fn to_vec_f64<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Vec<f64> {
    tensor
        .into_data()
        .convert::<f64>()
        .to_vec::<f64>()
        .expect("f64 read-back")
}

/// Read a single-element float tensor.
pub fn scalar_f64<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> f64 {
    tensor.into_scalar().elem::<f64>()
}

/// Largest `| |x| - 1 |` over the tensor; zero iff every entry is ±1.
pub fn spin_deviation<B: Backend, const D: usize>(x: Tensor<B, D>) -> f64 {
    scalar_f64((x.abs() - 1.0).abs().max())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_to_vec_f64_converts_f32() {
        let device = Default::default();
        let x: Tensor<CpuBackend, 2> = Tensor::from_floats([[1.0, -1.0], [0.5, 2.0]], &device);
        assert_eq!(to_vec_f64(x), vec![1.0, -1.0, 0.5, 2.0]);
    }

    #[test]
    fn test_spin_deviation() {
        let device = Default::default();
        let spins: Tensor<CpuBackend, 1> = Tensor::from_floats([1.0, -1.0, 1.0], &device);
        let mixed: Tensor<CpuBackend, 1> = Tensor::from_floats([1.0, 0.5, -1.0], &device);
        assert_eq!(spin_deviation(spins), 0.0);
        assert!((spin_deviation(mixed) - 0.5).abs() < 1e-6);
    }
}
