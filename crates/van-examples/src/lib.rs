//! # van-examples utilities
//!
//! Shared helpers for the VAN-2D example programs: exhaustive enumeration of
//! small lattices, empirical histograms and terminal rendering.

use burn::prelude::Backend;
use burn::tensor::{Tensor, TensorData};
use van_core::tensor::to_vec_f64;

/// Largest lattice (in sites) that [`enumerate_configurations`] will expand.
pub const MAX_ENUMERATED_SITES: usize = 20;

/// Every ±1 configuration of an `size x size` lattice, `[2^(size²), size, size]`.
///
/// Configuration `k` has row-major site `s` up iff bit `size²-1-s` of `k` is
/// set, so [`config_index`] inverts the enumeration.
///
/// # Errors
///
/// If the lattice has more than [`MAX_ENUMERATED_SITES`] sites or is empty.
pub fn enumerate_configurations<B: Backend>(
    size: usize,
    device: &B::Device,
) -> Result<Tensor<B, 3>, String> {
    let n_sites = size * size;
    if n_sites == 0 || n_sites > MAX_ENUMERATED_SITES {
        return Err(format!(
            "cannot enumerate a {}x{} lattice (supported: 1..={} sites)",
            size, size, MAX_ENUMERATED_SITES
        ));
    }

    let n_configs = 1usize << n_sites;
    let mut data = Vec::with_capacity(n_configs * n_sites);
    for config_idx in 0..n_configs {
        for site in 0..n_sites {
            let up = (config_idx >> (n_sites - 1 - site)) & 1 == 1;
            data.push(if up { 1.0f64 } else { -1.0 });
        }
    }

    Ok(Tensor::from_data(
        TensorData::new(data, [n_configs, size, size]),
        device,
    ))
}

/// Enumeration index of one row-major configuration.
pub fn config_index(values: &[f64]) -> usize {
    values
        .iter()
        .fold(0, |acc, &v| (acc << 1) | usize::from(v > 0.0))
}

/// Frequency of every configuration among `samples: [batch, L, L]`, indexed as
/// in [`enumerate_configurations`].
pub fn empirical_frequencies<B: Backend>(samples: Tensor<B, 3>) -> Vec<f64> {
    let [batch, size, _] = samples.dims();
    let n_sites = size * size;
    let mut counts = vec![0usize; 1 << n_sites];
    for row in to_vec_f64(samples).chunks(n_sites) {
        counts[config_index(row)] += 1;
    }
    counts
        .into_iter()
        .map(|c| c as f64 / batch as f64)
        .collect()
}

/// Render one row-major configuration as lines of arrows.
pub fn format_lattice(values: &[f64], size: usize) -> String {
    values
        .chunks(size)
        .map(|row| {
            row.iter()
                .map(|&v| if v > 0.0 { "↑" } else { "↓" })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mean magnetization `Σ x / L²` of each configuration.
pub fn magnetizations<B: Backend>(samples: Tensor<B, 3>) -> Vec<f64> {
    let [_, size, _] = samples.dims();
    let n_sites = size * size;
    to_vec_f64(samples)
        .chunks(n_sites)
        .map(|row| row.iter().sum::<f64>() / n_sites as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use van_core::backend::CpuBackendF64;

    type B = CpuBackendF64;

    #[test]
    fn test_enumeration_order() {
        let all = enumerate_configurations::<B>(2, &Default::default()).unwrap();
        assert_eq!(all.dims(), [16, 2, 2]);

        let values = to_vec_f64(all);
        assert_eq!(&values[0..4], &[-1.0, -1.0, -1.0, -1.0]);
        assert_eq!(&values[4..8], &[-1.0, -1.0, -1.0, 1.0]);
        assert_eq!(&values[60..64], &[1.0, 1.0, 1.0, 1.0]);

        for (idx, row) in values.chunks(4).enumerate() {
            assert_eq!(config_index(row), idx);
        }
    }

    #[test]
    fn test_enumeration_limits() {
        assert!(enumerate_configurations::<B>(0, &Default::default()).is_err());
        assert!(enumerate_configurations::<B>(5, &Default::default()).is_err());
        assert!(enumerate_configurations::<B>(1, &Default::default()).is_ok());
    }

    #[test]
    fn test_empirical_frequencies() {
        let samples: Tensor<B, 3> = Tensor::from_data(
            TensorData::new(vec![1.0, -1.0, 1.0], [3, 1, 1]),
            &Default::default(),
        );
        let freq = empirical_frequencies(samples);
        assert_eq!(freq.len(), 2);
        assert!((freq[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((freq[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_format_lattice() {
        assert_eq!(format_lattice(&[1.0, -1.0, -1.0, 1.0], 2), "↑ ↓\n↓ ↑");
    }

    #[test]
    fn test_magnetizations() {
        let samples: Tensor<B, 3> = Tensor::from_data(
            TensorData::new(vec![1.0, 1.0, 1.0, -1.0], [1, 2, 2]),
            &Default::default(),
        );
        assert_eq!(magnetizations(samples), vec![0.5]);
    }
}
