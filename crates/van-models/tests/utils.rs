//! Test utilities for van-models

#![allow(dead_code)]

use burn::prelude::Backend;
use burn::tensor::Tensor;
use van_core::config::VanConfig;
use van_core::tensor::to_vec_f64;
use van_models::Lstm2d;

pub use van_examples::empirical_frequencies;

/// Every ±1 configuration of an `L x L` lattice, `[2^(L²), L, L]`.
pub fn generate_all_configurations<B: Backend>(size: usize, device: &B::Device) -> Tensor<B, 3> {
    van_examples::enumerate_configurations(size, device).expect("enumerable lattice")
}

pub fn build_model<B: Backend>(
    size: usize,
    width: usize,
    z2: bool,
    zero_init: bool,
    device: &B::Device,
) -> Lstm2d<B> {
    let config = VanConfig::builder()
        .lattice_size(size)
        .net_width(width)
        .z2(z2)
        .zero_init(zero_init)
        .build()
        .expect("valid config");
    Lstm2d::new(&config, device).expect("build model")
}

/// `Σ exp(log_prob)` over all configurations.
pub fn total_probability<B: Backend>(model: &Lstm2d<B>, device: &B::Device) -> f64 {
    let all = generate_all_configurations::<B>(model.lattice_size(), device);
    to_vec_f64(model.log_prob(all))
        .into_iter()
        .map(f64::exp)
        .sum()
}
