//! Integration tests for the spin samplers.

use burn::tensor::{Tensor, TensorData};
use van_core::backend::CpuBackendF64;
use van_core::symmetry::Symmetry;
use van_core::tensor::to_vec_f64;
use van_samplers::{
    apply_random_symmetry, BernoulliSpinSampler, RngKey, SpinConditionalSampler, SymmetryDraw,
};

type B = CpuBackendF64;

fn log_probs(p_up: f64, batch: usize) -> Tensor<B, 2> {
    let row = [p_up.ln(), (1.0 - p_up).ln()];
    let values: Vec<f64> = (0..batch).flat_map(|_| row).collect();
    Tensor::from_data(TensorData::new(values, [batch, 2]), &Default::default())
}

#[test]
fn test_bernoulli_frequency() {
    let batch = 20_000;
    for (p_up, seed) in [(0.2, 1u64), (0.5, 2), (0.9, 3)] {
        let spins =
            to_vec_f64(BernoulliSpinSampler.sample(RngKey::new(seed), log_probs(p_up, batch)));
        let ups = spins.iter().filter(|&&s| s == 1.0).count();
        let freq = ups as f64 / batch as f64;
        assert!((freq - p_up).abs() < 0.02, "p_up={} freq={}", p_up, freq);
        assert!(spins.iter().all(|&s| s == 1.0 || s == -1.0));
    }
}

#[test]
fn test_bernoulli_same_key_same_draw() {
    let a = to_vec_f64(BernoulliSpinSampler.sample(RngKey::new(7), log_probs(0.5, 256)));
    let b = to_vec_f64(BernoulliSpinSampler.sample(RngKey::new(7), log_probs(0.5, 256)));
    assert_eq!(a, b);
}

#[test]
fn test_random_symmetry_is_per_row() {
    let batch = 64;
    let row = [1.0, -1.0, -1.0, -1.0];
    let values: Vec<f64> = (0..batch).flat_map(|_| row).collect();
    let x: Tensor<B, 3> =
        Tensor::from_data(TensorData::new(values, [batch, 2, 2]), &Default::default());

    let key = RngKey::new(31);
    let draw = SymmetryDraw::draw(key, batch);
    let out = to_vec_f64(apply_random_symmetry(key, x));

    for (g, image) in draw.elements().iter().zip(out.chunks(4)) {
        let expected: [f64; 4] = match g {
            Symmetry::Identity => [1.0, -1.0, -1.0, -1.0],
            Symmetry::Flip => [-1.0, 1.0, 1.0, 1.0],
            Symmetry::Rotate180 => [-1.0, -1.0, -1.0, 1.0],
            Symmetry::FlipRotate180 => [1.0, 1.0, 1.0, -1.0],
        };
        assert_eq!(image, &expected, "{:?}", g);
    }
}
