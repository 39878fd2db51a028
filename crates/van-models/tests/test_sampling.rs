//! Tests for LSTM-2D sampling.

mod utils;

use utils::{build_model, empirical_frequencies, generate_all_configurations};
use van_core::backend::CpuBackendF64;
use van_core::tensor::{spin_deviation, to_vec_f64};
use van_models::up_counts;
use van_samplers::RngKey;

type B = CpuBackendF64;

#[test]
fn test_sample_shape_and_values() {
    let device = Default::default();
    let model = build_model::<B>(4, 6, true, false, &device);
    let (samples, x_hat) = model.sample(32, RngKey::new(0));

    assert_eq!(samples.dims(), [32, 4, 4]);
    assert_eq!(x_hat.dims(), [32, 4, 4]);
    assert_eq!(spin_deviation(samples), 0.0);
    assert!(to_vec_f64(x_hat).iter().all(|&v| v == 0.0));
}

#[test]
fn test_sample_reproducible_from_key() {
    let device = Default::default();
    let model = build_model::<B>(3, 5, true, false, &device);

    let (a, _) = model.sample(64, RngKey::new(1234));
    let (b, _) = model.sample(64, RngKey::new(1234));
    let (c, _) = model.sample(64, RngKey::new(4321));

    assert_eq!(to_vec_f64(a.clone()), to_vec_f64(b));
    assert_ne!(to_vec_f64(a), to_vec_f64(c));
}

#[test]
fn test_all_down_never_sampled() {
    let device = Default::default();
    // Zero init puts 1/2^(L²) of the raw mass on all-down.
    let model = build_model::<B>(2, 4, false, true, &device);
    let (samples, _) = model.sample(2000, RngKey::new(9));

    let counts: Vec<i64> = up_counts(samples)
        .into_data()
        .convert::<i64>()
        .to_vec()
        .unwrap();
    assert!(counts.iter().all(|&c| c > 0));
}

#[test]
fn test_single_site_samples_both_values() {
    let device = Default::default();
    let model = build_model::<B>(1, 4, false, true, &device);
    let (samples, _) = model.sample(200, RngKey::new(17));
    let values = to_vec_f64(samples);

    assert!(values.iter().any(|&v| v == 1.0));
    assert!(values.iter().any(|&v| v == -1.0));
}

fn assert_frequencies_match(z2: bool, seed: u64) {
    let device = Default::default();
    let model = build_model::<B>(2, 6, z2, false, &device);

    let exact: Vec<f64> = to_vec_f64(model.log_prob(generate_all_configurations::<B>(2, &device)))
        .into_iter()
        .map(f64::exp)
        .collect();

    let (samples, _) = model.sample(20_000, RngKey::new(seed));
    let observed = empirical_frequencies(samples);

    for (idx, (p, f)) in exact.iter().zip(observed.iter()).enumerate() {
        assert!(
            (p - f).abs() < 0.02,
            "z2={} config {:04b}: q={:.4} freq={:.4}",
            z2,
            idx,
            p,
            f
        );
    }
}

#[test]
fn test_sample_frequencies_match_log_prob() {
    assert_frequencies_match(false, 21);
}

#[test]
fn test_symmetrized_sample_frequencies_match_log_prob() {
    assert_frequencies_match(true, 22);
}
