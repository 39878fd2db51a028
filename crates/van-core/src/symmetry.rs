//! Lattice symmetries used to symmetrize the model.
//!
//! The group here is the order-4 subgroup of D4 x Z2 generated by the global
//! spin flip and the 180° rotation:
//!
//! | element            | action on `x[b, i, j]`         |
//! |--------------------|--------------------------------|
//! | `Identity`         | `x[b, i, j]`                   |
//! | `Flip`             | `-x[b, i, j]`                  |
//! | `Rotate180`        | `x[b, L-1-i, L-1-j]`           |
//! | `FlipRotate180`    | `-x[b, L-1-i, L-1-j]`          |
//!
//! Every element is its own inverse, so averaging `q(g x)` over the group
//! yields a normalized, group-invariant distribution whenever `q` is
//! normalized.

use burn::prelude::Backend;
use burn::tensor::Tensor;

/// One element of the {identity, flip, rot180, flip∘rot180} group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    Identity,
    Flip,
    Rotate180,
    FlipRotate180,
}

impl Symmetry {
    /// All group elements, identity first.
    pub const ALL: [Symmetry; 4] = [
        Symmetry::Identity,
        Symmetry::Flip,
        Symmetry::Rotate180,
        Symmetry::FlipRotate180,
    ];

    /// Group order.
    pub const ORDER: usize = 4;

    pub fn flips(self) -> bool {
        matches!(self, Symmetry::Flip | Symmetry::FlipRotate180)
    }

    pub fn rotates(self) -> bool {
        matches!(self, Symmetry::Rotate180 | Symmetry::FlipRotate180)
    }

    /// Apply to a batch of configurations `[batch, L, L]`.
    pub fn apply<B: Backend>(self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let x = if self.rotates() { rotate180(x) } else { x };
        if self.flips() {
            x.neg()
        } else {
            x
        }
    }
}

/// Rotate every configuration of the batch by 180°.
pub fn rotate180<B: Backend>(x: Tensor<B, 3>) -> Tensor<B, 3> {
    x.flip([1, 2])
}

/// The four images `g x` of a batch, in [`Symmetry::ALL`] order.
pub fn orbit<B: Backend>(x: Tensor<B, 3>) -> Vec<Tensor<B, 3>> {
    Symmetry::ALL
        .iter()
        .map(|g| g.apply(x.clone()))
        .collect()
}

/// Numerically stable `log Σ_k exp(terms[k])`, elementwise over the batch.
///
/// `-inf` entries contribute zero mass; the shift is clamped so a column that
/// is entirely `-inf` stays `-inf` rather than turning into NaN.
///
/// # Panics
///
/// If `terms` is empty.
pub fn log_sum_exp<B: Backend>(terms: Vec<Tensor<B, 1>>) -> Tensor<B, 1> {
    assert!(!terms.is_empty(), "log_sum_exp needs at least one term");
    let [batch] = terms[0].dims();
    let stacked: Tensor<B, 2> = Tensor::stack(terms, 0); // [k, batch]
    let shift = stacked.clone().max_dim(0).clamp_min(f32::MIN); // [1, batch]
    let summed = (stacked - shift.clone()).exp().sum_dim(0).log();
    (summed + shift).reshape([batch])
}

/// Combine per-image log-probabilities into the group-averaged log-probability:
/// `log( (1/|G|) Σ_g q(g x) )`.
pub fn symmetrize_log_prob<B: Backend>(image_log_probs: Vec<Tensor<B, 1>>) -> Tensor<B, 1> {
    let order = image_log_probs.len() as f64;
    log_sum_exp(image_log_probs) - order.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackendF64;
    use crate::tensor::to_vec_f64;
    use burn::tensor::TensorData;

    type B = CpuBackendF64;

    fn grid(values: Vec<f64>) -> Tensor<B, 3> {
        Tensor::from_data(TensorData::new(values, [1, 2, 2]), &Default::default())
    }

    #[test]
    fn test_rotate180() {
        let x = grid(vec![1.0, -1.0, -1.0, -1.0]);
        let rotated = to_vec_f64(rotate180(x));
        assert_eq!(rotated, vec![-1.0, -1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_elements_are_involutions() {
        let x = grid(vec![1.0, -1.0, 1.0, 1.0]);
        for g in Symmetry::ALL {
            let twice = g.apply(g.apply(x.clone()));
            assert_eq!(to_vec_f64(twice), to_vec_f64(x.clone()), "{:?}", g);
        }
    }

    #[test]
    fn test_log_sum_exp_with_neg_inf() {
        let device = Default::default();
        let a: Tensor<B, 1> = Tensor::from_floats([0.0, f64::NEG_INFINITY], &device);
        let b: Tensor<B, 1> = Tensor::from_floats([0.0, f64::NEG_INFINITY], &device);
        let out = to_vec_f64(log_sum_exp(vec![a, b]));
        assert!((out[0] - 2f64.ln()).abs() < 1e-12);
        assert!(out[1].is_infinite() && out[1] < 0.0);
    }

    #[test]
    #[should_panic(expected = "at least one term")]
    fn test_log_sum_exp_rejects_empty() {
        let _ = log_sum_exp::<B>(Vec::new());
    }

    #[test]
    fn test_symmetrize_identical_terms() {
        let device = Default::default();
        let lp: Tensor<B, 1> = Tensor::from_floats([-1.5, -0.25], &device);
        let out = to_vec_f64(symmetrize_log_prob(vec![lp.clone(); 4]));
        assert!((out[0] + 1.5).abs() < 1e-12);
        assert!((out[1] + 0.25).abs() < 1e-12);
    }
}
