//! Random symmetry transforms for symmetrized sampling.
//!
//! Drawing `x ~ q` and then a uniform group element `g` gives `g x` distributed
//! as `(1/|G|) Σ_g q(g x)`, the symmetrized model, at the cost of one scan.

use crate::rng::RngKey;
use burn::prelude::Backend;
use burn::tensor::{Tensor, TensorData};
use van_core::symmetry::{rotate180, Symmetry};

/// Independent per-row group elements for a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetryDraw {
    elements: Vec<Symmetry>,
}

impl SymmetryDraw {
    /// Draw a uniform sign and a uniform rotate flag for each of `batch` rows.
    pub fn draw(key: RngKey, batch: usize) -> Self {
        let (flip_key, rotate_key) = key.split_two();
        let flips = flip_key.coins(batch);
        let rotates = rotate_key.coins(batch);

        let elements = flips
            .into_iter()
            .zip(rotates)
            .map(|(flip, rotate)| match (flip, rotate) {
                (false, false) => Symmetry::Identity,
                (true, false) => Symmetry::Flip,
                (false, true) => Symmetry::Rotate180,
                (true, true) => Symmetry::FlipRotate180,
            })
            .collect();

        SymmetryDraw { elements }
    }

    pub fn elements(&self) -> &[Symmetry] {
        &self.elements
    }

    /// Apply row `b`'s element to row `b` of `x` (`[batch, L, L]`).
    pub fn apply<B: Backend>(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch, _, _] = x.dims();
        assert_eq!(
            batch,
            self.elements.len(),
            "symmetry draw covers {} rows, batch has {}",
            self.elements.len(),
            batch
        );
        let device = x.device();

        let sign: Vec<f64> = self
            .elements
            .iter()
            .map(|g| if g.flips() { -1.0 } else { 1.0 })
            .collect();
        let rotate: Vec<f64> = self
            .elements
            .iter()
            .map(|g| if g.rotates() { 1.0 } else { 0.0 })
            .collect();

        let sign: Tensor<B, 3> = Tensor::from_data(TensorData::new(sign, [batch, 1, 1]), &device);
        let rotate: Tensor<B, 3> =
            Tensor::from_data(TensorData::new(rotate, [batch, 1, 1]), &device);

        let flipped = x * sign;
        let rotated = rotate180(flipped.clone());
        rotated * rotate.clone() + flipped * (rotate.neg() + 1.0)
    }
}

/// Apply an independent uniform group element to every configuration.
pub fn apply_random_symmetry<B: Backend>(key: RngKey, x: Tensor<B, 3>) -> Tensor<B, 3> {
    let [batch, _, _] = x.dims();
    SymmetryDraw::draw(key, batch).apply(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use van_core::backend::CpuBackendF64;
    use van_core::tensor::to_vec_f64;

    type B = CpuBackendF64;

    #[test]
    fn test_draw_is_deterministic() {
        let a = SymmetryDraw::draw(RngKey::new(5), 32);
        let b = SymmetryDraw::draw(RngKey::new(5), 32);
        assert_eq!(a, b);
        assert_eq!(a.elements().len(), 32);
    }

    #[test]
    fn test_draw_covers_group() {
        let draw = SymmetryDraw::draw(RngKey::new(11), 4000);
        for g in Symmetry::ALL {
            let count = draw.elements().iter().filter(|&&e| e == g).count();
            assert!((count as f64 / 4000.0 - 0.25).abs() < 0.05, "{:?}: {}", g, count);
        }
    }

    #[test]
    fn test_apply_matches_elementwise_transform() {
        let device = Default::default();
        let batch = 16;
        let base = [1.0, -1.0, -1.0, -1.0];
        let x: Tensor<B, 3> = Tensor::from_data(
            TensorData::new(base.repeat(batch), [batch, 2, 2]),
            &device,
        );

        let draw = SymmetryDraw::draw(RngKey::new(3), batch);
        let out = to_vec_f64(draw.apply(x.clone()));

        for (b, g) in draw.elements().iter().enumerate() {
            let row = x.clone().slice([b..b + 1, 0..2, 0..2]);
            let expected = to_vec_f64(g.apply(row));
            assert_eq!(&out[b * 4..(b + 1) * 4], expected.as_slice(), "{:?}", g);
        }
    }
}
