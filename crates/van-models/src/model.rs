//! Autoregressive model abstraction.
//!
//! An autoregressive model over `L x L` spin lattices exposes the exact,
//! normalized log-probability of configurations together with a matching
//! sampler. Every implementation must satisfy
//!
//! ```text
//! Σ_{x ∈ {-1,+1}^(L²)} exp(log_prob(x)) = 1
//! ```
//!
//! and `sample` must draw from the same distribution that `log_prob` scores.

use burn::prelude::Backend;
use burn::tensor::Tensor;
use van_samplers::RngKey;

/// Trait for models with a tractable normalized density and an exact sampler.
pub trait AutoregressiveModel<B: Backend> {
    /// Side length `L` of the lattices this model is defined on.
    fn lattice_size(&self) -> usize;

    /// Log-probability of each configuration.
    ///
    /// # Arguments
    ///
    /// * `x` - Configurations `[batch, L, L]` with values in {-1, +1}
    ///
    /// # Returns
    ///
    /// Log-probabilities `[batch]`
    fn log_prob(&self, x: Tensor<B, 3>) -> Tensor<B, 1>;

    /// Draw `batch_size` configurations.
    ///
    /// # Returns
    ///
    /// `(samples, x_hat)`: samples `[batch_size, L, L]` with values in {-1, +1},
    /// and an auxiliary tensor of the same shape.
    fn sample(&self, batch_size: usize, key: RngKey) -> (Tensor<B, 3>, Tensor<B, 3>);

    /// Number of lattice sites.
    fn n_sites(&self) -> usize {
        self.lattice_size() * self.lattice_size()
    }
}
