use crate::rng::RngKey;
use burn::prelude::Backend;
use burn::tensor::Tensor;

/// Trait for per-site conditional samplers used by autoregressive scans.
///
/// A sampler receives the site's 2-class log-distribution `[batch, 2]`
/// (column 0 = log P(up), column 1 = log P(down)) and returns one spin in
/// {-1, +1} per batch row. All randomness comes from `key`.
pub trait SpinConditionalSampler<B: Backend> {
    fn sample(&self, key: RngKey, log_probs: Tensor<B, 2>) -> Tensor<B, 1>;
}
