use crate::rng::RngKey;
use crate::sampler::SpinConditionalSampler;
use burn::prelude::Backend;
use burn::tensor::{Tensor, TensorData};

/// Bernoulli sampler for spin-valued sites.
///
/// Draws `up` with probability `exp(log_probs[:, 0])`, mapping up to +1 and
/// down to -1.
#[derive(Debug, Clone, Copy, Default)]
pub struct BernoulliSpinSampler;

impl BernoulliSpinSampler {
    pub const fn new() -> Self {
        Self
    }
}

impl<B: Backend> SpinConditionalSampler<B> for BernoulliSpinSampler {
    fn sample(&self, key: RngKey, log_probs: Tensor<B, 2>) -> Tensor<B, 1> {
        let [batch, classes] = log_probs.dims();
        debug_assert_eq!(classes, 2, "spin sites have exactly two outcomes");

        let p_up = log_probs.slice([0..batch, 0..1]).reshape([batch]).exp();
        let uniform: Tensor<B, 1> = Tensor::from_data(
            TensorData::new(key.uniform(batch), [batch]),
            &p_up.device(),
        );

        spins_from_uniform(uniform, p_up)
    }
}

/// Map uniform draws to spins: +1 where `u < p_up`, else -1.
pub fn spins_from_uniform<B: Backend>(
    uniform: Tensor<B, 1>,
    p_up: Tensor<B, 1>,
) -> Tensor<B, 1> {
    uniform.lower(p_up).float() * 2.0 - 1.0
}
