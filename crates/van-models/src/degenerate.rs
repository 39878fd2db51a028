//! Degenerate all-down handling at the final scan site.
//!
//! The literal all-down configuration is identified with "all down except the
//! last scan site up":
//!
//! - scoring: a configuration whose only up spin sits on the last site gets
//!   that site's conditional term replaced by 0, so it carries
//!   `P(first n²-1 sites down)`, the mass of both configurations; the literal
//!   all-down configuration itself gets `-inf`.
//! - sampling: a batch row that comes out all down has its last site set up.
//!
//! Both rules key off [`ScanOrder::last_site`], and the up-counts are integer
//! comparisons. A single-site lattice has nothing to identify, so the
//! corrector is inactive there.

use burn::prelude::Backend;
use burn::tensor::{Int, Tensor, TensorData};
use van_core::lattice::{ScanOrder, Site};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegenerateStateCorrector {
    order: ScanOrder,
}

impl DegenerateStateCorrector {
    pub fn new(order: ScanOrder) -> Self {
        DegenerateStateCorrector { order }
    }

    /// The site whose term / value is patched.
    pub fn target_site(&self) -> Site {
        self.order.last_site()
    }

    pub fn is_active(&self) -> bool {
        self.order.n_sites() > 1
    }

    /// `[1, L, L]` indicator of the target site.
    fn target_indicator<B: Backend>(&self, device: &B::Device) -> Tensor<B, 3> {
        let size = self.order.size();
        let mut values = vec![0.0f64; self.order.n_sites()];
        values[self.order.flat_index(self.target_site())] = 1.0;
        Tensor::from_data(TensorData::new(values, [1, size, size]), device)
    }

    /// Up-spin value (0/1) at the target site, `[batch]`.
    fn target_up<B: Backend>(&self, x: Tensor<B, 3>) -> Tensor<B, 1> {
        let [batch, _, _] = x.dims();
        let Site { row, col } = self.target_site();
        ((x + 1.0) / 2.0)
            .slice([0..batch, row..row + 1, col..col + 1])
            .reshape([batch])
    }

    /// Patch the per-site log-probability grid of configurations `x`.
    ///
    /// Rows with exactly one up spin, located on the target site, get the
    /// target term multiplied by zero. Every other entry is untouched.
    pub fn correct_site_log_probs<B: Backend>(
        &self,
        x: Tensor<B, 3>,
        site_log_probs: Tensor<B, 3>,
    ) -> Tensor<B, 3> {
        if !self.is_active() {
            return site_log_probs;
        }
        let [batch, _, _] = x.dims();
        let device = x.device();

        let single_up = up_counts(x.clone()).equal_elem(1).float();
        let zeroed = (single_up * self.target_up(x)).reshape([batch, 1, 1]);
        let keep = (self.target_indicator::<B>(&device) * zeroed).neg() + 1.0;

        site_log_probs * keep
    }

    /// Give the literal all-down configuration zero probability.
    pub fn exclude_all_down<B: Backend>(
        &self,
        x: Tensor<B, 3>,
        log_prob: Tensor<B, 1>,
    ) -> Tensor<B, 1> {
        if !self.is_active() {
            return log_prob;
        }
        log_prob.mask_fill(up_counts(x).equal_elem(0), f64::NEG_INFINITY)
    }

    /// Force the target site up in every all-down sample.
    pub fn correct_samples<B: Backend>(&self, samples: Tensor<B, 3>) -> Tensor<B, 3> {
        if !self.is_active() {
            return samples;
        }
        let [batch, _, _] = samples.dims();
        let device = samples.device();

        let all_down = up_counts(samples.clone())
            .equal_elem(0)
            .float()
            .reshape([batch, 1, 1]);
        let patch = (self.target_indicator::<B>(&device) * all_down).greater_elem(0.5);

        samples.mask_fill(patch, 1.0)
    }
}

/// Number of up spins per configuration, exact integers, `[batch]`.
pub fn up_counts<B: Backend>(x: Tensor<B, 3>) -> Tensor<B, 1, Int> {
    let [batch, _, _] = x.dims();
    ((x + 1.0) / 2.0)
        .int()
        .sum_dim(2)
        .sum_dim(1)
        .reshape([batch])
}
