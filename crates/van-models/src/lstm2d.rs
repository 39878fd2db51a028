//! LSTM-2D variational autoregressive network.
//!
//! The model factorizes a lattice distribution in snake order,
//!
//! ```text
//! q(x) = Π_k q(x_k | x_<k)
//! ```
//!
//! where the conditional at each site sees its left and top neighbors' values
//! and hidden states. Scoring (`log_prob`) and drawing (`sample`) run the
//! same [`LatticeScanner`] traversal; the [`DegenerateStateCorrector`] then
//! applies the matching all-down rule in each mode.
//!
//! With `z2` enabled the model is averaged over the
//! {identity, flip, rot180, flip∘rot180} group: scoring takes a log-sum-exp
//! over the four images, sampling applies one uniformly drawn element per row.

use burn::module::Module;
use burn::prelude::Backend;
use burn::tensor::Tensor;
use van_core::config::VanConfig;
use van_core::lattice::ScanOrder;
use van_core::symmetry::{orbit, symmetrize_log_prob};
use van_core::tensor::spin_deviation;
use van_samplers::{apply_random_symmetry, BernoulliSpinSampler, RngKey, SpinConditionalSampler};

use crate::degenerate::DegenerateStateCorrector;
use crate::model::AutoregressiveModel;
use crate::scan::{Drawing, LatticeScanner, Scoring};
use crate::stepper::SiteStepper;

#[derive(Module, Debug)]
pub struct Lstm2d<B: Backend> {
    stepper: SiteStepper<B>,
    lattice_size: usize,
    z2: bool,
}

impl<B: Backend> Lstm2d<B> {
    /// Build the model described by `config` on `device`.
    pub fn new(config: &VanConfig, device: &B::Device) -> Result<Self, String> {
        config.validate()?;
        log::info!(
            "building LSTM-2D: L={} width={} bias={} z2={} zero_init={}",
            config.lattice_size,
            config.net_width,
            config.bias,
            config.z2,
            config.zero_init
        );

        Ok(Lstm2d {
            stepper: SiteStepper::new(config.net_width, config.bias, config.zero_init, device),
            lattice_size: config.lattice_size,
            z2: config.z2,
        })
    }

    pub fn lattice_size(&self) -> usize {
        self.lattice_size
    }

    pub fn scan_order(&self) -> ScanOrder {
        ScanOrder::new(self.lattice_size)
    }

    pub fn corrector(&self) -> DegenerateStateCorrector {
        DegenerateStateCorrector::new(self.scan_order())
    }

    fn device(&self) -> B::Device {
        self.stepper.device()
    }

    /// Check that `x` is a non-empty `[batch, L, L]` batch of ±1 spins.
    pub fn validate_configurations(&self, x: &Tensor<B, 3>) -> Result<(), String> {
        let [batch, rows, cols] = x.dims();
        let l = self.lattice_size;
        if batch == 0 {
            return Err("empty configuration batch".to_string());
        }
        if rows != l || cols != l {
            return Err(format!(
                "configuration shape [{}, {}, {}] does not match lattice {}x{}",
                batch, rows, cols, l, l
            ));
        }
        let deviation = spin_deviation(x.clone());
        if deviation != 0.0 {
            return Err(format!(
                "configuration values must be exactly -1 or +1 (max deviation {})",
                deviation
            ));
        }
        Ok(())
    }

    /// Corrected per-site log-probabilities `[batch, L, L]` of configurations `x`.
    ///
    /// Summing over sites gives [`log_prob_unsymmetrized`](Self::log_prob_unsymmetrized)
    /// for every configuration except the literal all-down one.
    pub fn site_log_probs(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch, _, _] = x.dims();
        let order = self.scan_order();

        let mut scoring = Scoring::new(x.clone(), order);
        LatticeScanner::new(&self.stepper, order, batch, x.device()).run(&mut scoring);

        self.corrector()
            .correct_site_log_probs(x, scoring.into_site_log_probs(order))
    }

    /// Log-probability under the plain snake-order factorization, without
    /// symmetry averaging.
    pub fn log_prob_unsymmetrized(&self, x: Tensor<B, 3>) -> Tensor<B, 1> {
        let [batch, _, _] = x.dims();
        let total = self
            .site_log_probs(x.clone())
            .sum_dim(2)
            .sum_dim(1)
            .reshape([batch]);
        self.corrector().exclude_all_down(x, total)
    }

    /// Log-probability of each configuration, validating the input first.
    pub fn try_log_prob(&self, x: Tensor<B, 3>) -> Result<Tensor<B, 1>, String> {
        self.validate_configurations(&x)?;

        if !self.z2 {
            return Ok(self.log_prob_unsymmetrized(x));
        }

        let images = orbit(x)
            .into_iter()
            .map(|image| self.log_prob_unsymmetrized(image))
            .collect();
        Ok(symmetrize_log_prob(images))
    }

    /// Log-probability of each configuration in `x: [batch, L, L]`.
    ///
    /// # Panics
    ///
    /// If `x` has the wrong shape or holds values other than ±1.
    pub fn log_prob(&self, x: Tensor<B, 3>) -> Tensor<B, 1> {
        self.try_log_prob(x)
            .unwrap_or_else(|e| panic!("invalid input to Lstm2d::log_prob: {}", e))
    }

    /// Draw `batch_size` configurations with the Bernoulli spin sampler.
    ///
    /// Returns `(samples, x_hat)`, where `x_hat` is a zero tensor of the same
    /// shape kept for callers that expect a pair.
    pub fn sample(&self, batch_size: usize, key: RngKey) -> (Tensor<B, 3>, Tensor<B, 3>) {
        self.sample_with(&BernoulliSpinSampler, batch_size, key)
    }

    /// Draw `batch_size` configurations using `sampler` for every site.
    ///
    /// # Panics
    ///
    /// If `batch_size == 0`.
    pub fn sample_with<S: SpinConditionalSampler<B>>(
        &self,
        sampler: &S,
        batch_size: usize,
        key: RngKey,
    ) -> (Tensor<B, 3>, Tensor<B, 3>) {
        assert!(batch_size > 0, "batch_size must be at least 1");
        let order = self.scan_order();
        let device = self.device();
        let (scan_key, symmetry_key) = key.split_two();

        let mut drawing = Drawing::new(sampler, scan_key, order);
        LatticeScanner::new(&self.stepper, order, batch_size, device).run(&mut drawing);

        let samples = self.corrector().correct_samples(drawing.into_samples(order));
        let samples = if self.z2 {
            apply_random_symmetry(symmetry_key, samples)
        } else {
            samples
        };

        let x_hat = samples.zeros_like();
        (samples, x_hat)
    }
}

impl<B: Backend> AutoregressiveModel<B> for Lstm2d<B> {
    fn lattice_size(&self) -> usize {
        self.lattice_size
    }

    fn log_prob(&self, x: Tensor<B, 3>) -> Tensor<B, 1> {
        Lstm2d::log_prob(self, x)
    }

    fn sample(&self, batch_size: usize, key: RngKey) -> (Tensor<B, 3>, Tensor<B, 3>) {
        Lstm2d::sample(self, batch_size, key)
    }
}
