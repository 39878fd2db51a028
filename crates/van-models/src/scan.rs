//! Snake-order scan over the lattice.
//!
//! [`LatticeScanner`] owns the traversal: for every site it resolves the
//! left/top context, runs the [`SiteStepper`] and stores the new hidden pair in
//! a write-once [`SiteArena`]. What a site's value is and what happens to its
//! 2-class distribution is delegated to a [`ScanMode`]:
//!
//! - [`Scoring`] reads values from a given batch and keeps the log-probability
//!   of the observed spin,
//! - [`Drawing`] draws each value from the distribution and feeds it forward.
//!
//! Sharing the traversal keeps the conditionals of `log_prob` and `sample`
//! identical by construction.

use burn::prelude::Backend;
use burn::tensor::Tensor;
use van_core::lattice::{Neighbors, ScanOrder, Site, SiteArena};
use van_samplers::{RngKey, SpinConditionalSampler};

use crate::stepper::{HiddenPair, SiteContext, SiteStepper};

/// Per-site behavior of a scan.
pub trait ScanMode<B: Backend> {
    /// Value `[batch]` of an already-visited site.
    fn value(&self, site: Site) -> Tensor<B, 1>;

    /// Consume the `[batch, 2]` log-distribution produced at `site`.
    fn record(&mut self, site: Site, log_probs: Tensor<B, 2>);
}

pub struct LatticeScanner<'a, B: Backend> {
    stepper: &'a SiteStepper<B>,
    order: ScanOrder,
    batch: usize,
    device: B::Device,
}

impl<'a, B: Backend> LatticeScanner<'a, B> {
    pub fn new(
        stepper: &'a SiteStepper<B>,
        order: ScanOrder,
        batch: usize,
        device: B::Device,
    ) -> Self {
        LatticeScanner {
            stepper,
            order,
            batch,
            device,
        }
    }

    /// Visit every site in scan order.
    pub fn run<M: ScanMode<B>>(&self, mode: &mut M) {
        log::debug!(
            "scanning {} sites (L={}) for batch {}",
            self.order.n_sites(),
            self.order.size(),
            self.batch
        );

        let zero_value: Tensor<B, 1> = Tensor::zeros([self.batch], &self.device);
        let zero_hidden = HiddenPair::zeros(self.batch, self.stepper.width(), &self.device);
        let mut hidden: SiteArena<HiddenPair<B>> = SiteArena::new(self.order);

        for site in self.order.sites() {
            let Neighbors { left, top } = self.order.resolve(site);

            let value_of =
                |n: Option<Site>| n.map_or_else(|| zero_value.clone(), |s| mode.value(s));
            let hidden_of = |n: Option<Site>| {
                n.map_or_else(|| zero_hidden.clone(), |s| hidden.visited(s).clone())
            };

            let ctx = SiteContext {
                left_value: value_of(left),
                top_value: value_of(top),
                left_hidden: hidden_of(left),
                top_hidden: hidden_of(top),
            };

            let out = self.stepper.step(ctx);
            hidden.insert(site, out.hidden);
            mode.record(site, out.log_probs);
        }
    }
}

/// Assemble a complete per-site arena of `[batch]` columns into `[batch, L, L]`.
///
/// # Panics
///
/// If a site was never written.
pub fn arena_to_grid<B: Backend>(
    arena: SiteArena<Tensor<B, 1>>,
    order: ScanOrder,
) -> Tensor<B, 3> {
    let size = order.size();
    let columns = arena
        .into_row_major()
        .unwrap_or_else(|| panic!("scan finished with unvisited sites"));
    let [batch] = columns[0].dims();
    let flat: Tensor<B, 2> = Tensor::stack(columns, 1);
    flat.reshape([batch, size, size])
}

fn site_column<B: Backend>(x: &Tensor<B, 3>, site: Site) -> Tensor<B, 1> {
    let [batch, _, _] = x.dims();
    x.clone()
        .slice([0..batch, site.row..site.row + 1, site.col..site.col + 1])
        .reshape([batch])
}

/// Inference mode: keep `log P(x_site | context)` for the observed spins.
pub struct Scoring<B: Backend> {
    x: Tensor<B, 3>,
    terms: SiteArena<Tensor<B, 1>>,
}

impl<B: Backend> Scoring<B> {
    pub fn new(x: Tensor<B, 3>, order: ScanOrder) -> Self {
        Scoring {
            x,
            terms: SiteArena::new(order),
        }
    }

    /// Per-site selected log-probabilities, `[batch, L, L]`, before any correction.
    pub fn into_site_log_probs(self, order: ScanOrder) -> Tensor<B, 3> {
        arena_to_grid(self.terms, order)
    }
}

impl<B: Backend> ScanMode<B> for Scoring<B> {
    fn value(&self, site: Site) -> Tensor<B, 1> {
        site_column(&self.x, site)
    }

    fn record(&mut self, site: Site, log_probs: Tensor<B, 2>) {
        let [batch, _] = log_probs.dims();
        let mask = (site_column(&self.x, site) + 1.0) / 2.0;
        let up = log_probs.clone().slice([0..batch, 0..1]).reshape([batch]);
        let down = log_probs.slice([0..batch, 1..2]).reshape([batch]);

        let selected = up * mask.clone() + down * (mask.neg() + 1.0);
        self.terms.insert(site, selected);
    }
}

/// Generative mode: draw each site with its own key and feed it forward.
pub struct Drawing<'s, B: Backend, S> {
    sampler: &'s S,
    keys: Vec<RngKey>,
    step: usize,
    values: SiteArena<Tensor<B, 1>>,
}

impl<'s, B: Backend, S: SpinConditionalSampler<B>> Drawing<'s, B, S> {
    /// `key` is split into one key per site.
    pub fn new(sampler: &'s S, key: RngKey, order: ScanOrder) -> Self {
        Drawing {
            sampler,
            keys: key.split(order.n_sites()),
            step: 0,
            values: SiteArena::new(order),
        }
    }

    /// Drawn spins, `[batch, L, L]`, before any correction.
    pub fn into_samples(self, order: ScanOrder) -> Tensor<B, 3> {
        arena_to_grid(self.values, order)
    }
}

impl<B: Backend, S: SpinConditionalSampler<B>> ScanMode<B> for Drawing<'_, B, S> {
    fn value(&self, site: Site) -> Tensor<B, 1> {
        self.values.visited(site).clone()
    }

    fn record(&mut self, site: Site, log_probs: Tensor<B, 2>) {
        let key = self.keys[self.step];
        self.step += 1;
        let spins = self.sampler.sample(key, log_probs);
        self.values.insert(site, spins);
    }
}
