//! One site of the 2D recursion.
//!
//! Left and top context are merged into a single cell input before the LSTM
//! step:
//!
//! ```text
//! x_inter  = W_x  [x_left, x_top]          (2  -> 1, no bias)
//! h_inter  = W_h  [h_left | h_top]         (2w -> w, no bias)
//! h_inter2 = W_h2 [h2_left | h2_top]       (2w -> w, no bias)
//! embedded = [(x_inter+1)/2, 1-(x_inter+1)/2]
//! (h', h2') = cell(embedded, (h_inter, h_inter2))
//! y        = log_softmax(W_out h')         column 0 = up, column 1 = down
//! ```

use burn::module::Module;
use burn::nn::{Initializer, Linear, LinearConfig};
use burn::prelude::Backend;
use burn::tensor::activation::log_softmax;
use burn::tensor::Tensor;

use crate::cell::LstmCell;

/// The two hidden-state lanes stored per site.
#[derive(Debug, Clone)]
pub struct HiddenPair<B: Backend> {
    pub h: Tensor<B, 2>,
    pub h2: Tensor<B, 2>,
}

impl<B: Backend> HiddenPair<B> {
    /// Zero lanes, the boundary sentinel.
    pub fn zeros(batch: usize, width: usize, device: &B::Device) -> Self {
        HiddenPair {
            h: Tensor::zeros([batch, width], device),
            h2: Tensor::zeros([batch, width], device),
        }
    }
}

/// Resolved context of one site: neighbor values `[batch]` and hidden lanes.
#[derive(Debug, Clone)]
pub struct SiteContext<B: Backend> {
    pub left_value: Tensor<B, 1>,
    pub top_value: Tensor<B, 1>,
    pub left_hidden: HiddenPair<B>,
    pub top_hidden: HiddenPair<B>,
}

/// Output of one step.
#[derive(Debug, Clone)]
pub struct SiteOutput<B: Backend> {
    pub hidden: HiddenPair<B>,
    /// `[batch, 2]` log-probabilities, column 0 = up.
    pub log_probs: Tensor<B, 2>,
}

#[derive(Module, Debug)]
pub struct SiteStepper<B: Backend> {
    x_merge: Linear<B>,
    h_merge: Linear<B>,
    h2_merge: Linear<B>,
    cell: LstmCell<B>,
    head: Linear<B>,
}

impl<B: Backend> SiteStepper<B> {
    pub fn new(width: usize, bias: bool, zero_init: bool, device: &B::Device) -> Self {
        let merge = |d_in: usize, d_out: usize| {
            let config = LinearConfig::new(d_in, d_out).with_bias(false);
            let config = if zero_init {
                config.with_initializer(Initializer::Zeros)
            } else {
                config
            };
            config.init::<B>(device)
        };

        let head = LinearConfig::new(width, 2).with_bias(bias);
        let head = if zero_init {
            head.with_initializer(Initializer::Zeros)
        } else {
            head
        };

        SiteStepper {
            x_merge: merge(2, 1),
            h_merge: merge(2 * width, width),
            h2_merge: merge(2 * width, width),
            cell: LstmCell::new(2, width, bias, zero_init, device),
            head: head.init::<B>(device),
        }
    }

    pub fn width(&self) -> usize {
        self.cell.hidden_size()
    }

    pub fn device(&self) -> B::Device {
        self.head.weight.val().device()
    }

    pub fn step(&self, ctx: SiteContext<B>) -> SiteOutput<B> {
        let [batch] = ctx.left_value.dims();

        let x_pair: Tensor<B, 2> = Tensor::stack(vec![ctx.left_value, ctx.top_value], 1);
        let x_inter = self.x_merge.forward(x_pair).reshape([batch]);

        let h_inter = self
            .h_merge
            .forward(Tensor::cat(vec![ctx.left_hidden.h, ctx.top_hidden.h], 1));
        let h_inter2 = self
            .h2_merge
            .forward(Tensor::cat(vec![ctx.left_hidden.h2, ctx.top_hidden.h2], 1));

        let (h, h2) = self.cell.forward(embed(x_inter), h_inter, h_inter2);
        let log_probs = log_softmax(self.head.forward(h.clone()), 1);

        SiteOutput {
            hidden: HiddenPair { h, h2 },
            log_probs,
        }
    }
}

/// `[(x+1)/2, 1-(x+1)/2]`: +1 -> [1, 0], -1 -> [0, 1], sentinel 0 -> [½, ½].
pub fn embed<B: Backend>(x: Tensor<B, 1>) -> Tensor<B, 2> {
    let up = (x + 1.0) / 2.0;
    let down = up.clone().neg() + 1.0;
    Tensor::stack(vec![up, down], 1)
}
