//! LSTM cell driving each site of the scan.
//!
//! ```text
//! gates = W_ih x + W_hh h (+ b)        split as [i | f | g | o]
//! c'    = σ(f) ⊙ c + σ(i) ⊙ tanh(g)
//! h'    = σ(o) ⊙ tanh(c')
//! ```
//!
//! The scan treats `(h, c)` as its two hidden-state lanes `(h, h2)`.

use burn::module::Module;
use burn::nn::{Initializer, Linear, LinearConfig};
use burn::prelude::Backend;
use burn::tensor::activation::{sigmoid, tanh};
use burn::tensor::Tensor;

#[derive(Module, Debug)]
pub struct LstmCell<B: Backend> {
    input_gates: Linear<B>,
    hidden_gates: Linear<B>,
    hidden_size: usize,
}

impl<B: Backend> LstmCell<B> {
    /// Create a cell with input width `input_size` and hidden width `hidden_size`.
    ///
    /// Weights are drawn from `U(-1/√hidden, 1/√hidden)`, or set to zero when
    /// `zero_init` is requested.
    pub fn new(
        input_size: usize,
        hidden_size: usize,
        bias: bool,
        zero_init: bool,
        device: &B::Device,
    ) -> Self {
        let initializer = if zero_init {
            Initializer::Zeros
        } else {
            let bound = 1.0 / (hidden_size as f64).sqrt();
            Initializer::Uniform {
                min: -bound,
                max: bound,
            }
        };

        let input_gates = LinearConfig::new(input_size, 4 * hidden_size)
            .with_bias(bias)
            .with_initializer(initializer.clone())
            .init::<B>(device);
        let hidden_gates = LinearConfig::new(hidden_size, 4 * hidden_size)
            .with_bias(false)
            .with_initializer(initializer)
            .init::<B>(device);

        LstmCell {
            input_gates,
            hidden_gates,
            hidden_size,
        }
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// One step. `x: [batch, input]`, `h, c: [batch, hidden]` -> `(h', c')`.
    pub fn forward(
        &self,
        x: Tensor<B, 2>,
        h: Tensor<B, 2>,
        c: Tensor<B, 2>,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let gates = self.input_gates.forward(x) + self.hidden_gates.forward(h);
        let mut chunks = gates.chunk(4, 1).into_iter();
        let (Some(i), Some(f), Some(g), Some(o)) =
            (chunks.next(), chunks.next(), chunks.next(), chunks.next())
        else {
            unreachable!("gate tensor has width 4 * hidden_size");
        };

        let c_next = sigmoid(f) * c + sigmoid(i) * tanh(g);
        let h_next = sigmoid(o) * tanh(c_next.clone());
        (h_next, c_next)
    }
}
