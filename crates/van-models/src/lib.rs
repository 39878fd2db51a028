//! # van-models
//!
//! The LSTM-2D variational autoregressive network (VAN) over `L x L` Ising
//! spin lattices.
//!
//! ## Architecture
//!
//! - [`Lstm2d`]: the model; exact `log_prob` and ancestral `sample`
//! - [`LatticeScanner`]: snake-order traversal shared by both operations
//! - [`SiteStepper`]: one site of the recursion (context merge, LSTM cell, head)
//! - [`DegenerateStateCorrector`]: all-down handling at the last scan site
//! - [`AutoregressiveModel`]: the trait the model implements
//!
//! ## Example
//!
//! ```rust
//! use van_core::{CpuBackendF64, VanConfig};
//! use van_models::Lstm2d;
//! use van_samplers::RngKey;
//!
//! let config = VanConfig::builder().lattice_size(3).net_width(4).build().unwrap();
//! let device = Default::default();
//! let model = Lstm2d::<CpuBackendF64>::new(&config, &device).unwrap();
//!
//! let (samples, _) = model.sample(8, RngKey::new(0));
//! let log_prob = model.log_prob(samples);
//! assert_eq!(log_prob.dims(), [8]);
//! ```

#![recursion_limit = "256"] // Required for burn-wgpu

pub mod cell;
pub mod degenerate;
pub mod lstm2d;
pub mod model;
pub mod scan;
pub mod stepper;

pub use cell::*;
pub use degenerate::*;
pub use lstm2d::*;
pub use model::*;
pub use scan::*;
pub use stepper::*;
