//! # van-samplers
//!
//! Sampling primitives for VAN-2D:
//!
//! - **RNG keys**: deterministic, splittable keys via [`RngKey`]
//! - **Bernoulli spin sampler**: draws ±1 sites from 2-class log-distributions
//!   via [`BernoulliSpinSampler`]
//! - **Random symmetry**: per-configuration flip / 180° rotation draws via
//!   [`SymmetryDraw`]
//!
//! ## RNG Key System
//!
//! ```rust
//! use van_samplers::RngKey;
//!
//! let key = RngKey::new(42);
//! let (scan_key, symmetry_key) = key.split_two();
//! assert_ne!(scan_key, symmetry_key);
//! ```

#![recursion_limit = "256"] // Required for burn-wgpu

pub mod bernoulli;
pub mod rng;
pub mod sampler;
pub mod symmetry;

pub use bernoulli::*;
pub use rng::*;
pub use sampler::*;
pub use symmetry::*;
