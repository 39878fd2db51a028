//! # van-core
//!
//! Core types for VAN-2D, a two-dimensional variational autoregressive network
//! over `L x L` spin lattices.
//!
//! - [`ScanOrder`]: boustrophedon traversal, boundary resolution and the
//!   degenerate-state site
//! - [`SiteArena`]: write-once per-site storage used by the scan
//! - [`Symmetry`]: the {identity, flip, rot180, flip∘rot180} group and
//!   log-sum-exp symmetrization
//! - [`VanConfig`]: model hyperparameters from CLI, environment or TOML
//!
//! ## Backends
//!
//! Everything is generic over a burn [`Backend`](burn::prelude::Backend).
//! [`CpuBackend`] (NdArray) is always available; the `gpu` feature adds
//! `WgpuBackend`:
//!
//! ```rust,ignore
//! use van_core::backend::{ensure_metal_backend, init_gpu_device};
//!
//! ensure_metal_backend();
//! let device = init_gpu_device();
//! ```

#![recursion_limit = "256"] // Required for burn-wgpu

pub mod backend;
pub mod config;
pub mod lattice;
pub mod symmetry;
pub mod tensor;

pub use backend::*;
pub use config::*;
pub use lattice::*;
pub use symmetry::*;
pub use tensor::*;
