//! Model configuration for VAN-2D.
//!
//! A [`VanConfig`] carries the hyperparameters of the LSTM-2D model plus the
//! device and seed used by the demos. Values can be supplied via:
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`VAN_*`)
//! 3. Config file (`~/.config/van/config.toml`, or `--config-file`)
//! 4. Built-in defaults
//!
//! # Example
//!
//! ```ignore
//! use van_core::config::VanConfig;
//!
//! let config = VanConfig::builder()
//!     .lattice_size(4)
//!     .net_width(16)
//!     .z2(true)
//!     .build()?;
//! ```
//!
//! Only `lattice_size`, `net_width`, `bias`, `z2` and `zero_init` shape the
//! autoregressive core. `net_depth`, `res_block`, `x_hat_clip` and `epsilon`
//! belong to the surrounding training harness and are carried through so a
//! single file describes a whole run.

use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::DeviceKind;

/// CLI arguments for model configuration
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about = "VAN-2D model configuration")]
pub struct VanArgs {
    /// Lattice side length L (the lattice is L x L)
    #[arg(short = 'L', long, env = "VAN_LATTICE_SIZE")]
    pub lattice_size: Option<usize>,

    /// Number of stacked layers in the surrounding network
    #[arg(long, env = "VAN_NET_DEPTH")]
    pub net_depth: Option<usize>,

    /// Hidden-state width of the recurrent cell
    #[arg(long, env = "VAN_NET_WIDTH")]
    pub net_width: Option<usize>,

    /// Use bias terms in the recurrent cell and output head
    #[arg(long, env = "VAN_BIAS")]
    pub bias: Option<bool>,

    /// Average over the {identity, flip, rot180, flip+rot180} group
    #[arg(long, env = "VAN_Z2")]
    pub z2: Option<bool>,

    /// Residual connections in the surrounding network
    #[arg(long, env = "VAN_RES_BLOCK")]
    pub res_block: Option<bool>,

    /// Output clipping applied by the surrounding network
    #[arg(long, env = "VAN_X_HAT_CLIP")]
    pub x_hat_clip: Option<f64>,

    /// Numerical epsilon used by the surrounding network
    #[arg(long, env = "VAN_EPSILON")]
    pub epsilon: Option<f64>,

    /// Compute device: cpu or gpu
    #[arg(long, env = "VAN_DEVICE")]
    pub device: Option<DeviceKind>,

    /// Seed for sampling keys
    #[arg(long, env = "VAN_SEED")]
    pub seed: Option<u64>,

    /// Initialize every parameter to zero (uniform conditionals)
    #[arg(long, env = "VAN_ZERO_INIT")]
    pub zero_init: Option<bool>,

    /// Path to config file
    #[arg(long, env = "VAN_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,
}

/// Configuration as stored on disk. Every field is optional so a file only
/// needs to name what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VanConfigFile {
    pub lattice_size: Option<usize>,
    pub net_depth: Option<usize>,
    pub net_width: Option<usize>,
    pub bias: Option<bool>,
    pub z2: Option<bool>,
    pub res_block: Option<bool>,
    pub x_hat_clip: Option<f64>,
    pub epsilon: Option<f64>,
    pub device: Option<DeviceKind>,
    pub seed: Option<u64>,
    pub zero_init: Option<bool>,
}

/// Resolved and validated model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VanConfig {
    pub lattice_size: usize,
    pub net_depth: usize,
    pub net_width: usize,
    pub bias: bool,
    pub z2: bool,
    pub res_block: bool,
    pub x_hat_clip: f64,
    pub epsilon: f64,
    pub device: DeviceKind,
    pub seed: u64,
    pub zero_init: bool,
}

impl Default for VanConfig {
    fn default() -> Self {
        VanConfig {
            lattice_size: 4,
            net_depth: 1,
            net_width: 16,
            bias: true,
            z2: false,
            res_block: false,
            x_hat_clip: 0.0,
            epsilon: 1e-7,
            device: DeviceKind::Cpu,
            seed: 0,
            zero_init: false,
        }
    }
}

impl VanConfig {
    /// Parse configuration from CLI arguments
    pub fn from_args() -> Result<Self, String> {
        Self::from_van_args(VanArgs::parse())
    }

    /// Create configuration from parsed [`VanArgs`].
    ///
    /// Use this when `VanArgs` is flattened into a larger CLI parser.
    pub fn from_van_args(args: VanArgs) -> Result<Self, String> {
        let file_config = Self::load_config_file(args.config_file.as_deref())?;
        Self::merge(args, file_config)
    }

    /// Merge CLI/env values over file values over defaults, then validate.
    pub fn merge(args: VanArgs, file: VanConfigFile) -> Result<Self, String> {
        let defaults = VanConfig::default();
        let config = VanConfig {
            lattice_size: args
                .lattice_size
                .or(file.lattice_size)
                .unwrap_or(defaults.lattice_size),
            net_depth: args
                .net_depth
                .or(file.net_depth)
                .unwrap_or(defaults.net_depth),
            net_width: args
                .net_width
                .or(file.net_width)
                .unwrap_or(defaults.net_width),
            bias: args.bias.or(file.bias).unwrap_or(defaults.bias),
            z2: args.z2.or(file.z2).unwrap_or(defaults.z2),
            res_block: args
                .res_block
                .or(file.res_block)
                .unwrap_or(defaults.res_block),
            x_hat_clip: args
                .x_hat_clip
                .or(file.x_hat_clip)
                .unwrap_or(defaults.x_hat_clip),
            epsilon: args.epsilon.or(file.epsilon).unwrap_or(defaults.epsilon),
            device: args.device.or(file.device).unwrap_or(defaults.device),
            seed: args.seed.or(file.seed).unwrap_or(defaults.seed),
            zero_init: args
                .zero_init
                .or(file.zero_init)
                .unwrap_or(defaults.zero_init),
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a new builder for custom configuration
    pub fn builder() -> VanConfigBuilder {
        VanConfigBuilder::new()
    }

    /// Check the invariants the model relies on.
    pub fn validate(&self) -> Result<(), String> {
        if self.lattice_size == 0 {
            return Err("lattice_size must be at least 1".to_string());
        }
        if self.net_width == 0 {
            return Err("net_width must be at least 1".to_string());
        }
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return Err(format!("epsilon must be finite and >= 0, got {}", self.epsilon));
        }
        if !(self.x_hat_clip.is_finite() && self.x_hat_clip >= 0.0) {
            return Err(format!(
                "x_hat_clip must be finite and >= 0, got {}",
                self.x_hat_clip
            ));
        }
        if !self.device.is_available() {
            return Err(format!(
                "device '{}' requested but this build lacks the `gpu` feature",
                self.device
            ));
        }
        Ok(())
    }

    /// Number of lattice sites, `L * L`.
    pub fn n_sites(&self) -> usize {
        self.lattice_size * self.lattice_size
    }

    /// Log a configuration summary
    pub fn log_summary(&self) {
        log::info!(
            "VAN-2D config: L={} width={} depth={} bias={} z2={} device={} seed={}",
            self.lattice_size,
            self.net_width,
            self.net_depth,
            self.bias,
            self.z2,
            self.device,
            self.seed
        );
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "van").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load config file from path or default location.
    ///
    /// A missing default file is not an error; a missing explicit file or a
    /// file that fails to parse is.
    pub fn load_config_file(path: Option<&Path>) -> Result<VanConfigFile, String> {
        let (config_path, explicit) = match path {
            Some(p) => (Some(p.to_path_buf()), true),
            None => (Self::default_config_path(), false),
        };

        let Some(path) = config_path else {
            return Ok(VanConfigFile::default());
        };
        if !path.exists() {
            if explicit {
                return Err(format!("config file {:?} does not exist", path));
            }
            return Ok(VanConfigFile::default());
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read config file {:?}: {}", path, e))?;
        toml::from_str::<VanConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config file {:?}: {}", path, e))
    }

    /// Save current configuration to a file
    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        let file = VanConfigFile {
            lattice_size: Some(self.lattice_size),
            net_depth: Some(self.net_depth),
            net_width: Some(self.net_width),
            bias: Some(self.bias),
            z2: Some(self.z2),
            res_block: Some(self.res_block),
            x_hat_clip: Some(self.x_hat_clip),
            epsilon: Some(self.epsilon),
            device: Some(self.device),
            seed: Some(self.seed),
            zero_init: Some(self.zero_init),
        };

        let toml_str = toml::to_string_pretty(&file)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, toml_str)
    }
}

/// Builder for VanConfig
#[derive(Debug, Clone, Default)]
pub struct VanConfigBuilder {
    config: VanConfig,
}

impl VanConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lattice_size(mut self, lattice_size: usize) -> Self {
        self.config.lattice_size = lattice_size;
        self
    }

    pub fn net_depth(mut self, net_depth: usize) -> Self {
        self.config.net_depth = net_depth;
        self
    }

    pub fn net_width(mut self, net_width: usize) -> Self {
        self.config.net_width = net_width;
        self
    }

    pub fn bias(mut self, bias: bool) -> Self {
        self.config.bias = bias;
        self
    }

    pub fn z2(mut self, z2: bool) -> Self {
        self.config.z2 = z2;
        self
    }

    pub fn res_block(mut self, res_block: bool) -> Self {
        self.config.res_block = res_block;
        self
    }

    pub fn x_hat_clip(mut self, x_hat_clip: f64) -> Self {
        self.config.x_hat_clip = x_hat_clip;
        self
    }

    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    pub fn device(mut self, device: DeviceKind) -> Self {
        self.config.device = device;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn zero_init(mut self, zero_init: bool) -> Self {
        self.config.zero_init = zero_init;
        self
    }

    /// Build and validate the VanConfig
    pub fn build(self) -> Result<VanConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}
