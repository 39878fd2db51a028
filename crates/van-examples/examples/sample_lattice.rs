//! Sample Lattice Example
//!
//! Builds an LSTM-2D model from CLI / env / config-file settings, draws a batch
//! of lattices and scores them.
//!
//! ```text
//! cargo run -p van-examples --example sample_lattice -- -L 6 --net-width 16 --z2 true
//! ```

use anyhow::{anyhow, Result};
use burn::prelude::Backend;
use clap::Parser;
use van_core::backend::DeviceKind;
use van_core::config::{VanArgs, VanConfig};
use van_core::tensor::to_vec_f64;
use van_examples::{format_lattice, magnetizations};
use van_models::Lstm2d;
use van_samplers::RngKey;

#[derive(Parser, Debug)]
#[command(about = "Draw lattices from an LSTM-2D model")]
struct Cli {
    #[command(flatten)]
    van: VanArgs,

    /// Number of configurations to draw
    #[arg(long, default_value_t = 8)]
    batch_size: usize,

    /// Number of drawn lattices to print
    #[arg(long, default_value_t = 2)]
    show: usize,
}

fn run<B: Backend>(config: &VanConfig, cli: &Cli, device: B::Device) -> Result<()> {
    let model = Lstm2d::<B>::new(config, &device).map_err(|e| anyhow!(e))?;
    let size = config.lattice_size;

    let (samples, _) = model.sample(cli.batch_size, RngKey::new(config.seed));
    let log_probs = to_vec_f64(model.try_log_prob(samples.clone()).map_err(|e| anyhow!(e))?);
    let values = to_vec_f64(samples.clone());
    let mags = magnetizations(samples);

    for (idx, lattice) in values.chunks(size * size).take(cli.show).enumerate() {
        println!(
            "sample {}  log q = {:.4}  m = {:+.3}",
            idx, log_probs[idx], mags[idx]
        );
        println!("{}\n", format_lattice(lattice, size));
    }

    let mean_log_prob = log_probs.iter().sum::<f64>() / log_probs.len() as f64;
    let mean_abs_mag = mags.iter().map(|m| m.abs()).sum::<f64>() / mags.len() as f64;
    println!("batch of {}:", cli.batch_size);
    println!("  mean log q = {:.4}", mean_log_prob);
    println!("  mean |m|   = {:.4}", mean_abs_mag);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = VanConfig::from_van_args(cli.van.clone()).map_err(|e| anyhow!(e))?;
    config.log_summary();

    if cli.batch_size == 0 {
        return Err(anyhow!("--batch-size must be at least 1"));
    }

    match config.device {
        DeviceKind::Cpu => run::<van_core::backend::CpuBackend>(
            &config,
            &cli,
            van_core::backend::init_cpu_device(),
        ),
        #[cfg(feature = "gpu")]
        DeviceKind::Gpu => run::<van_core::backend::WgpuBackend>(
            &config,
            &cli,
            van_core::backend::init_gpu_device(),
        ),
        #[cfg(not(feature = "gpu"))]
        DeviceKind::Gpu => Err(anyhow!("built without the `gpu` feature")),
    }
}
