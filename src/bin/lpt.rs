//! Command-line driver for configuration-driven particle tracking.
//!
//! Loads a JSON run configuration, assembles the field set and particle
//! set, runs the advection loop and writes a NetCDF trajectory file.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use lpt_rs::config::RunConfig;
use lpt_rs::io::{TrajectoryWriter, TrajectoryWriterConfig};
use lpt_rs::simulation::{SimulationError, build_simulation};

/// Lagrangian particle tracking over ocean velocity fields.
#[derive(Parser)]
#[command(name = "lpt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lagrangian particle tracking over ocean velocity fields", long_about = None)]
struct Cli {
    /// Path to the JSON run configuration
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = RunConfig::from_file(&cli.config)?;
    let (simulation, mut pset) = build_simulation(&config)?;

    std::fs::create_dir_all(&config.output.directory)?;
    let writer_config = TrajectoryWriterConfig::new(config.output.path().to_string_lossy())
        .with_title("Lagrangian particle trajectories");
    let output_vars = simulation.output_variables();
    let mut writer = TrajectoryWriter::create(writer_config, pset.released(), &output_vars)?;
    info!(
        path = %config.output.path().display(),
        interval_hours = config.output.output_interval_hours,
        "output file ready"
    );

    let start = Instant::now();
    let result = simulation.run_with_callback(&mut pset, |pset, _time| {
        writer
            .write_obs(pset)
            .map_err(|e| SimulationError::Output(e.to_string()))
    });

    if !result.success {
        anyhow::bail!(
            "simulation failed after {} steps: {}",
            result.n_steps,
            result.error.unwrap_or_default()
        );
    }

    info!(
        steps = result.n_steps,
        remaining = result.particles_remaining,
        released = result.particles_released,
        observations = writer.n_obs(),
        elapsed_s = format!("{:.2}", start.elapsed().as_secs_f64()),
        "simulation completed"
    );
    Ok(())
}
