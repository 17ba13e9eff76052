use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::info;

use signal_sim::simulation::{
    FileSink, LogSink, MultiSink, SimConfig, SimController, StatusSink, DEFAULT_RUN_SECS,
};

#[derive(Parser)]
#[command(name = "signal_sim")]
#[command(about = "Concurrent traffic-signal simulation with adaptive green timing")]
struct Cli {
    /// Number of intersections to simulate (1-10; out-of-range values fall back to 3)
    #[arg(long, default_value = "3")]
    intersections: i64,

    /// Wall-clock run duration in seconds before automatic shutdown
    #[arg(long, default_value_t = DEFAULT_RUN_SECS)]
    run_secs: u64,

    /// Wall-clock milliseconds per simulated second
    #[arg(long, default_value = "1000")]
    tick_millis: u64,

    /// Seed for deterministic density sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Append a status record per phase transition to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = SimConfig {
        time_unit: Duration::from_millis(cli.tick_millis.max(1)),
        ..SimConfig::default()
    };

    let sink: Arc<dyn StatusSink> = match &cli.log_file {
        Some(path) => Arc::new(MultiSink::new(vec![
            Box::new(LogSink),
            Box::new(FileSink::open(path)?),
        ])),
        None => Arc::new(LogSink),
    };

    let mut controller = SimController::start(cli.intersections, config, cli.seed, sink);
    info!(
        "running {} intersections for {}s",
        controller.intersection_count(),
        cli.run_secs
    );

    controller.run_for(Duration::from_secs(cli.run_secs))?;

    info!("=== SIMULATION COMPLETE ===");
    info!("Intersections controlled: {}", controller.intersection_count());
    Ok(())
}
