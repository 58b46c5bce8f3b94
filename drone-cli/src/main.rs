use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use drone_cli::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Drone simulator starting...");
    let settings = args.settings().context("Failed to load settings")?;
    log::info!(
        "Drones: {}, tick: {} ms",
        settings.initial_drones,
        settings.tick_interval_ms
    );

    // Single-threaded: every tick and command is handled on one task.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build runtime")?;
    let result = runtime.block_on(drone_cli::run(&args, &settings));

    // A pending stdin read would otherwise hold shutdown open.
    runtime.shutdown_timeout(Duration::from_millis(100));

    result.context("Simulator error")
}
