//! Terminal front end for the drone simulator.

use std::time::Duration;

use anyhow::Result;
use drone_core::Stepper;
use drone_shared::{SimulatorSettings, Snapshot};
use tokio::io::BufReader;

pub mod cli;
pub mod command;
pub mod driver;

use cli::Args;
use driver::Driver;

/// Runs the simulator against stdin until it is done.
pub async fn run(args: &Args, settings: &SimulatorSettings) -> Result<()> {
    let stepper = Stepper::with_drones(settings.initial_drones);
    let mut driver = Driver::new(stepper, Duration::from_millis(settings.tick_interval_ms));
    if args.stay {
        driver = driver.stay_after_finish();
    }

    match args.initial_run()? {
        Some((target, config)) => driver.start(target, config),
        None => log::info!("Waiting for commands: start <lat> <lng> <ticks> | pause | resume | cancel | add | remove | status | quit"),
    }

    let json = args.json;
    let stepper = driver
        .run(BufReader::new(tokio::io::stdin()), |snapshot| {
            report(snapshot, json)
        })
        .await?;

    log::info!(
        "Simulation {} at tick {} with {} drone(s)",
        stepper.status(),
        stepper.elapsed_ticks(),
        stepper.len()
    );
    Ok(())
}

fn report(snapshot: &Snapshot, json: bool) {
    if json {
        match snapshot.to_json() {
            Ok(line) => println!("{}", line),
            Err(e) => log::warn!("Failed to encode snapshot: {}", e),
        }
        return;
    }

    let positions = snapshot
        .points
        .iter()
        .map(|p| format!("({:.5}, {:.5})", p.lat, p.lng))
        .collect::<Vec<_>>()
        .join(" ");
    log::info!(
        "[{:>5.1}%] {:?} tick {}/{} drones: {}",
        snapshot.progress,
        snapshot.status,
        snapshot.elapsed_ticks,
        snapshot.duration_ticks.unwrap_or(0),
        positions
    );
}
