use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use drone_core::input::{can_start, parse_coordinate, parse_duration};
use drone_core::{LatLng, RunConfig, Target};
use drone_shared::SimulatorSettings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Drone flight simulator", long_about = None)]
pub struct Args {
    /// Target latitude. Without --lat/--lng/--duration the simulator waits
    /// for a `start <lat> <lng> <ticks>` command on stdin
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<String>,

    /// Target longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<String>,

    /// Run length in ticks
    #[arg(short = 't', long, allow_hyphen_values = true)]
    pub duration: Option<String>,

    /// Number of drones at start (overrides the config file)
    #[arg(short = 'n', long)]
    pub drones: Option<usize>,

    /// Milliseconds per tick (overrides the config file)
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// JSON settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print one JSON snapshot per line instead of log lines
    #[arg(long)]
    pub json: bool,

    /// Keep accepting commands after the run finishes
    #[arg(long)]
    pub stay: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    /// Settings from the config file, if any, with command-line overrides.
    pub fn settings(&self) -> Result<SimulatorSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                SimulatorSettings::from_json(&json)
                    .with_context(|| format!("Invalid settings in {}", path.display()))?
            }
            None => SimulatorSettings::default(),
        };

        if let Some(drones) = self.drones {
            settings.initial_drones = drones;
        }
        if let Some(tick_ms) = self.tick_ms {
            settings.tick_interval_ms = tick_ms;
        }
        if settings.tick_interval_ms == 0 {
            bail!("tick interval must be at least 1 ms");
        }
        Ok(settings)
    }

    /// The run requested on the command line, if one was.
    pub fn initial_run(&self) -> Result<Option<(Target, RunConfig)>> {
        let (lat, lng, time) = match (&self.lat, &self.lng, &self.duration) {
            (None, None, None) => return Ok(None),
            (Some(lat), Some(lng), Some(time)) => (lat, lng, time),
            _ => bail!("--lat, --lng and --duration must be given together"),
        };
        if !can_start(lat, lng, time, false) {
            bail!("--lat, --lng and --duration must not be empty");
        }

        let target = LatLng::new(parse_coordinate(lat), parse_coordinate(lng));
        let config = parse_duration(time).context("Invalid --duration")?;
        Ok(Some((target, config)))
    }
}
