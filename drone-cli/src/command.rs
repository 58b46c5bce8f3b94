use std::str::FromStr;

use anyhow::{bail, Context, Result};
use drone_core::input::{parse_coordinate, parse_duration};
use drone_core::{LatLng, RunConfig, Target};

/// One line typed on stdin
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start { target: Target, config: RunConfig },
    Pause,
    Resume,
    Cancel,
    AddDrone,
    RemoveDrone,
    Status,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            bail!("empty command");
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "start" => {
                let usage = "usage: start <lat> <lng> <ticks>";
                let lat = parts.next().context(usage)?;
                let lng = parts.next().context(usage)?;
                let ticks = parts.next().context(usage)?;
                Command::Start {
                    target: LatLng::new(parse_coordinate(lat), parse_coordinate(lng)),
                    config: parse_duration(ticks)?,
                }
            }
            "pause" => Command::Pause,
            "resume" => Command::Resume,
            "cancel" | "stop" => Command::Cancel,
            "add" => Command::AddDrone,
            "remove" => Command::RemoveDrone,
            "status" => Command::Status,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command {other:?}"),
        };
        Ok(command)
    }
}
