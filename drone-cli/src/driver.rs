use std::time::Duration;

use anyhow::{Context, Result};
use drone_core::input::can_remove;
use drone_core::{RunConfig, RunStatus, Stepper, Target, TickReport};
use drone_shared::Snapshot;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::command::Command;

/// Whether the command loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

enum Event {
    Line(std::io::Result<Option<String>>),
    Tick,
    Closed,
}

/// Drives a [`Stepper`] from a tokio interval and a stream of text commands.
///
/// The driver owns at most one interval. Starting or resuming replaces it,
/// and pausing, cancelling or finishing drops it, so two tick streams can
/// never step the same drones.
pub struct Driver {
    stepper: Stepper,
    period: Duration,
    ticker: Option<Interval>,
    exit_when_finished: bool,
}

impl Driver {
    pub fn new(stepper: Stepper, period: Duration) -> Self {
        Self {
            stepper,
            period,
            ticker: None,
            exit_when_finished: true,
        }
    }

    /// Keep reading commands after a run finishes instead of returning.
    pub fn stay_after_finish(mut self) -> Self {
        self.exit_when_finished = false;
        self
    }

    pub fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn start(&mut self, target: Target, config: RunConfig) {
        self.stepper.start_with(target, config);
        self.arm();
    }

    pub fn apply(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Start { target, config } => self.start(target, config),
            Command::Pause => {
                self.ticker = None;
                if !self.stepper.pause() {
                    log::warn!("nothing to pause");
                }
            }
            Command::Resume => {
                self.stepper.resume()?;
                self.arm();
            }
            Command::Cancel => {
                self.ticker = None;
                self.stepper.cancel();
            }
            Command::AddDrone => {
                let count = self.stepper.add_point();
                log::info!("added drone, {} total", count);
            }
            Command::RemoveDrone => {
                if can_remove(self.stepper.len()) {
                    self.stepper.remove_last();
                    log::info!("removed drone, {} left", self.stepper.len());
                } else {
                    log::warn!("the last drone cannot be removed");
                }
            }
            Command::Status => {}
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Steps the drones once, dropping the interval when the run ends.
    pub fn on_tick(&mut self) -> Option<TickReport> {
        let report = self.stepper.tick();
        if report.map_or(true, |r| r.finished) {
            self.ticker = None;
        }
        report
    }

    /// Runs until `quit`, until a run finishes (unless told to stay), or
    /// until input closes with nothing left to tick. Returns the stepper in
    /// its final state.
    ///
    /// `on_snapshot` sees the state after every tick and every command.
    pub async fn run<R, F>(mut self, input: R, mut on_snapshot: F) -> Result<Stepper>
    where
        R: AsyncBufRead + Unpin,
        F: FnMut(&Snapshot),
    {
        let mut lines = input.lines();
        let mut input_open = true;

        loop {
            if self.exit_when_finished && self.stepper.status() == RunStatus::Finished {
                break;
            }
            if !input_open && self.ticker.is_none() {
                log::debug!("input closed with no active run");
                break;
            }

            let event = tokio::select! {
                line = lines.next_line(), if input_open => Event::Line(line),
                _ = next_tick(&mut self.ticker), if self.ticker.is_some() => Event::Tick,
                else => Event::Closed,
            };

            match event {
                Event::Tick => {
                    if self.on_tick().is_some() {
                        on_snapshot(&Snapshot::from(&self.stepper));
                    }
                }
                Event::Line(line) => {
                    let Some(line) = line.context("failed to read command")? else {
                        input_open = false;
                        continue;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    let flow = line.parse::<Command>().and_then(|c| self.apply(c));
                    match flow {
                        Ok(Flow::Quit) => break,
                        Ok(Flow::Continue) => on_snapshot(&Snapshot::from(&self.stepper)),
                        Err(e) => log::warn!("{:#}", e),
                    }
                }
                Event::Closed => break,
            }
        }

        Ok(self.stepper)
    }

    fn arm(&mut self) {
        self.ticker = None;
        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
