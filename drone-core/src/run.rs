use crate::error::{Result, StepperError};
use crate::geo::Point;

/// Length of one run, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    duration_ticks: u32,
}

impl RunConfig {
    pub fn new(duration_ticks: u32) -> Result<Self> {
        if duration_ticks == 0 {
            return Err(StepperError::ZeroDuration);
        }
        Ok(Self { duration_ticks })
    }

    pub fn duration_ticks(&self) -> u32 {
        self.duration_ticks
    }
}

/// Lifecycle of the stepper's current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    /// No run started yet.
    #[default]
    Idle,
    Running,
    Paused,
    Finished,
    Cancelled,
}

impl RunStatus {
    pub fn is_running(self) -> bool {
        self == RunStatus::Running
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Paused => "paused",
            RunStatus::Finished => "finished",
            RunStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable per-run state.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub elapsed_ticks: u32,
    pub points: Vec<Point>,
}

/// What one accepted tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub elapsed_ticks: u32,
    pub duration_ticks: u32,
    pub progress: f64,
    /// The recurring tick should stop.
    pub finished: bool,
}

/// Percentage of the run completed, 100 exactly at the last tick.
pub fn progress(elapsed_ticks: u32, duration_ticks: u32) -> f64 {
    if duration_ticks == 0 {
        return 0.0;
    }
    if elapsed_ticks >= duration_ticks {
        return 100.0;
    }
    f64::from(elapsed_ticks) / f64::from(duration_ticks) * 100.0
}
