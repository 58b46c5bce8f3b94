use crate::error::{Result, StepperError};
use crate::geo::{LatLng, Point, Target};
use crate::run::{progress, RunConfig, RunState, RunStatus, TickReport};

/// Moves a set of drones toward a target, one tick at a time.
///
/// The stepper holds no timer. Whoever owns it (a browser interval, a tokio
/// interval, a test) calls [`Stepper::tick`] once per period and stops
/// calling when a tick reports `finished`.
#[derive(Debug, Clone)]
pub struct Stepper {
    state: RunState,
    target: Option<Target>,
    config: Option<RunConfig>,
    status: RunStatus,
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new()
    }
}

impl Stepper {
    /// A stepper with a single drone at home.
    pub fn new() -> Self {
        Self::with_drones(1)
    }

    pub fn with_drones(count: usize) -> Self {
        Self::with_points(vec![LatLng::home(); count])
    }

    pub fn with_points(points: Vec<Point>) -> Self {
        Self {
            state: RunState {
                elapsed_ticks: 0,
                points,
            },
            target: None,
            config: None,
            status: RunStatus::Idle,
        }
    }

    /// Begins a run of `duration_ticks` steps toward `target`.
    ///
    /// Drones keep their current positions; only the tick counter resets.
    pub fn start(&mut self, target: Target, duration_ticks: u32) -> Result<()> {
        let config = RunConfig::new(duration_ticks)?;
        self.start_with(target, config);
        Ok(())
    }

    pub fn start_with(&mut self, target: Target, config: RunConfig) {
        if self.status.is_running() {
            log::debug!("restarting an active run");
        }
        self.target = Some(target);
        self.config = Some(config);
        self.state.elapsed_ticks = 0;
        self.status = RunStatus::Running;
        log::info!(
            "run started: {} drone(s) toward ({}, {}) over {} tick(s)",
            self.state.points.len(),
            target.lat,
            target.lng,
            config.duration_ticks()
        );
    }

    /// Advances every drone one step.
    ///
    /// Each coordinate moves `1 / duration` of its remaining gap; the divisor
    /// is the full duration on every tick, so drones end the run short of the
    /// target. Returns `None` and leaves everything untouched unless a run is
    /// active.
    pub fn tick(&mut self) -> Option<TickReport> {
        if !self.status.is_running() {
            return None;
        }
        let (target, config) = (self.target?, self.config?);
        let duration = config.duration_ticks();
        let divisor = f64::from(duration);

        for point in self.state.points.iter_mut() {
            point.step_toward(target, divisor);
        }

        self.state.elapsed_ticks += 1;
        let finished = self.state.elapsed_ticks >= duration;
        if finished {
            self.status = RunStatus::Finished;
            log::info!("run finished after {} tick(s)", self.state.elapsed_ticks);
        } else {
            log::debug!("tick {}/{}", self.state.elapsed_ticks, duration);
        }

        Some(TickReport {
            elapsed_ticks: self.state.elapsed_ticks,
            duration_ticks: duration,
            progress: progress(self.state.elapsed_ticks, duration),
            finished,
        })
    }

    /// Stops ticking, keeping positions and the tick counter.
    ///
    /// Returns whether a run was actually active.
    pub fn pause(&mut self) -> bool {
        if !self.status.is_running() {
            return false;
        }
        self.status = RunStatus::Paused;
        log::info!("run paused at tick {}", self.state.elapsed_ticks);
        true
    }

    /// Starts the last run again with the same target and duration.
    ///
    /// This restarts the tick counter at zero rather than continuing from
    /// where the run was paused.
    pub fn resume(&mut self) -> Result<()> {
        match (self.target, self.config) {
            (Some(target), Some(config)) => {
                self.start_with(target, config);
                Ok(())
            }
            _ => Err(StepperError::NothingToResume),
        }
    }

    /// Ends the current run. Later ticks are ignored.
    pub fn cancel(&mut self) {
        if matches!(self.status, RunStatus::Running | RunStatus::Paused) {
            log::info!("run cancelled at tick {}", self.state.elapsed_ticks);
            self.status = RunStatus::Cancelled;
        }
    }

    /// Adds a drone at home and returns the new drone count.
    pub fn add_point(&mut self) -> usize {
        self.add_point_at(LatLng::home())
    }

    pub fn add_point_at(&mut self, point: Point) -> usize {
        self.state.points.push(point);
        self.state.points.len()
    }

    pub fn remove_point(&mut self, index: usize) -> Result<Point> {
        if index >= self.state.points.len() {
            return Err(StepperError::NoSuchPoint(index));
        }
        Ok(self.state.points.remove(index))
    }

    pub fn remove_last(&mut self) -> Option<Point> {
        self.state.points.pop()
    }

    pub fn points(&self) -> &[Point] {
        &self.state.points
    }

    pub fn len(&self) -> usize {
        self.state.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.points.is_empty()
    }

    pub fn elapsed_ticks(&self) -> u32 {
        self.state.elapsed_ticks
    }

    pub fn duration_ticks(&self) -> Option<u32> {
        self.config.map(|c| c.duration_ticks())
    }

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_simulating(&self) -> bool {
        self.status.is_running()
    }

    pub fn progress(&self) -> f64 {
        self.duration_ticks()
            .map_or(0.0, |duration| progress(self.state.elapsed_ticks, duration))
    }
}
