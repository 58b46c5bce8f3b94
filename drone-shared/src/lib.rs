use drone_core::{LatLng, RunStatus, Stepper};
use serde::{Deserialize, Deserializer, Serialize};

/// A drone or target position as handed to the map widget
///
/// A NaN coordinate is written as `null` and read back as NaN.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    #[serde(deserialize_with = "null_as_nan")]
    pub lat: f64,
    #[serde(deserialize_with = "null_as_nan")]
    pub lng: f64,
}

fn null_as_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for Position {
    fn from(p: LatLng) -> Self {
        Self::new(p.lat, p.lng)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Running,
    Paused,
    Finished,
    Cancelled,
}

impl From<RunStatus> for Status {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Idle => Status::Idle,
            RunStatus::Running => Status::Running,
            RunStatus::Paused => Status::Paused,
            RunStatus::Finished => Status::Finished,
            RunStatus::Cancelled => Status::Cancelled,
        }
    }
}

/// Everything a front end needs to draw one frame: markers, target and the
/// progress bar value.
///
/// NaN coordinates serialize as `null`, which map widgets treat as a missing
/// marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub points: Vec<Position>,
    pub target: Option<Position>,
    pub elapsed_ticks: u32,
    pub duration_ticks: Option<u32>,
    pub progress: f64,
    pub status: Status,
}

impl From<&Stepper> for Snapshot {
    fn from(stepper: &Stepper) -> Self {
        Self {
            points: stepper.points().iter().copied().map(Position::from).collect(),
            target: stepper.target().map(Position::from),
            elapsed_ticks: stepper.elapsed_ticks(),
            duration_ticks: stepper.duration_ticks(),
            progress: stepper.progress(),
            status: stepper.status().into(),
        }
    }
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Front-end settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulatorSettings {
    /// Wall-clock length of one tick.
    pub tick_interval_ms: u64,
    /// Drones present before the first run.
    pub initial_drones: usize,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            initial_drones: 1,
        }
    }
}

impl SimulatorSettings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
