//! Drone movement model: a set of points stepped toward a target once per
//! tick, with progress reporting. Timers live in the front ends.

pub mod error;
pub mod geo;
pub mod input;
pub mod run;
pub mod stepper;

pub use error::{Result, StepperError};
pub use geo::{LatLng, Point, Target};
pub use run::{RunConfig, RunState, RunStatus, TickReport};
pub use stepper::Stepper;
