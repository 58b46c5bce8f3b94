use thiserror::Error;

/// Errors raised by the stepper and the form-input helpers.
///
/// Bad coordinates are not an error: they flow through as NaN.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StepperError {
    #[error("duration must be at least one tick")]
    ZeroDuration,

    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),

    #[error("no run has been started, nothing to resume")]
    NothingToResume,

    #[error("no drone at index {0}")]
    NoSuchPoint(usize),
}

pub type Result<T> = core::result::Result<T, StepperError>;
