use thiserror::Error;

/// Failures raised at the integration boundary.
///
/// None of these are retried by the environment; they surface to the caller
/// of `step` unchanged.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("time span runs backwards: start {start}, end {end}")]
    ReversedTimeSpan { start: f64, end: f64 },
    #[error("time span bounds must be finite: start {start}, end {end}")]
    NonFiniteTimeSpan { start: f64, end: f64 },
    #[error("step size underflow at t = {time}")]
    StepSizeUnderflow { time: f64 },
    #[error("exceeded {max_steps} steps before reaching t = {end} (stopped at t = {time})")]
    MaxStepsExceeded { max_steps: usize, time: f64, end: f64 },
    #[error("solution became non-finite at t = {time}")]
    NonFinite { time: f64 },
    #[error("invalid integrator configuration: {0}")]
    InvalidConfig(String),
    #[error("system dynamics failed: {0}")]
    Dynamics(#[source] Box<dyn std::error::Error + Send + Sync>),
}
