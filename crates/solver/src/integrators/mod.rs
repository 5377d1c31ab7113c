//! # Integrators
//!
//! Backends implementing the [`Integrator`] contract. Each one owns its
//! [`SystemDynamics`] and its tuning; callers only ever pass flat arrays and
//! a [`TimeSpan`].

mod dormand_prince;
mod runge_kutta;

pub use dormand_prince::{DormandPrince, DormandPrinceConfig};
pub use runge_kutta::{RungeKutta4, RungeKutta4Config};

use crate::{SolverError, SystemDynamics, TimeSpan};

/// Advances DAE state values over one [`TimeSpan`].
pub trait Integrator {
    /// Integrates `input_values` from `time_span.start_time` to
    /// `time_span.end_time` and returns the values at the end of the span.
    ///
    /// `parameters` and `action` are held constant over the span.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] when the inputs are malformed, the solver
    /// cannot reach the end of the span, or the dynamics fail.
    fn integrate(
        &self,
        input_values: &[f64],
        parameters: &[f64],
        action: &[f64],
        time_span: TimeSpan,
    ) -> Result<Vec<f64>, SolverError>;

    /// Simulated duration of one environment action.
    fn action_duration(&self) -> f64;

    /// Short name of the method, used in logs.
    fn method(&self) -> &'static str;
}

/// Shared input validation for every backend.
fn check_inputs(input_values: &[f64], time_span: TimeSpan) -> Result<(), SolverError> {
    let TimeSpan { start_time, end_time } = time_span;
    if !start_time.is_finite() || !end_time.is_finite() {
        return Err(SolverError::NonFiniteTimeSpan { start: start_time, end: end_time });
    }
    if end_time < start_time {
        return Err(SolverError::ReversedTimeSpan { start: start_time, end: end_time });
    }
    if input_values.iter().any(|v| !v.is_finite()) {
        return Err(SolverError::NonFinite { time: start_time });
    }
    Ok(())
}

fn check_action_duration(action_duration: f64) -> Result<(), SolverError> {
    if action_duration.is_finite() && action_duration > 0.0 {
        Ok(())
    } else {
        Err(SolverError::InvalidConfig(format!(
            "action_duration must be positive and finite, got {action_duration}"
        )))
    }
}

/// Evaluates the dynamics into `out`, checking that the model kept the
/// derivative finite.
fn evaluate(
    dynamics: &dyn SystemDynamics,
    time: f64,
    state: &[f64],
    parameters: &[f64],
    action: &[f64],
    out: &mut [f64],
) -> Result<(), SolverError> {
    dynamics.derivative(time, state, parameters, action, out)?;
    if out.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(SolverError::NonFinite { time })
    }
}
