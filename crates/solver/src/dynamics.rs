use crate::SolverError;

/// Right-hand side of an explicit ODE system `dy/dt = f(t, y, p, u)`.
///
/// `state`, `parameters` and `action` are the flat arrays produced by the
/// environment's records. Implementations write the derivative of every
/// state component into `dydt`, which always has the same length as
/// `state`.
pub trait SystemDynamics: Send + Sync {
    /// Evaluate the derivative at `time`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Dynamics`] (or any other variant) when the
    /// arrays cannot be interpreted by the model.
    fn derivative(
        &self,
        time: f64,
        state: &[f64],
        parameters: &[f64],
        action: &[f64],
        dydt: &mut [f64],
    ) -> Result<(), SolverError>;
}

impl<F> SystemDynamics for F
where
    F: Fn(f64, &[f64], &[f64], &[f64], &mut [f64]) -> Result<(), SolverError> + Send + Sync,
{
    fn derivative(
        &self,
        time: f64,
        state: &[f64],
        parameters: &[f64],
        action: &[f64],
        dydt: &mut [f64],
    ) -> Result<(), SolverError> {
        self(time, state, parameters, action, dydt)
    }
}
