//! # Classical Runge–Kutta
//!
//! Fixed-step fourth-order integration. A span is split into the smallest
//! number of equal steps no longer than `step_size`, so the final value is
//! always reported exactly at `end_time`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{check_action_duration, check_inputs, evaluate, Integrator};
use crate::{SolverError, SystemDynamics, TimeSpan};

fn default_step_size() -> f64 {
    1e-3
}

/// Tuning for [`RungeKutta4`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RungeKutta4Config {
    /// Simulated time covered by one environment action.
    pub action_duration: f64,
    /// Largest allowed internal step.
    #[serde(default = "default_step_size")]
    pub step_size: f64,
}

impl RungeKutta4Config {
    #[must_use]
    pub fn new(action_duration: f64) -> Self {
        Self { action_duration, step_size: default_step_size() }
    }

    #[must_use]
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }
}

pub struct RungeKutta4 {
    dynamics: Arc<dyn SystemDynamics>,
    config: RungeKutta4Config,
}

impl RungeKutta4 {
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidConfig`] for a non-positive duration or
    /// step size.
    pub fn new(
        dynamics: Arc<dyn SystemDynamics>,
        config: RungeKutta4Config,
    ) -> Result<Self, SolverError> {
        check_action_duration(config.action_duration)?;
        if !(config.step_size.is_finite() && config.step_size > 0.0) {
            return Err(SolverError::InvalidConfig(format!(
                "step_size must be positive, got {}",
                config.step_size
            )));
        }
        Ok(Self { dynamics, config })
    }

    #[must_use]
    pub fn config(&self) -> &RungeKutta4Config {
        &self.config
    }
}

impl Integrator for RungeKutta4 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn integrate(
        &self,
        input_values: &[f64],
        parameters: &[f64],
        action: &[f64],
        time_span: TimeSpan,
    ) -> Result<Vec<f64>, SolverError> {
        check_inputs(input_values, time_span)?;
        let duration = time_span.duration();
        let n = input_values.len();
        let mut y = input_values.to_vec();
        if duration == 0.0 || n == 0 {
            return Ok(y);
        }

        let steps = (duration / self.config.step_size).ceil().max(1.0) as usize;
        let h = duration / steps as f64;
        let dynamics = self.dynamics.as_ref();
        let (mut k1, mut k2, mut k3, mut k4) =
            (vec![0.0; n], vec![0.0; n], vec![0.0; n], vec![0.0; n]);
        let mut stage = vec![0.0; n];

        for step in 0..steps {
            let t = time_span.start_time + step as f64 * h;

            evaluate(dynamics, t, &y, parameters, action, &mut k1)?;
            for i in 0..n {
                stage[i] = y[i] + 0.5 * h * k1[i];
            }
            evaluate(dynamics, t + 0.5 * h, &stage, parameters, action, &mut k2)?;
            for i in 0..n {
                stage[i] = y[i] + 0.5 * h * k2[i];
            }
            evaluate(dynamics, t + 0.5 * h, &stage, parameters, action, &mut k3)?;
            for i in 0..n {
                stage[i] = y[i] + h * k3[i];
            }
            evaluate(dynamics, t + h, &stage, parameters, action, &mut k4)?;

            for i in 0..n {
                y[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
            }
            if y.iter().any(|v| !v.is_finite()) {
                return Err(SolverError::NonFinite { time: t + h });
            }
        }

        tracing::trace!(method = self.method(), steps, "integrated span");
        Ok(y)
    }

    fn action_duration(&self) -> f64 {
        self.config.action_duration
    }

    fn method(&self) -> &'static str {
        "rk4"
    }
}
