//! # Dormand–Prince RK4(5)
//!
//! Adaptive explicit Runge–Kutta integration with an embedded fourth-order
//! error estimate, the same scheme as the common `RK45` solvers. Local error
//! is controlled per component against `atol + rtol * |y|` in the RMS norm,
//! and the last step is trimmed so the solution lands on `end_time` exactly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{check_action_duration, check_inputs, evaluate, Integrator};
use crate::{SolverError, SystemDynamics, TimeSpan};

const C: [f64; 6] = [1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

const A: [[f64; 6]; 6] = [
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [19372.0 / 6561.0, -25360.0 / 2187.0, 64448.0 / 6561.0, -212.0 / 729.0, 0.0, 0.0],
    [9017.0 / 3168.0, -355.0 / 33.0, 46732.0 / 5247.0, 49.0 / 176.0, -5103.0 / 18656.0, 0.0],
    [35.0 / 384.0, 0.0, 500.0 / 1113.0, 125.0 / 192.0, -2187.0 / 6784.0, 11.0 / 84.0],
];

/// Difference between the fifth- and fourth-order weights.
const E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339_200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
const ERROR_EXPONENT: f64 = -1.0 / 5.0;

fn default_rtol() -> f64 {
    1e-6
}

fn default_atol() -> f64 {
    1e-8
}

fn default_max_steps() -> usize {
    100_000
}

/// Tuning for [`DormandPrince`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DormandPrinceConfig {
    /// Simulated time covered by one environment action.
    pub action_duration: f64,
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    #[serde(default = "default_atol")]
    pub atol: f64,
    /// Upper bound on attempted steps for a single span.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Initial step; chosen automatically when absent.
    #[serde(default)]
    pub first_step: Option<f64>,
}

impl DormandPrinceConfig {
    #[must_use]
    pub fn new(action_duration: f64) -> Self {
        Self {
            action_duration,
            rtol: default_rtol(),
            atol: default_atol(),
            max_steps: default_max_steps(),
            first_step: None,
        }
    }

    #[must_use]
    pub fn with_tolerances(mut self, rtol: f64, atol: f64) -> Self {
        self.rtol = rtol;
        self.atol = atol;
        self
    }

    fn validate(&self) -> Result<(), SolverError> {
        check_action_duration(self.action_duration)?;
        if !(self.rtol > 0.0 && self.atol >= 0.0) {
            return Err(SolverError::InvalidConfig(format!(
                "tolerances must satisfy rtol > 0 and atol >= 0, got rtol = {}, atol = {}",
                self.rtol, self.atol
            )));
        }
        if self.max_steps == 0 {
            return Err(SolverError::InvalidConfig("max_steps must be at least 1".into()));
        }
        if let Some(h) = self.first_step {
            if !(h.is_finite() && h > 0.0) {
                return Err(SolverError::InvalidConfig(format!(
                    "first_step must be positive, got {h}"
                )));
            }
        }
        Ok(())
    }
}

/// Adaptive RK4(5) integrator.
pub struct DormandPrince {
    dynamics: Arc<dyn SystemDynamics>,
    config: DormandPrinceConfig,
}

impl DormandPrince {
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidConfig`] for non-positive durations or
    /// tolerances.
    pub fn new(
        dynamics: Arc<dyn SystemDynamics>,
        config: DormandPrinceConfig,
    ) -> Result<Self, SolverError> {
        config.validate()?;
        Ok(Self { dynamics, config })
    }

    #[must_use]
    pub fn config(&self) -> &DormandPrinceConfig {
        &self.config
    }

    fn rms_norm(&self, values: &[f64], y: &[f64], y_other: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let sum: f64 = values
            .iter()
            .zip(y.iter().zip(y_other))
            .map(|(v, (a, b))| {
                let scale = self.config.atol + self.config.rtol * a.abs().max(b.abs());
                (v / scale).powi(2)
            })
            .sum();
        #[allow(clippy::cast_precision_loss)]
        let n = values.len() as f64;
        (sum / n).sqrt()
    }

    /// Hairer–Wanner starting step heuristic.
    fn initial_step(
        &self,
        t0: f64,
        y0: &[f64],
        f0: &[f64],
        parameters: &[f64],
        action: &[f64],
    ) -> Result<f64, SolverError> {
        let d0 = self.rms_norm(y0, y0, y0);
        let d1 = self.rms_norm(f0, y0, y0);
        let h0 = if d0 < 1e-5 || d1 < 1e-5 { 1e-6 } else { 0.01 * d0 / d1 };

        let y1: Vec<f64> = y0.iter().zip(f0).map(|(y, f)| y + h0 * f).collect();
        let mut f1 = vec![0.0; y0.len()];
        evaluate(self.dynamics.as_ref(), t0 + h0, &y1, parameters, action, &mut f1)?;
        let diff: Vec<f64> = f1.iter().zip(f0).map(|(a, b)| a - b).collect();
        let d2 = self.rms_norm(&diff, y0, y0) / h0;

        let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d1.max(d2)).powf(1.0 / 5.0)
        };
        Ok((100.0 * h0).min(h1))
    }
}

impl Integrator for DormandPrince {
    fn integrate(
        &self,
        input_values: &[f64],
        parameters: &[f64],
        action: &[f64],
        time_span: TimeSpan,
    ) -> Result<Vec<f64>, SolverError> {
        check_inputs(input_values, time_span)?;
        let TimeSpan { start_time, end_time } = time_span;
        let n = input_values.len();
        let mut y = input_values.to_vec();
        if end_time == start_time || n == 0 {
            return Ok(y);
        }

        let dynamics = self.dynamics.as_ref();
        let mut k = vec![vec![0.0; n]; 7];
        let mut stage = vec![0.0; n];
        let mut y_new = vec![0.0; n];
        let mut error = vec![0.0; n];

        evaluate(dynamics, start_time, &y, parameters, action, &mut k[0])?;
        let mut h = match self.config.first_step {
            Some(h) => h,
            None => self.initial_step(start_time, &y, &k[0], parameters, action)?,
        };

        let mut t = start_time;
        let mut steps = 0usize;
        let mut rejected = false;
        while t < end_time {
            if steps >= self.config.max_steps {
                return Err(SolverError::MaxStepsExceeded {
                    max_steps: self.config.max_steps,
                    time: t,
                    end: end_time,
                });
            }
            steps += 1;

            let min_step = 10.0 * f64::EPSILON * t.abs().max(1.0);
            if h < min_step {
                return Err(SolverError::StepSizeUnderflow { time: t });
            }
            let last = t + h >= end_time;
            if last {
                h = end_time - t;
            }

            for s in 1..7 {
                let row = &A[s - 1];
                for i in 0..n {
                    let increment: f64 = row.iter().zip(&k[..s]).map(|(a, kj)| a * kj[i]).sum();
                    stage[i] = y[i] + h * increment;
                }
                evaluate(dynamics, t + C[s - 1] * h, &stage, parameters, action, &mut k[s])?;
            }
            // The last stage is the fifth-order solution and k[6] its derivative.
            y_new.copy_from_slice(&stage);
            for i in 0..n {
                let e: f64 = k.iter().zip(E).map(|(kj, ej)| ej * kj[i]).sum();
                error[i] = h * e;
            }

            let error_norm = self.rms_norm(&error, &y, &y_new);
            if error_norm.is_finite() && error_norm <= 1.0 {
                let factor = if error_norm == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * error_norm.powf(ERROR_EXPONENT)).min(MAX_FACTOR)
                };
                let factor = if rejected { factor.min(1.0) } else { factor };
                t = if last { end_time } else { t + h };
                std::mem::swap(&mut y, &mut y_new);
                k.swap(0, 6);
                h *= factor;
                rejected = false;
            } else {
                let factor = if error_norm.is_finite() {
                    (SAFETY * error_norm.powf(ERROR_EXPONENT)).max(MIN_FACTOR)
                } else {
                    MIN_FACTOR
                };
                h *= factor;
                rejected = true;
            }
        }

        tracing::trace!(method = self.method(), steps, "integrated span");
        if y.iter().all(|v| v.is_finite()) {
            Ok(y)
        } else {
            Err(SolverError::NonFinite { time: end_time })
        }
    }

    fn action_duration(&self) -> f64 {
        self.config.action_duration
    }

    fn method(&self) -> &'static str {
        "rk45"
    }
}
