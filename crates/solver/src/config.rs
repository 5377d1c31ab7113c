use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    DormandPrince, DormandPrinceConfig, Integrator, RungeKutta4, RungeKutta4Config, SolverError,
    SystemDynamics,
};

/// Serializable choice of integration backend and its tuning.
///
/// ```json
/// { "method": "rk45", "action_duration": 1.0, "rtol": 1e-6, "atol": 1e-8 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum IntegratorConfig {
    Rk45(DormandPrinceConfig),
    Rk4(RungeKutta4Config),
}

impl IntegratorConfig {
    #[must_use]
    pub fn action_duration(&self) -> f64 {
        match self {
            Self::Rk45(config) => config.action_duration,
            Self::Rk4(config) => config.action_duration,
        }
    }

    /// Builds the configured backend around `dynamics`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidConfig`] when the tuning is invalid.
    pub fn build(
        &self,
        dynamics: Arc<dyn SystemDynamics>,
    ) -> Result<Box<dyn Integrator>, SolverError> {
        let integrator: Box<dyn Integrator> = match self {
            Self::Rk45(config) => Box::new(DormandPrince::new(dynamics, config.clone())?),
            Self::Rk4(config) => Box::new(RungeKutta4::new(dynamics, config.clone())?),
        };
        tracing::debug!(method = integrator.method(), "built integrator");
        Ok(integrator)
    }
}
