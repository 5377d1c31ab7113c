use gym::{GymError, ParametersGeneratorConfig};
use serde::{Deserialize, Serialize};
use solver::IntegratorConfig;

use crate::CstrPhysicalParameters;

/// Everything needed to build a CSTR environment.
///
/// ```json
/// {
///   "integrator": { "method": "rk45", "action_duration": 1.0, "rtol": 1e-6, "atol": 1e-8 },
///   "random_seed": 0,
///   "physical_parameters": {
///     "fixed_values": { "c_a_0": 0.3, "...": 0.0 },
///     "sampled_values": { "p": { "distribution": "choice", "choices": [780, 790], "size": 1 } }
///   }
/// }
/// ```
///
/// Without `physical_parameters` every constant takes its default value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CstrEnvConfig {
    pub integrator: IntegratorConfig,
    #[serde(default)]
    pub random_seed: u64,
    #[serde(default = "default_physical_parameters")]
    pub physical_parameters: ParametersGeneratorConfig,
}

fn default_physical_parameters() -> ParametersGeneratorConfig {
    ParametersGeneratorConfig::fixed(CstrPhysicalParameters::default().fixed_values())
}

impl CstrEnvConfig {
    #[must_use]
    pub fn new(integrator: IntegratorConfig, random_seed: u64) -> Self {
        Self {
            integrator,
            random_seed,
            physical_parameters: default_physical_parameters(),
        }
    }

    #[must_use]
    pub fn with_physical_parameters(
        mut self,
        physical_parameters: ParametersGeneratorConfig,
    ) -> Self {
        self.physical_parameters = physical_parameters;
        self
    }

    /// # Errors
    ///
    /// Returns [`GymError::Json`] when `json` does not describe a config, or
    /// [`GymError::OverlappingKeys`] when a parameter is both fixed and
    /// sampled.
    pub fn from_json(json: &str) -> Result<Self, GymError> {
        let config: Self = serde_json::from_str(json)?;
        config.physical_parameters.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = CstrEnvConfig::from_json(
            r#"{"integrator": {"method": "rk4", "action_duration": 1.0}}"#,
        )
        .unwrap();
        assert_eq!(config.random_seed, 0);
        assert!(config.physical_parameters.sampled_values.is_empty());
        assert_eq!(config.physical_parameters.fixed_values["q_max"], 5000.0);
        assert_eq!(config.physical_parameters.fixed_values.len(), 14);
    }

    #[test]
    fn overlapping_parameters_are_rejected() {
        let err = CstrEnvConfig::from_json(
            r#"{
                "integrator": {"method": "rk45", "action_duration": 1.0},
                "physical_parameters": {
                    "fixed_values": {"p": 780},
                    "sampled_values": {"p": {"distribution": "choice", "choices": [790], "size": 1}}
                }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, GymError::OverlappingKeys(_)));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            CstrEnvConfig::from_json(r#"{"integrator": {"method": "euler"}}"#),
            Err(GymError::Json(_))
        ));
    }
}
