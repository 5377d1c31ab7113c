//! # Physical Parameters
//!
//! Each episode runs with its own physical constants. A
//! [`ParametersGeneratorConfig`] states which constants are fixed and which
//! are drawn from a distribution; a [`ParameterSampler`] turns it into a
//! name → value map once per episode, and the domain converts that map into
//! its typed parameter record.

use std::collections::BTreeMap;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::record::integral_field;
use crate::{Domain, GymError, SamplingConfig, SamplingRegistry, SamplingStrategy};

/// Produces the physical parameters of the next episode.
pub trait PhysicalParametersGenerator<D: Domain> {
    /// # Errors
    ///
    /// Returns an error when sampling fails or the sampled values do not
    /// form valid parameters.
    fn generate(&self, rng: &mut dyn RngCore) -> Result<D::PhysicalParameters, GymError>;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParametersGeneratorConfig {
    #[serde(default)]
    pub fixed_values: BTreeMap<String, f64>,
    #[serde(default)]
    pub sampled_values: BTreeMap<String, SamplingConfig>,
}

impl ParametersGeneratorConfig {
    /// # Errors
    ///
    /// Returns [`GymError::OverlappingKeys`] when a parameter is both fixed
    /// and sampled.
    pub fn new(
        fixed_values: BTreeMap<String, f64>,
        sampled_values: BTreeMap<String, SamplingConfig>,
    ) -> Result<Self, GymError> {
        let config = Self {
            fixed_values,
            sampled_values,
        };
        config.validate()?;
        Ok(config)
    }

    /// Only fixed values; nothing is sampled.
    #[must_use]
    pub fn fixed(fixed_values: BTreeMap<String, f64>) -> Self {
        Self {
            fixed_values,
            sampled_values: BTreeMap::new(),
        }
    }

    /// # Errors
    ///
    /// See [`ParametersGeneratorConfig::new`].
    pub fn validate(&self) -> Result<(), GymError> {
        let overlapping: Vec<String> = self
            .sampled_values
            .keys()
            .filter(|key| self.fixed_values.contains_key(*key))
            .cloned()
            .collect();
        if overlapping.is_empty() {
            Ok(())
        } else {
            Err(GymError::OverlappingKeys(overlapping))
        }
    }
}

/// One episode's worth of parameter values, keyed by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterValues(BTreeMap<String, Vec<f64>>);

impl ParameterValues {
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.0.insert(name.into(), values);
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The single value of a scalar parameter.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::MissingParameter`] when `name` is absent, or
    /// [`GymError::InvalidField`] when it holds more than one value.
    #[allow(clippy::cast_precision_loss)]
    pub fn scalar(&self, name: &str) -> Result<f64, GymError> {
        match self.0.get(name).map(Vec::as_slice) {
            None => Err(GymError::MissingParameter(name.to_owned())),
            Some(&[value]) => Ok(value),
            Some(values) => Err(GymError::InvalidField {
                field: name.to_owned(),
                value: values.len() as f64,
                reason: "a scalar parameter needs exactly one sampled value",
            }),
        }
    }

    /// A scalar parameter that counts something.
    ///
    /// # Errors
    ///
    /// As [`ParameterValues::scalar`], plus [`GymError::InvalidField`] when
    /// the value is not a non-negative integer.
    pub fn counter(&self, name: &str) -> Result<u32, GymError> {
        integral_field(name, self.scalar(name)?)
    }
}

/// Draws [`ParameterValues`] according to a [`ParametersGeneratorConfig`].
#[derive(Clone, Debug)]
pub struct ParameterSampler {
    fixed_values: BTreeMap<String, f64>,
    strategies: BTreeMap<String, SamplingStrategy>,
}

impl ParameterSampler {
    /// Resolves every sampled entry up front, so a bad distribution name or
    /// missing key is reported here rather than at the first reset.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::OverlappingKeys`] or any error of
    /// [`SamplingRegistry::strategy`].
    pub fn new(
        config: &ParametersGeneratorConfig,
        registry: &SamplingRegistry,
    ) -> Result<Self, GymError> {
        config.validate()?;
        let strategies: BTreeMap<String, SamplingStrategy> = config
            .sampled_values
            .iter()
            .map(|(name, sampling)| Ok((name.clone(), registry.strategy(sampling)?)))
            .collect::<Result<_, GymError>>()?;
        Ok(Self {
            fixed_values: config.fixed_values.clone(),
            strategies,
        })
    }

    /// Fixed values plus one draw per sampled parameter, in name order.
    ///
    /// # Errors
    ///
    /// Forwards sampler failures.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Result<ParameterValues, GymError> {
        let mut values = ParameterValues::default();
        for (name, value) in &self.fixed_values {
            values.insert(name.clone(), vec![*value]);
        }
        for (name, strategy) in &self.strategies {
            let sampled = strategy.sample(rng)?;
            trace!(parameter = %name, values = ?sampled, "sampled parameter");
            values.insert(name.clone(), sampled);
        }
        Ok(values)
    }
}
