//! # Sampling Strategies
//!
//! A sampled parameter is described by a small JSON object naming a
//! distribution, its arguments, and a sample `size`:
//!
//! ```json
//! { "distribution": "uniform", "low": 770.0, "high": 790.0, "size": 1 }
//! ```
//!
//! Three distributions are built in (`choice`, `normal`, `uniform`). A
//! [`SamplingRegistry`] can add more, or replace a built-in, under any name.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rand::{Rng, RngCore};
use rand_distr::{Distribution as _, Normal};
use serde_json::Value;

use crate::record::integral_field;
use crate::GymError;

/// The JSON object describing one sampled parameter.
pub type SamplingConfig = serde_json::Map<String, Value>;

/// A user-supplied sampler. It receives the full sampling config and must
/// return exactly `size` values.
pub type SamplerFn =
    dyn Fn(&mut dyn RngCore, &SamplingConfig) -> Result<Vec<f64>, GymError> + Send + Sync;

const DISTRIBUTION_KEY: &str = "distribution";
const SIZE_KEY: &str = "size";

#[derive(Clone)]
pub enum Distribution {
    Choice { choices: Vec<f64> },
    Normal { loc: f64, scale: f64 },
    Uniform { low: f64, high: f64 },
    Custom {
        name: String,
        sampler: Arc<SamplerFn>,
        config: SamplingConfig,
    },
}

impl Distribution {
    pub const BUILTIN: [&'static str; 3] = ["choice", "normal", "uniform"];

    fn builtin_keys(name: &str) -> Option<&'static [&'static str]> {
        let keys: &'static [&'static str] = match name {
            "choice" => &["choices"],
            "normal" => &["loc", "scale"],
            "uniform" => &["low", "high"],
            _ => return None,
        };
        Some(keys)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Choice { .. } => "choice",
            Self::Normal { .. } => "normal",
            Self::Uniform { .. } => "uniform",
            Self::Custom { name, .. } => name,
        }
    }
}

impl fmt::Debug for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Choice { choices } => f.debug_struct("Choice").field("choices", choices).finish(),
            Self::Normal { loc, scale } => f
                .debug_struct("Normal")
                .field("loc", loc)
                .field("scale", scale)
                .finish(),
            Self::Uniform { low, high } => f
                .debug_struct("Uniform")
                .field("low", low)
                .field("high", high)
                .finish(),
            Self::Custom { name, config, .. } => f
                .debug_struct("Custom")
                .field("name", name)
                .field("config", config)
                .finish_non_exhaustive(),
        }
    }
}

/// A distribution together with how many values to draw from it.
#[derive(Clone, Debug)]
pub struct SamplingStrategy {
    distribution: Distribution,
    size: usize,
}

impl SamplingStrategy {
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// # Errors
    ///
    /// Built-in distributions never fail. A custom sampler may fail, and is
    /// rejected with [`GymError::Configuration`] when it returns the wrong
    /// number of values.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Result<Vec<f64>, GymError> {
        let size = self.size;
        match &self.distribution {
            Distribution::Choice { choices } => Ok((0..size)
                .map(|_| choices[rng.gen_range(0..choices.len())])
                .collect()),
            Distribution::Normal { loc, scale } => {
                let normal = Normal::new(*loc, *scale)
                    .map_err(|err| GymError::Configuration(err.to_string()))?;
                Ok((0..size).map(|_| normal.sample(&mut *rng)).collect())
            }
            Distribution::Uniform { low, high } if low < high => {
                Ok((0..size).map(|_| rng.gen_range(*low..*high)).collect())
            }
            Distribution::Uniform { low, .. } => Ok(vec![*low; size]),
            Distribution::Custom {
                name,
                sampler,
                config,
            } => {
                let values = sampler(rng, config)?;
                if values.len() != size {
                    return Err(GymError::Configuration(format!(
                        "sampler '{name}' returned {} values, expected {size}",
                        values.len()
                    )));
                }
                Ok(values)
            }
        }
    }
}

#[derive(Clone)]
struct CustomSampler {
    required_keys: Vec<String>,
    sampler: Arc<SamplerFn>,
}

/// Maps distribution names to samplers.
#[derive(Clone, Default)]
pub struct SamplingRegistry {
    custom: BTreeMap<String, CustomSampler>,
}

impl SamplingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `sampler` under `name`. A later registration under the same
    /// name replaces the earlier one, and a custom sampler shadows a
    /// built-in of the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, required_keys: &[&str], sampler: F)
    where
        F: Fn(&mut dyn RngCore, &SamplingConfig) -> Result<Vec<f64>, GymError>
            + Send
            + Sync
            + 'static,
    {
        self.custom.insert(
            name.into(),
            CustomSampler {
                required_keys: required_keys.iter().map(|&key| key.to_owned()).collect(),
                sampler: Arc::new(sampler),
            },
        );
    }

    /// Built-in and registered names, sorted and without duplicates.
    #[must_use]
    pub fn known_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Distribution::BUILTIN
            .iter()
            .map(|&name| name.to_owned())
            .chain(self.custom.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Looks up `name` and returns the config keys its strategy requires,
    /// `size` included.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::UnknownDistribution`], listing the known names,
    /// when `name` is neither built in nor registered.
    pub fn get(&self, name: &str) -> Result<Vec<String>, GymError> {
        let keys: Vec<String> = if let Some(custom) = self.custom.get(name) {
            custom.required_keys.clone()
        } else if let Some(keys) = Distribution::builtin_keys(name) {
            keys.iter().map(|&key| key.to_owned()).collect()
        } else {
            return Err(GymError::UnknownDistribution {
                name: name.to_owned(),
                known: self.known_names(),
            });
        };
        Ok(keys
            .into_iter()
            .chain(std::iter::once(SIZE_KEY.to_owned()))
            .collect())
    }

    /// Resolves a sampling config into a ready-to-draw strategy.
    ///
    /// # Errors
    ///
    /// -   [`GymError::UnknownDistribution`] when the name is neither built
    ///     in nor registered;
    /// -   [`GymError::MissingSamplingKeys`] when the config lacks a key the
    ///     distribution needs;
    /// -   [`GymError::Configuration`] or [`GymError::InvalidField`] when a
    ///     value has the wrong type or range.
    pub fn strategy(&self, config: &SamplingConfig) -> Result<SamplingStrategy, GymError> {
        let name = config
            .get(DISTRIBUTION_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                GymError::Configuration(format!(
                    "sampling config needs a string '{DISTRIBUTION_KEY}' entry"
                ))
            })?;

        let required = self.get(name)?;
        if !required.iter().all(|key| config.contains_key(key)) {
            return Err(GymError::MissingSamplingKeys {
                distribution: name.to_owned(),
                required,
                provided: config.keys().cloned().collect(),
            });
        }

        let distribution = match self.custom.get(name) {
            Some(custom) => Distribution::Custom {
                name: name.to_owned(),
                sampler: Arc::clone(&custom.sampler),
                config: config.clone(),
            },
            None => builtin(name, config)?,
        };

        let size = integral_field(SIZE_KEY, number(config, SIZE_KEY)?)?;
        if size == 0 {
            return Err(GymError::InvalidField {
                field: SIZE_KEY.to_owned(),
                value: 0.0,
                reason: "at least one value must be drawn",
            });
        }
        Ok(SamplingStrategy {
            distribution,
            size: size as usize,
        })
    }
}

impl fmt::Debug for SamplingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamplingRegistry")
            .field("known", &self.known_names())
            .finish()
    }
}

fn number(config: &SamplingConfig, key: &str) -> Result<f64, GymError> {
    config
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| GymError::Configuration(format!("sampling key '{key}' must be a number")))
}

fn builtin(name: &str, config: &SamplingConfig) -> Result<Distribution, GymError> {
    match name {
        "choice" => {
            let choices = config
                .get("choices")
                .and_then(Value::as_array)
                .and_then(|values| values.iter().map(Value::as_f64).collect::<Option<Vec<_>>>())
                .ok_or_else(|| {
                    GymError::Configuration("'choices' must be an array of numbers".to_owned())
                })?;
            if choices.is_empty() {
                return Err(GymError::Configuration(
                    "'choices' must not be empty".to_owned(),
                ));
            }
            Ok(Distribution::Choice { choices })
        }
        "normal" => {
            let loc = number(config, "loc")?;
            let scale = number(config, "scale")?;
            if !(scale >= 0.0 && scale.is_finite()) {
                return Err(GymError::InvalidField {
                    field: "scale".to_owned(),
                    value: scale,
                    reason: "standard deviation must be finite and non-negative",
                });
            }
            Ok(Distribution::Normal { loc, scale })
        }
        "uniform" => {
            let low = number(config, "low")?;
            let high = number(config, "high")?;
            if !(low.is_finite() && high.is_finite() && low <= high) {
                return Err(GymError::Configuration(format!(
                    "uniform bounds [{low}, {high}) are not a finite interval"
                )));
            }
            Ok(Distribution::Uniform { low, high })
        }
        _ => Err(GymError::Configuration(format!("'{name}' is not built in"))),
    }
}
