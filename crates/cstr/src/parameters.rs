//! Per-episode reactor constants and the episode's starting state.

use std::collections::BTreeMap;

use gym::{
    GymError, InitialStateGenerator, ParameterSampler, ParameterValues, ParametersGeneratorConfig,
    PhysicalParametersGenerator, SamplingRegistry, State, StateOf,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::{Cstr, CstrDaeParameters, CstrDaeState, CstrNonDaeParameters};

/// Physical constants of one reactor configuration.
///
/// The field names double as the parameter names in a
/// [`ParametersGeneratorConfig`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CstrPhysicalParameters {
    /// Liquid density, kg/m³.
    pub p: f64,
    /// Feed concentration of A, kmol/m³.
    pub c_a_0: f64,
    /// Heat capacity, kJ/(K·kg).
    pub c_p: f64,
    /// Activation energy of A → B, kJ/kmol.
    pub e_a: f64,
    /// Activation energy of B → A, kJ/kmol.
    pub e_b: f64,
    /// Flow rate, m³/min.
    pub f: f64,
    /// Heat of reaction, kJ/kmol.
    pub dh: f64,
    pub k_0_a: f64,
    pub k_0_b: f64,
    /// Gas constant, kJ/(kmol·K).
    pub r: f64,
    /// Feed temperature, K.
    pub t_0: f64,
    /// Tank volume, m³.
    pub v: f64,
    /// Heater limit, kJ/min.
    pub q_max: f64,
    pub max_timestep: u32,
}

impl Default for CstrPhysicalParameters {
    fn default() -> Self {
        Self {
            p: 780.0,
            c_a_0: 0.3,
            c_p: 3.25,
            e_a: 41_570.0,
            e_b: 45_727.0,
            f: 0.0025,
            dh: 4157.0,
            k_0_a: 50_000.0,
            k_0_b: 100_000.0,
            r: 8.314,
            t_0: 300.0,
            v: 0.2,
            q_max: 5000.0,
            max_timestep: 600,
        }
    }
}

impl CstrPhysicalParameters {
    pub const NAMES: [&'static str; 14] = [
        "p",
        "c_a_0",
        "c_p",
        "e_a",
        "e_b",
        "f",
        "dh",
        "k_0_a",
        "k_0_b",
        "r",
        "t_0",
        "v",
        "q_max",
        "max_timestep",
    ];

    /// Every parameter as a fixed value, keyed by [`Self::NAMES`].
    #[must_use]
    pub fn fixed_values(&self) -> BTreeMap<String, f64> {
        let values = [
            self.p,
            self.c_a_0,
            self.c_p,
            self.e_a,
            self.e_b,
            self.f,
            self.dh,
            self.k_0_a,
            self.k_0_b,
            self.r,
            self.t_0,
            self.v,
            self.q_max,
            f64::from(self.max_timestep),
        ];
        Self::NAMES
            .iter()
            .map(|&name| name.to_owned())
            .zip(values)
            .collect()
    }
}

impl TryFrom<&ParameterValues> for CstrPhysicalParameters {
    type Error = GymError;

    fn try_from(values: &ParameterValues) -> Result<Self, Self::Error> {
        Ok(Self {
            p: values.scalar("p")?,
            c_a_0: values.scalar("c_a_0")?,
            c_p: values.scalar("c_p")?,
            e_a: values.scalar("e_a")?,
            e_b: values.scalar("e_b")?,
            f: values.scalar("f")?,
            dh: values.scalar("dh")?,
            k_0_a: values.scalar("k_0_a")?,
            k_0_b: values.scalar("k_0_b")?,
            r: values.scalar("r")?,
            t_0: values.scalar("t_0")?,
            v: values.scalar("v")?,
            q_max: values.scalar("q_max")?,
            max_timestep: values.counter("max_timestep")?,
        })
    }
}

/// Draws [`CstrPhysicalParameters`] from fixed and sampled values.
#[derive(Clone, Debug)]
pub struct CstrPhysicalParametersGenerator {
    sampler: ParameterSampler,
}

impl CstrPhysicalParametersGenerator {
    /// # Errors
    ///
    /// Returns a configuration error when fixed and sampled keys overlap or
    /// a sampling entry cannot be resolved against `registry`.
    pub fn new(
        config: &ParametersGeneratorConfig,
        registry: &SamplingRegistry,
    ) -> Result<Self, GymError> {
        Ok(Self {
            sampler: ParameterSampler::new(config, registry)?,
        })
    }
}

impl PhysicalParametersGenerator<Cstr> for CstrPhysicalParametersGenerator {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<CstrPhysicalParameters, GymError> {
        let values = self.sampler.sample(rng)?;
        CstrPhysicalParameters::try_from(&values)
    }
}

/// Starts the tank full of feed at feed temperature, with no B and the step
/// counter at zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct CstrInitialStateGenerator;

impl InitialStateGenerator<Cstr> for CstrInitialStateGenerator {
    fn generate(&self, physical: &CstrPhysicalParameters) -> Result<StateOf<Cstr>, GymError> {
        State::new(
            CstrDaeState {
                c_a: physical.c_a_0,
                c_b: 0.0,
                temperature: physical.t_0,
            },
            CstrDaeParameters {
                flow_rate: physical.f,
                volume: physical.v,
                c_a_0: physical.c_a_0,
                density: physical.p,
                heat_capacity: physical.c_p,
                feed_temperature: physical.t_0,
                reaction_enthalpy: physical.dh,
                k_0_a: physical.k_0_a,
                k_0_b: physical.k_0_b,
                activation_energy_a: physical.e_a,
                activation_energy_b: physical.e_b,
                gas_constant: physical.r,
            },
            CstrNonDaeParameters {
                q_max: physical.q_max,
                max_timestep: physical.max_timestep,
                timestep: 0,
            },
        )
    }
}
