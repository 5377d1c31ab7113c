//! The CSTR's state, parameter and action records.
//!
//! Field order is array order. Units follow the reactor model: concentrations
//! in kmol/m³, temperatures in K, heat in kJ/min, time in minutes.

use gym::record::integral_field;
use gym::{ArrayRecord, GymError, Observation};
use serde::{Deserialize, Serialize};

/// Variables the integrator evolves.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CstrDaeState {
    /// Concentration of species A.
    pub c_a: f64,
    /// Concentration of species B.
    pub c_b: f64,
    pub temperature: f64,
}

impl ArrayRecord for CstrDaeState {
    const FIELDS: &'static [&'static str] = &["c_a", "c_b", "temperature"];

    fn to_array(&self) -> Vec<f64> {
        vec![self.c_a, self.c_b, self.temperature]
    }

    fn from_array(values: &[f64]) -> Result<Self, GymError> {
        Self::check_width(values)?;
        Ok(Self {
            c_a: values[0],
            c_b: values[1],
            temperature: values[2],
        })
    }
}

/// Constants of the reactor model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CstrDaeParameters {
    /// Volumetric flow in and out of the tank, m³/min.
    pub flow_rate: f64,
    /// Tank volume, m³.
    pub volume: f64,
    /// Feed concentration of A.
    pub c_a_0: f64,
    /// Liquid density, kg/m³.
    pub density: f64,
    /// Heat capacity, kJ/(K·kg).
    pub heat_capacity: f64,
    /// Feed temperature, also the starting temperature.
    pub feed_temperature: f64,
    /// Heat of reaction, kJ/kmol.
    pub reaction_enthalpy: f64,
    /// Pre-exponential factor of A → B, 1/min.
    pub k_0_a: f64,
    /// Pre-exponential factor of B → A, 1/min.
    pub k_0_b: f64,
    pub activation_energy_a: f64,
    pub activation_energy_b: f64,
    pub gas_constant: f64,
}

impl ArrayRecord for CstrDaeParameters {
    const FIELDS: &'static [&'static str] = &[
        "flow_rate",
        "volume",
        "c_a_0",
        "density",
        "heat_capacity",
        "feed_temperature",
        "reaction_enthalpy",
        "k_0_a",
        "k_0_b",
        "activation_energy_a",
        "activation_energy_b",
        "gas_constant",
    ];

    fn to_array(&self) -> Vec<f64> {
        vec![
            self.flow_rate,
            self.volume,
            self.c_a_0,
            self.density,
            self.heat_capacity,
            self.feed_temperature,
            self.reaction_enthalpy,
            self.k_0_a,
            self.k_0_b,
            self.activation_energy_a,
            self.activation_energy_b,
            self.gas_constant,
        ]
    }

    fn from_array(values: &[f64]) -> Result<Self, GymError> {
        Self::check_width(values)?;
        Ok(Self {
            flow_rate: values[0],
            volume: values[1],
            c_a_0: values[2],
            density: values[3],
            heat_capacity: values[4],
            feed_temperature: values[5],
            reaction_enthalpy: values[6],
            k_0_a: values[7],
            k_0_b: values[8],
            activation_energy_a: values[9],
            activation_energy_b: values[10],
            gas_constant: values[11],
        })
    }
}

/// Episode bookkeeping outside the model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CstrNonDaeParameters {
    /// Largest heat rate the heater can deliver.
    pub q_max: f64,
    /// Steps after which the episode terminates.
    pub max_timestep: u32,
    /// Steps taken so far.
    pub timestep: u32,
}

impl ArrayRecord for CstrNonDaeParameters {
    const FIELDS: &'static [&'static str] = &["q_max", "max_timestep", "timestep"];

    fn to_array(&self) -> Vec<f64> {
        vec![
            self.q_max,
            f64::from(self.max_timestep),
            f64::from(self.timestep),
        ]
    }

    fn from_array(values: &[f64]) -> Result<Self, GymError> {
        Self::check_width(values)?;
        Ok(Self {
            q_max: values[0],
            max_timestep: integral_field("max_timestep", values[1])?,
            timestep: integral_field("timestep", values[2])?,
        })
    }
}

/// Heater setting as the agent emits it, nominally in `[-1, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CstrAction {
    pub q_normalized: f64,
}

impl ArrayRecord for CstrAction {
    const FIELDS: &'static [&'static str] = &["q_normalized"];

    fn to_array(&self) -> Vec<f64> {
        vec![self.q_normalized]
    }

    fn from_array(values: &[f64]) -> Result<Self, GymError> {
        Self::check_width(values)?;
        Ok(Self {
            q_normalized: values[0],
        })
    }
}

/// Heat rate delivered to the tank, kJ/min.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CstrDaeAction {
    pub q: f64,
}

impl ArrayRecord for CstrDaeAction {
    const FIELDS: &'static [&'static str] = &["q"];

    fn to_array(&self) -> Vec<f64> {
        vec![self.q]
    }

    fn from_array(values: &[f64]) -> Result<Self, GymError> {
        Self::check_width(values)?;
        Ok(Self { q: values[0] })
    }
}

/// Concentrations relative to the feed, temperature relative to the feed
/// temperature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CstrObservation {
    pub c_a: f64,
    pub c_b: f64,
    pub temperature: f64,
}

impl Observation for CstrObservation {
    fn to_array(&self) -> Vec<f64> {
        vec![self.c_a, self.c_b, self.temperature]
    }
}
