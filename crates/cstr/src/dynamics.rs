//! # Reactor Dynamics
//!
//! A jacketless stirred tank with a reversible first-order reaction
//! `A ⇌ B`, constant inflow of feed and an electric heater:
//!
//! ```text
//! k_a   = k_0_a · exp(−E_a / (R·T))
//! k_b   = k_0_b · exp(−E_b / (R·T))
//! dc_a  = F/V · (c_a_0 − c_a) − k_a·c_a + k_b·c_b
//! dc_b  = −F/V · c_b + k_a·c_a − k_b·c_b
//! dT    = (F·ρ·c_p·(T_0 − T) + q − ΔH·V·(k_a·c_a − k_b·c_b)) / (ρ·c_p·V)
//! ```
//!
//! The feed carries no B, so `c_a + c_b` relaxes towards `c_a_0` and stays
//! there once it starts there.

use gym::ArrayRecord;
use solver::{SolverError, SystemDynamics};

use crate::{CstrDaeAction, CstrDaeParameters, CstrDaeState};

/// Arrhenius rate constant.
#[must_use]
pub fn rate_constant(
    pre_exponential: f64,
    activation_energy: f64,
    gas_constant: f64,
    temperature: f64,
) -> f64 {
    pre_exponential * (-activation_energy / (gas_constant * temperature)).exp()
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CstrDynamics;

impl CstrDynamics {
    /// Time derivative of the reactor state under heat rate `q`.
    #[must_use]
    pub fn rates(
        state: &CstrDaeState,
        params: &CstrDaeParameters,
        action: &CstrDaeAction,
    ) -> CstrDaeState {
        let CstrDaeState {
            c_a,
            c_b,
            temperature,
        } = *state;
        let p = params;
        let k_a = rate_constant(p.k_0_a, p.activation_energy_a, p.gas_constant, temperature);
        let k_b = rate_constant(p.k_0_b, p.activation_energy_b, p.gas_constant, temperature);
        let dilution = p.flow_rate / p.volume;
        let net_reaction = k_a * c_a - k_b * c_b;
        let thermal_mass = p.density * p.heat_capacity;

        CstrDaeState {
            c_a: dilution * (p.c_a_0 - c_a) - net_reaction,
            c_b: -dilution * c_b + net_reaction,
            temperature: (p.flow_rate * thermal_mass * (p.feed_temperature - temperature)
                + action.q
                - p.reaction_enthalpy * p.volume * net_reaction)
                / (thermal_mass * p.volume),
        }
    }
}

fn record<R: ArrayRecord>(what: &'static str, values: &[f64]) -> Result<R, SolverError> {
    R::from_array(values).map_err(|_| SolverError::DimensionMismatch {
        what,
        expected: R::width(),
        got: values.len(),
    })
}

impl SystemDynamics for CstrDynamics {
    fn derivative(
        &self,
        _time: f64,
        state: &[f64],
        parameters: &[f64],
        action: &[f64],
        dydt: &mut [f64],
    ) -> Result<(), SolverError> {
        let state: CstrDaeState = record("state", state)?;
        let params: CstrDaeParameters = record("parameters", parameters)?;
        let action: CstrDaeAction = record("action", action)?;
        if dydt.len() != CstrDaeState::width() {
            return Err(SolverError::DimensionMismatch {
                what: "derivative",
                expected: CstrDaeState::width(),
                got: dydt.len(),
            });
        }
        dydt.copy_from_slice(&Self::rates(&state, &params, &action).to_array());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{CstrInitialStateGenerator, CstrPhysicalParameters};
    use gym::InitialStateGenerator;

    #[test]
    fn feed_conditions_only_react() {
        let state = CstrInitialStateGenerator
            .generate(&CstrPhysicalParameters::default())
            .unwrap();
        let off = CstrDaeAction { q: 0.0 };
        let d = CstrDynamics::rates(state.dae_state(), state.dae_params(), &off);
        let k_a = rate_constant(50_000.0, 41_570.0, 8.314, 300.0);
        assert_relative_eq!(d.c_a, -k_a * 0.3, max_relative = 1e-12);
        assert_relative_eq!(d.c_b, k_a * 0.3, max_relative = 1e-12);
        assert_relative_eq!(d.c_a + d.c_b, 0.0, epsilon = 1e-15);
        assert!(d.temperature < 0.0, "endothermic reaction cools the tank");
    }

    #[test]
    fn heater_raises_temperature_rate() {
        let state = CstrInitialStateGenerator
            .generate(&CstrPhysicalParameters::default())
            .unwrap();
        let rates = |q| {
            CstrDynamics::rates(state.dae_state(), state.dae_params(), &CstrDaeAction { q })
        };
        let (cold, hot) = (rates(0.0), rates(5000.0));
        assert_relative_eq!(
            hot.temperature - cold.temperature,
            5000.0 / (780.0 * 3.25 * 0.2),
            max_relative = 1e-12
        );
    }

    #[test]
    fn flat_arrays_are_checked() {
        let mut dydt = [0.0; 3];
        let err = CstrDynamics
            .derivative(0.0, &[0.3, 0.0], &[0.0; 12], &[0.0], &mut dydt)
            .unwrap_err();
        assert!(matches!(
            err,
            SolverError::DimensionMismatch { what: "state", expected: 3, got: 2 }
        ));
    }
}
