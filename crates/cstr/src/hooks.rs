use gym::{GymError, ParameterAdvance, StateOf};

use crate::{Cstr, CstrDaeParameters, CstrNonDaeParameters};

/// Model constants stay put; the step counter moves on by one.
#[derive(Clone, Copy, Debug, Default)]
pub struct CstrParameterAdvance;

impl ParameterAdvance<Cstr> for CstrParameterAdvance {
    fn next_dae_params(&self, state: &StateOf<Cstr>) -> Result<CstrDaeParameters, GymError> {
        Ok(*state.dae_params())
    }

    fn next_non_dae_params(&self, state: &StateOf<Cstr>) -> Result<CstrNonDaeParameters, GymError> {
        let current = state.non_dae_params();
        Ok(CstrNonDaeParameters {
            timestep: current.timestep + 1,
            ..*current
        })
    }
}
