//! What the agent sees of the reactor.

use gym::{
    BoxSpace, GymError, Info, InfoExtractor, ObservationExtractor, RewardExtractor, StateOf,
    TerminatedExtractor, TruncatedExtractor,
};
use serde_json::json;

use crate::{Cstr, CstrDaeAction, CstrObservation};

/// Feed-relative concentrations and temperature.
#[derive(Clone, Debug)]
pub struct CstrObservationExtractor {
    space: BoxSpace,
}

impl CstrObservationExtractor {
    /// # Errors
    ///
    /// Never fails for this fixed space.
    pub fn new() -> Result<Self, GymError> {
        Ok(Self {
            space: BoxSpace::new(vec![0.0, 0.0, 0.0], vec![1.0, 1.0, f64::INFINITY])?,
        })
    }
}

impl ObservationExtractor<Cstr> for CstrObservationExtractor {
    fn observation_space(&self) -> &BoxSpace {
        &self.space
    }

    fn extract_observation(&self, next_state: &StateOf<Cstr>) -> Result<CstrObservation, GymError> {
        let state = next_state.dae_state();
        let params = next_state.dae_params();
        Ok(CstrObservation {
            c_a: state.c_a / params.c_a_0,
            c_b: state.c_b / params.c_a_0,
            temperature: state.temperature / params.feed_temperature,
        })
    }
}

/// Rewards product: the concentration of B after the step.
#[derive(Clone, Copy, Debug, Default)]
pub struct CstrRewardExtractor;

impl RewardExtractor<Cstr> for CstrRewardExtractor {
    fn extract_reward(
        &self,
        _state: &StateOf<Cstr>,
        _dae_action: &CstrDaeAction,
        next_state: &StateOf<Cstr>,
    ) -> Result<f64, GymError> {
        Ok(next_state.dae_state().c_b)
    }
}

/// Ends the episode once the step budget is spent.
#[derive(Clone, Copy, Debug, Default)]
pub struct CstrTerminatedExtractor;

impl TerminatedExtractor<Cstr> for CstrTerminatedExtractor {
    fn extract_terminated(
        &self,
        _state: &StateOf<Cstr>,
        _dae_action: &CstrDaeAction,
        next_state: &StateOf<Cstr>,
    ) -> Result<bool, GymError> {
        let params = next_state.non_dae_params();
        Ok(params.timestep >= params.max_timestep)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CstrTruncatedExtractor;

impl TruncatedExtractor<Cstr> for CstrTruncatedExtractor {
    fn extract_truncated(
        &self,
        _state: &StateOf<Cstr>,
        _dae_action: &CstrDaeAction,
        _next_state: &StateOf<Cstr>,
    ) -> Result<bool, GymError> {
        Ok(false)
    }
}

/// After a step: the applied heat rate and the conversion of A.
#[derive(Clone, Copy, Debug, Default)]
pub struct CstrInfoExtractor;

impl InfoExtractor<Cstr> for CstrInfoExtractor {
    fn extract_info(
        &self,
        state: Option<&StateOf<Cstr>>,
        dae_action: Option<&CstrDaeAction>,
        next_state: &StateOf<Cstr>,
    ) -> Result<Info, GymError> {
        let mut info = Info::new();
        if state.is_none() {
            return Ok(info);
        }
        if let Some(dae_action) = dae_action {
            info.insert("heat_rate".to_owned(), json!(dae_action.q));
        }
        let c_a_0 = next_state.dae_params().c_a_0;
        info.insert(
            "conversion".to_owned(),
            json!(1.0 - next_state.dae_state().c_a / c_a_0),
        );
        Ok(info)
    }
}
