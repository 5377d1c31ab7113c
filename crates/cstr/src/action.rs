//! Heater control: normalised setting → heat rate, clamped to the heater's
//! range.

use gym::{ActionConverter, ActionPipeline, ActionRegulator, BoxSpace, GymError, StateOf};

use crate::{Cstr, CstrAction, CstrDaeAction};

/// `q = q_normalized · q_max`, with `q_max` read from the state.
#[derive(Clone, Copy, Debug, Default)]
pub struct CstrActionConverter;

impl ActionConverter<Cstr> for CstrActionConverter {
    fn action_to_dae_action(
        &self,
        action: &CstrAction,
        state: &StateOf<Cstr>,
    ) -> Result<CstrDaeAction, GymError> {
        Ok(CstrDaeAction {
            q: action.q_normalized * state.non_dae_params().q_max,
        })
    }

    fn dae_action_to_action(
        &self,
        dae_action: &CstrDaeAction,
        state: &StateOf<Cstr>,
    ) -> Result<CstrAction, GymError> {
        let q_max = state.non_dae_params().q_max;
        if q_max == 0.0 {
            return Err(GymError::InvalidField {
                field: "q_max".to_owned(),
                value: q_max,
                reason: "cannot normalise by a zero heater limit",
            });
        }
        Ok(CstrAction {
            q_normalized: dae_action.q / q_max,
        })
    }
}

/// The heater can only add heat, up to `q_max`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CstrActionRegulator;

impl ActionRegulator<Cstr> for CstrActionRegulator {
    fn is_legal(&self, dae_action: &CstrDaeAction, state: &StateOf<Cstr>) -> bool {
        (0.0..=state.non_dae_params().q_max).contains(&dae_action.q)
    }

    fn convert_to_legal_action(
        &self,
        dae_action: &CstrDaeAction,
        state: &StateOf<Cstr>,
    ) -> CstrDaeAction {
        CstrDaeAction {
            q: dae_action.q.max(0.0).min(state.non_dae_params().q_max),
        }
    }
}

/// Agents act in `[-1, 1]`; the negative half maps to "heater off".
///
/// # Errors
///
/// Never fails for this fixed space; the `Result` comes from
/// [`ActionPipeline::new`].
pub fn cstr_action_pipeline() -> Result<ActionPipeline<Cstr>, GymError> {
    ActionPipeline::new(
        BoxSpace::uniform(-1.0, 1.0, 1)?,
        CstrActionConverter,
        CstrActionRegulator,
    )
}
