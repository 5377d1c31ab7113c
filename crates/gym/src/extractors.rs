//! # Extractors
//!
//! Five independent strategies derive what the agent sees from a transition
//! `(state, dae_action, next_state)`. At reset there is no previous state or
//! action, so only the observation and info extractors run, and the info
//! extractor receives `None` for both.

use crate::{BoxSpace, Domain, GymError, StateOf};

/// Free-form diagnostics attached to a reset or a step.
pub type Info = serde_json::Map<String, serde_json::Value>;

/// An observation record that flattens to the array handed to the agent.
pub trait Observation {
    fn to_array(&self) -> Vec<f64>;
}

pub trait ObservationExtractor<D: Domain> {
    /// The box every extracted observation lies in.
    fn observation_space(&self) -> &BoxSpace;

    /// # Errors
    ///
    /// Implementations report their own failures; the step is aborted.
    fn extract_observation(&self, next_state: &StateOf<D>) -> Result<D::Observation, GymError>;
}

pub trait RewardExtractor<D: Domain> {
    /// # Errors
    ///
    /// Implementations report their own failures; the step is aborted.
    fn extract_reward(
        &self,
        state: &StateOf<D>,
        dae_action: &D::DaeAction,
        next_state: &StateOf<D>,
    ) -> Result<f64, GymError>;
}

pub trait TerminatedExtractor<D: Domain> {
    /// # Errors
    ///
    /// Implementations report their own failures; the step is aborted.
    fn extract_terminated(
        &self,
        state: &StateOf<D>,
        dae_action: &D::DaeAction,
        next_state: &StateOf<D>,
    ) -> Result<bool, GymError>;
}

pub trait TruncatedExtractor<D: Domain> {
    /// # Errors
    ///
    /// Implementations report their own failures; the step is aborted.
    fn extract_truncated(
        &self,
        state: &StateOf<D>,
        dae_action: &D::DaeAction,
        next_state: &StateOf<D>,
    ) -> Result<bool, GymError>;
}

pub trait InfoExtractor<D: Domain> {
    /// `state` and `dae_action` are `None` at reset.
    ///
    /// # Errors
    ///
    /// Implementations report their own failures; the step is aborted.
    fn extract_info(
        &self,
        state: Option<&StateOf<D>>,
        dae_action: Option<&D::DaeAction>,
        next_state: &StateOf<D>,
    ) -> Result<Info, GymError>;
}
