//! # Action Pipeline
//!
//! Turns the raw array an agent emits into the physical action the
//! integrator consumes:
//!
//! ```text
//! raw array ──from_array──► Action ──converter──► DAEAction ──regulator──► legal DAEAction
//! ```
//!
//! Out-of-range actions are not errors. The regulator maps them to the
//! nearest legal action and the step continues.

use tracing::trace;

use crate::{ArrayRecord, BoxSpace, Domain, GymError, StateOf};

/// Converts between agent units and physical units.
pub trait ActionConverter<D: Domain> {
    /// # Errors
    ///
    /// Implementations report their own failures; the step is aborted.
    fn action_to_dae_action(
        &self,
        action: &D::Action,
        state: &StateOf<D>,
    ) -> Result<D::DaeAction, GymError>;

    /// Inverse of [`Self::action_to_dae_action`].
    ///
    /// # Errors
    ///
    /// Implementations report their own failures.
    fn dae_action_to_action(
        &self,
        dae_action: &D::DaeAction,
        state: &StateOf<D>,
    ) -> Result<D::Action, GymError>;
}

/// Decides which physical actions are admissible and repairs the rest.
///
/// `convert_to_legal_action` must be idempotent, and must return legal
/// actions unchanged.
pub trait ActionRegulator<D: Domain> {
    fn is_legal(&self, dae_action: &D::DaeAction, state: &StateOf<D>) -> bool;

    fn convert_to_legal_action(&self, dae_action: &D::DaeAction, state: &StateOf<D>)
        -> D::DaeAction;
}

/// Everything between the agent's raw array and the integrator.
pub trait ActionPreprocessor<D: Domain> {
    fn action_space(&self) -> &BoxSpace;

    /// # Errors
    ///
    /// Returns a validation error when `raw_action` does not form a valid
    /// [`Domain::Action`], or whatever the conversion reports.
    fn preprocess_action(
        &self,
        raw_action: &[f64],
        state: &StateOf<D>,
    ) -> Result<D::DaeAction, GymError>;
}

/// The standard preprocessor: wrap, convert, then regulate.
pub struct ActionPipeline<D: Domain> {
    action_space: BoxSpace,
    converter: Box<dyn ActionConverter<D>>,
    regulator: Box<dyn ActionRegulator<D>>,
}

impl<D: Domain> ActionPipeline<D> {
    /// # Errors
    ///
    /// Returns [`GymError::InvalidSpace`] when the action space does not
    /// have one dimension per [`Domain::Action`] field.
    pub fn new(
        action_space: BoxSpace,
        converter: impl ActionConverter<D> + 'static,
        regulator: impl ActionRegulator<D> + 'static,
    ) -> Result<Self, GymError> {
        if action_space.shape() != D::Action::width() {
            return Err(GymError::InvalidSpace(format!(
                "action space has {} dimensions but the action has {} fields",
                action_space.shape(),
                D::Action::width()
            )));
        }
        Ok(Self {
            action_space,
            converter: Box::new(converter),
            regulator: Box::new(regulator),
        })
    }

    pub fn converter(&self) -> &dyn ActionConverter<D> {
        self.converter.as_ref()
    }

    pub fn regulator(&self) -> &dyn ActionRegulator<D> {
        self.regulator.as_ref()
    }
}

impl<D: Domain> ActionPreprocessor<D> for ActionPipeline<D> {
    fn action_space(&self) -> &BoxSpace {
        &self.action_space
    }

    fn preprocess_action(
        &self,
        raw_action: &[f64],
        state: &StateOf<D>,
    ) -> Result<D::DaeAction, GymError> {
        let action = D::Action::from_array(raw_action)?;
        let dae_action = self.converter.action_to_dae_action(&action, state)?;
        if self.regulator.is_legal(&dae_action, state) {
            return Ok(dae_action);
        }
        let legal = self.regulator.convert_to_legal_action(&dae_action, state);
        trace!(
            requested = ?dae_action.to_array(),
            applied = ?legal.to_array(),
            "clamped illegal action"
        );
        Ok(legal)
    }
}
