//! # Environment State
//!
//! The full simulator state is split into three records:
//!
//! -   the **DAE state**, the variables the integrator evolves;
//! -   the **DAE parameters**, constants the dynamics read;
//! -   the **non-DAE parameters**, bookkeeping the dynamics never see
//!     (step counters, episode limits).
//!
//! Their field names must be pairwise disjoint, so a name always identifies
//! exactly one slot of the state.

use std::collections::BTreeSet;

use crate::{ArrayRecord, Domain, GymError, StateOf};

#[derive(Clone, Debug, PartialEq)]
pub struct State<S, P, N> {
    dae_state: S,
    dae_params: P,
    non_dae_params: N,
}

impl<S: ArrayRecord, P: ArrayRecord, N: ArrayRecord> State<S, P, N> {
    /// # Errors
    ///
    /// Returns [`GymError::OverlappingFields`] when two sub-records declare
    /// the same field name.
    pub fn new(dae_state: S, dae_params: P, non_dae_params: N) -> Result<Self, GymError> {
        let overlapping = overlapping_fields(&[S::FIELDS, P::FIELDS, N::FIELDS]);
        if !overlapping.is_empty() {
            return Err(GymError::OverlappingFields(overlapping));
        }
        Ok(Self {
            dae_state,
            dae_params,
            non_dae_params,
        })
    }

    pub fn dae_state(&self) -> &S {
        &self.dae_state
    }

    pub fn dae_params(&self) -> &P {
        &self.dae_params
    }

    pub fn non_dae_params(&self) -> &N {
        &self.non_dae_params
    }

    /// Concatenation of the three sub-record arrays, in declaration order.
    #[must_use]
    pub fn to_array(&self) -> Vec<f64> {
        let mut values = self.dae_state.to_array();
        values.extend(self.dae_params.to_array());
        values.extend(self.non_dae_params.to_array());
        values
    }

    pub fn into_parts(self) -> (S, P, N) {
        (self.dae_state, self.dae_params, self.non_dae_params)
    }
}

/// Names that occur in more than one group, sorted.
#[must_use]
pub fn overlapping_fields(groups: &[&[&str]]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut overlapping = BTreeSet::new();
    for group in groups {
        for &name in group.iter().collect::<BTreeSet<_>>() {
            if !seen.insert(name) {
                overlapping.insert(name.to_owned());
            }
        }
    }
    overlapping.into_iter().collect()
}

/// Transforms the committed state before it is integrated.
pub trait StatePreprocessor<D: Domain> {
    /// # Errors
    ///
    /// Implementations report their own failures; the step is aborted.
    fn preprocess_state(&self, state: &StateOf<D>) -> Result<StateOf<D>, GymError>;
}

/// Transforms the freshly integrated state before it is extracted from and
/// committed.
pub trait StatePostprocessor<D: Domain> {
    /// # Errors
    ///
    /// Implementations report their own failures; the step is aborted.
    fn postprocess_state(&self, state: StateOf<D>) -> Result<StateOf<D>, GymError>;
}

/// Pass-through pre- and postprocessor.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityStateProcessor;

impl<D: Domain> StatePreprocessor<D> for IdentityStateProcessor {
    fn preprocess_state(&self, state: &StateOf<D>) -> Result<StateOf<D>, GymError> {
        Ok(state.clone())
    }
}

impl<D: Domain> StatePostprocessor<D> for IdentityStateProcessor {
    fn postprocess_state(&self, state: StateOf<D>) -> Result<StateOf<D>, GymError> {
        Ok(state)
    }
}

/// Builds the state an episode starts from.
pub trait InitialStateGenerator<D: Domain> {
    /// # Errors
    ///
    /// Returns an error when the physical parameters cannot produce a valid
    /// state.
    fn generate(&self, physical_parameters: &D::PhysicalParameters)
        -> Result<StateOf<D>, GymError>;
}
