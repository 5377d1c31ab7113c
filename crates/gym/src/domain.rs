use std::fmt::Debug;

use crate::{ArrayRecord, Observation, State};

/// Binds together the record types of one simulated system.
///
/// A domain is a zero-sized marker; the collaborator traits are generic over
/// it so that an environment can only be assembled from parts that agree on
/// their records.
pub trait Domain: 'static {
    /// Per-episode constants, produced by the physical-parameters generator.
    type PhysicalParameters: Clone + Debug;
    type DaeState: ArrayRecord + Clone + Debug + PartialEq;
    type DaeParameters: ArrayRecord + Clone + Debug + PartialEq;
    type NonDaeParameters: ArrayRecord + Clone + Debug + PartialEq;
    /// The agent-facing action, usually normalised.
    type Action: ArrayRecord + Clone + Debug + PartialEq;
    /// The action in physical units, as passed to the integrator.
    type DaeAction: ArrayRecord + Clone + Debug + PartialEq;
    type Observation: Observation;
}

pub type StateOf<D> = State<
    <D as Domain>::DaeState,
    <D as Domain>::DaeParameters,
    <D as Domain>::NonDaeParameters,
>;
