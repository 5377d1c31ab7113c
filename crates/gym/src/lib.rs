#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # DAE Gym Core
//!
//! Reinforcement-learning environments over differential-algebraic process
//! models.
//!
//! This crate fixes *how* an environment steps and resets, and leaves *what*
//! it simulates to pluggable collaborators. A domain crate describes its
//! records through the [`Domain`] trait, implements the collaborator traits,
//! and hands them to an [`EnvironmentBuilder`]. Every environment built this
//! way follows the same step algorithm; there is nothing to override.
//!
//! ## Key Components
//!
//! -   **Data model:** [`State`] groups three disjoint [`ArrayRecord`]s (DAE
//!     state, DAE parameters, non-DAE parameters). Records round-trip
//!     losslessly through flat `f64` arrays, which is the only form the
//!     integrator ever sees.
//! -   **Action pipeline:** [`ActionPipeline`] wraps a raw agent array into
//!     an action, converts it to physical units with an [`ActionConverter`]
//!     and silently clamps it with an [`ActionRegulator`].
//! -   **Extractors:** observation, reward, terminated, truncated and info
//!     strategies, see [`extractors`].
//! -   **Generators:** per-episode physical parameters (optionally sampled,
//!     see [`sampling`]) and the initial state.
//! -   **[`Environment`]:** the orchestrator, exposed to training loops
//!     through the [`Env`] trait.
//! -   **[`Rollout`]:** records whole episodes for regression fixtures.
//!
//! ## Step pipeline
//!
//! ```text
//! state ──preprocess──► integrate(dae_state, dae_params, dae_action, span)
//! raw action ─► Action ─► DAEAction ─► regulate ─┘        │
//!                                  advance params ────────┤
//!                                                         ▼
//!                      extractors(state, dae_action, postprocess(next_state))
//! ```

pub mod action;
mod builder;
pub mod domain;
pub mod env;
pub mod environment;
mod error;
pub mod extractors;
pub mod hooks;
pub mod parameters;
pub mod record;
pub mod recorder;
pub mod sampling;
pub mod space;
pub mod state;

pub use action::{ActionConverter, ActionPipeline, ActionPreprocessor, ActionRegulator};
pub use builder::EnvironmentBuilder;
pub use domain::{Domain, StateOf};
pub use env::Env;
pub use environment::{Environment, StepResult};
pub use error::GymError;
pub use extractors::{
    Info, InfoExtractor, Observation, ObservationExtractor, RewardExtractor, TerminatedExtractor,
    TruncatedExtractor,
};
pub use hooks::{FixedDurationTimeSpan, ParameterAdvance, TimeSpanCalculator};
pub use parameters::{
    ParameterSampler, ParameterValues, ParametersGeneratorConfig, PhysicalParametersGenerator,
};
pub use record::ArrayRecord;
pub use recorder::{record_episode, Recorder, Rollout, Transition};
pub use sampling::{Distribution, SamplingConfig, SamplingRegistry, SamplingStrategy};
pub use space::BoxSpace;
pub use state::{
    IdentityStateProcessor, InitialStateGenerator, State, StatePostprocessor, StatePreprocessor,
};

pub use solver::{Integrator, TimeSpan};
