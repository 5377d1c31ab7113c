#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Continuous Stirred-Tank Reactor
//!
//! A complete [`gym`] domain: a tank fed with species A, where A converts
//! reversibly into B and an electric heater sets the reaction temperature.
//! The agent controls the heater and is rewarded for the concentration of
//! B.
//!
//! [`make_cstr_environment`] assembles the environment from a
//! [`CstrEnvConfig`]:
//!
//! ```rust,ignore
//! let config = CstrEnvConfig::from_json(&std::fs::read_to_string("cstr.json")?)?;
//! let mut env = make_cstr_environment(&config)?;
//! let (observation, _) = env.reset(None, None)?;
//! let result = env.step(&[0.5])?;
//! ```

mod action;
mod config;
pub mod dynamics;
mod extractors;
mod hooks;
mod parameters;
mod records;

use std::sync::Arc;

use gym::{Domain, Environment, FixedDurationTimeSpan, GymError, SamplingRegistry};
use tracing::debug;

pub use action::{cstr_action_pipeline, CstrActionConverter, CstrActionRegulator};
pub use config::CstrEnvConfig;
pub use dynamics::CstrDynamics;
pub use extractors::{
    CstrInfoExtractor, CstrObservationExtractor, CstrRewardExtractor, CstrTerminatedExtractor,
    CstrTruncatedExtractor,
};
pub use hooks::CstrParameterAdvance;
pub use parameters::{
    CstrInitialStateGenerator, CstrPhysicalParameters, CstrPhysicalParametersGenerator,
};
pub use records::{
    CstrAction, CstrDaeAction, CstrDaeParameters, CstrDaeState, CstrNonDaeParameters,
    CstrObservation,
};

/// Marker binding the CSTR records together.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cstr;

impl Domain for Cstr {
    type PhysicalParameters = CstrPhysicalParameters;
    type DaeState = CstrDaeState;
    type DaeParameters = CstrDaeParameters;
    type NonDaeParameters = CstrNonDaeParameters;
    type Action = CstrAction;
    type DaeAction = CstrDaeAction;
    type Observation = CstrObservation;
}

/// Builds a CSTR environment with the built-in sampling strategies.
///
/// # Errors
///
/// Returns a configuration error for an invalid integrator or parameter
/// configuration, or any error raised while generating the first episode.
pub fn make_cstr_environment(config: &CstrEnvConfig) -> Result<Environment<Cstr>, GymError> {
    make_cstr_environment_with_registry(config, &SamplingRegistry::new())
}

/// As [`make_cstr_environment`], resolving sampled parameters against
/// `registry`.
///
/// # Errors
///
/// See [`make_cstr_environment`].
pub fn make_cstr_environment_with_registry(
    config: &CstrEnvConfig,
    registry: &SamplingRegistry,
) -> Result<Environment<Cstr>, GymError> {
    let integrator = config.integrator.build(Arc::new(CstrDynamics))?;
    let time_span = FixedDurationTimeSpan::new(integrator.action_duration())?;
    debug!(
        seed = config.random_seed,
        sampled = ?config.physical_parameters.sampled_values.keys().collect::<Vec<_>>(),
        "building cstr environment"
    );

    Environment::builder(config.random_seed)
        .physical_parameters_generator(CstrPhysicalParametersGenerator::new(
            &config.physical_parameters,
            registry,
        )?)
        .initial_state_generator(CstrInitialStateGenerator)
        .identity_state_processing()
        .action_preprocessor(cstr_action_pipeline()?)
        .integrator(integrator)
        .time_span_calculator(time_span)
        .parameter_advance(CstrParameterAdvance)
        .observation_extractor(CstrObservationExtractor::new()?)
        .reward_extractor(CstrRewardExtractor)
        .terminated_extractor(CstrTerminatedExtractor)
        .truncated_extractor(CstrTruncatedExtractor)
        .info_extractor(CstrInfoExtractor)
        .build()
}
