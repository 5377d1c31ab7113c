//! # Environment
//!
//! [`Environment`] owns every collaborator of one simulated system, the
//! committed [`State`](crate::State), the elapsed time and the step
//! counter. Its `reset` and `step` are the only algorithm there is:
//! domains customise behaviour through collaborators and the two hooks in
//! [`hooks`](crate::hooks), never by replacing these methods.
//!
//! A step either commits completely or not at all. All fallible work runs
//! against temporaries, and the committed state, time and counter are only
//! replaced once every collaborator has succeeded.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use solver::{Integrator, TimeSpan};
use tracing::{debug, trace, trace_span};

use crate::{
    ActionPreprocessor, ArrayRecord, BoxSpace, Domain, EnvironmentBuilder, GymError, Info,
    InfoExtractor, InitialStateGenerator, Observation, ObservationExtractor, ParameterAdvance,
    PhysicalParametersGenerator, RewardExtractor, State, StateOf, StatePostprocessor,
    StatePreprocessor, TerminatedExtractor, TimeSpanCalculator, TruncatedExtractor,
};

/// What one call to [`Environment::step`] hands back to the agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Vec<f64>,
    pub reward: f64,
    /// The task ended on its own terms (goal reached, invalid state).
    pub terminated: bool,
    /// The episode was cut off from outside (time or step budget).
    pub truncated: bool,
    pub info: Info,
}

impl StepResult {
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

pub(crate) struct Collaborators<D: Domain> {
    pub physical_parameters_generator: Box<dyn PhysicalParametersGenerator<D>>,
    pub initial_state_generator: Box<dyn InitialStateGenerator<D>>,
    pub state_preprocessor: Box<dyn StatePreprocessor<D>>,
    pub state_postprocessor: Box<dyn StatePostprocessor<D>>,
    pub action_preprocessor: Box<dyn ActionPreprocessor<D>>,
    pub integrator: Box<dyn Integrator>,
    pub time_span_calculator: Box<dyn TimeSpanCalculator<D>>,
    pub parameter_advance: Box<dyn ParameterAdvance<D>>,
    pub observation_extractor: Box<dyn ObservationExtractor<D>>,
    pub reward_extractor: Box<dyn RewardExtractor<D>>,
    pub terminated_extractor: Box<dyn TerminatedExtractor<D>>,
    pub truncated_extractor: Box<dyn TruncatedExtractor<D>>,
    pub info_extractor: Box<dyn InfoExtractor<D>>,
}

pub struct Environment<D: Domain> {
    parts: Collaborators<D>,
    rng: ChaCha8Rng,
    seed: u64,
    physical_parameters: D::PhysicalParameters,
    state: StateOf<D>,
    current_time: f64,
    step_counter: u64,
}

impl<D: Domain> Environment<D> {
    #[must_use]
    pub fn builder(seed: u64) -> EnvironmentBuilder<D> {
        EnvironmentBuilder::new(seed)
    }

    /// Seeds the random stream and generates the first episode's parameters
    /// and state, so a freshly built environment is already steppable.
    pub(crate) fn assemble(parts: Collaborators<D>, seed: u64) -> Result<Self, GymError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let physical_parameters = parts.physical_parameters_generator.generate(&mut rng)?;
        let state = parts.initial_state_generator.generate(&physical_parameters)?;
        debug!(
            seed,
            integrator = parts.integrator.method(),
            action_duration = parts.integrator.action_duration(),
            "environment assembled"
        );
        Ok(Self {
            parts,
            rng,
            seed,
            physical_parameters,
            state,
            current_time: 0.0,
            step_counter: 0,
        })
    }

    /// Starts a new episode.
    ///
    /// With `Some(seed)` the random stream restarts from that seed; with
    /// `None` it continues where the previous episode left it. `options` is
    /// accepted for protocol compatibility and not interpreted.
    ///
    /// # Errors
    ///
    /// Forwards failures of the generators or of the observation and info
    /// extractors. On error the previous episode stays committed.
    pub fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&Info>,
    ) -> Result<(Vec<f64>, Info), GymError> {
        let (mut rng, seed) = match seed {
            Some(seed) => (ChaCha8Rng::seed_from_u64(seed), seed),
            None => (self.rng.clone(), self.seed),
        };
        let physical_parameters = self
            .parts
            .physical_parameters_generator
            .generate(&mut rng)?;
        let state = self
            .parts
            .initial_state_generator
            .generate(&physical_parameters)?;
        let observation = self
            .parts
            .observation_extractor
            .extract_observation(&state)?
            .to_array();
        let info = self.parts.info_extractor.extract_info(None, None, &state)?;

        debug!(
            seed,
            ignored_options = options.map_or(0, Info::len),
            parameters = ?physical_parameters,
            "environment reset"
        );
        self.rng = rng;
        self.seed = seed;
        self.physical_parameters = physical_parameters;
        self.state = state;
        self.current_time = 0.0;
        self.step_counter = 0;
        Ok((observation, info))
    }

    /// Advances the simulation by one action.
    ///
    /// # Errors
    ///
    /// Forwards the first collaborator failure: an invalid raw action, a
    /// failing hook, an integration failure or an extractor error. Nothing
    /// is committed in that case.
    pub fn step(&mut self, raw_action: &[f64]) -> Result<StepResult, GymError> {
        let _span = trace_span!("step", step = self.step_counter).entered();
        let parts = &self.parts;
        let preprocessed = parts.state_preprocessor.preprocess_state(&self.state)?;
        let dae_action = parts
            .action_preprocessor
            .preprocess_action(raw_action, &self.state)?;
        let time_span = parts
            .time_span_calculator
            .calculate_time_span(self.current_time, &self.state)?;
        let next_state = self.next_state(&preprocessed, &dae_action, time_span)?;
        let next_state = parts.state_postprocessor.postprocess_state(next_state)?;

        let observation = parts
            .observation_extractor
            .extract_observation(&next_state)?
            .to_array();
        let reward = parts
            .reward_extractor
            .extract_reward(&self.state, &dae_action, &next_state)?;
        let terminated = parts
            .terminated_extractor
            .extract_terminated(&self.state, &dae_action, &next_state)?;
        let truncated = parts
            .truncated_extractor
            .extract_truncated(&self.state, &dae_action, &next_state)?;
        let info = parts.info_extractor.extract_info(
            Some(&self.state),
            Some(&dae_action),
            &next_state,
        )?;

        trace!(
            start = time_span.start_time,
            end = time_span.end_time,
            reward,
            terminated,
            truncated,
            "committed"
        );
        self.state = next_state;
        self.current_time = time_span.end_time;
        self.step_counter += 1;
        Ok(StepResult {
            observation,
            reward,
            terminated,
            truncated,
            info,
        })
    }

    fn next_state(
        &self,
        state: &StateOf<D>,
        dae_action: &D::DaeAction,
        time_span: TimeSpan,
    ) -> Result<StateOf<D>, GymError> {
        let values = self.parts.integrator.integrate(
            &state.dae_state().to_array(),
            &state.dae_params().to_array(),
            &dae_action.to_array(),
            time_span,
        )?;
        let dae_state = D::DaeState::from_array(&values)?;
        let dae_params = self.parts.parameter_advance.next_dae_params(state)?;
        let non_dae_params = self.parts.parameter_advance.next_non_dae_params(state)?;
        State::new(dae_state, dae_params, non_dae_params)
    }

    pub fn state(&self) -> &StateOf<D> {
        &self.state
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn step_counter(&self) -> u64 {
        self.step_counter
    }

    pub fn physical_parameters(&self) -> &D::PhysicalParameters {
        &self.physical_parameters
    }

    /// The seed the random stream was last started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn observation_space(&self) -> &BoxSpace {
        self.parts.observation_extractor.observation_space()
    }

    pub fn action_space(&self) -> &BoxSpace {
        self.parts.action_preprocessor.action_space()
    }

    pub fn integrator(&self) -> &dyn Integrator {
        self.parts.integrator.as_ref()
    }
}
