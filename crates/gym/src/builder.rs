//! # Environment Builder
//!
//! Collects the collaborators of an [`Environment`] one by one. `build`
//! refuses to produce an environment while any of them is missing.

use solver::Integrator;

use crate::environment::Collaborators;
use crate::{
    ActionPreprocessor, Domain, Environment, GymError, IdentityStateProcessor, InfoExtractor,
    InitialStateGenerator, ObservationExtractor, ParameterAdvance, PhysicalParametersGenerator,
    RewardExtractor, StatePostprocessor, StatePreprocessor, TerminatedExtractor,
    TimeSpanCalculator, TruncatedExtractor,
};

pub struct EnvironmentBuilder<D: Domain> {
    seed: u64,
    physical_parameters_generator: Option<Box<dyn PhysicalParametersGenerator<D>>>,
    initial_state_generator: Option<Box<dyn InitialStateGenerator<D>>>,
    state_preprocessor: Option<Box<dyn StatePreprocessor<D>>>,
    state_postprocessor: Option<Box<dyn StatePostprocessor<D>>>,
    action_preprocessor: Option<Box<dyn ActionPreprocessor<D>>>,
    integrator: Option<Box<dyn Integrator>>,
    time_span_calculator: Option<Box<dyn TimeSpanCalculator<D>>>,
    parameter_advance: Option<Box<dyn ParameterAdvance<D>>>,
    observation_extractor: Option<Box<dyn ObservationExtractor<D>>>,
    reward_extractor: Option<Box<dyn RewardExtractor<D>>>,
    terminated_extractor: Option<Box<dyn TerminatedExtractor<D>>>,
    truncated_extractor: Option<Box<dyn TruncatedExtractor<D>>>,
    info_extractor: Option<Box<dyn InfoExtractor<D>>>,
}

impl<D: Domain> EnvironmentBuilder<D> {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            physical_parameters_generator: None,
            initial_state_generator: None,
            state_preprocessor: None,
            state_postprocessor: None,
            action_preprocessor: None,
            integrator: None,
            time_span_calculator: None,
            parameter_advance: None,
            observation_extractor: None,
            reward_extractor: None,
            terminated_extractor: None,
            truncated_extractor: None,
            info_extractor: None,
        }
    }

    #[must_use]
    pub fn physical_parameters_generator(
        mut self,
        generator: impl PhysicalParametersGenerator<D> + 'static,
    ) -> Self {
        self.physical_parameters_generator = Some(Box::new(generator));
        self
    }

    #[must_use]
    pub fn initial_state_generator(
        mut self,
        generator: impl InitialStateGenerator<D> + 'static,
    ) -> Self {
        self.initial_state_generator = Some(Box::new(generator));
        self
    }

    #[must_use]
    pub fn state_preprocessor(mut self, preprocessor: impl StatePreprocessor<D> + 'static) -> Self {
        self.state_preprocessor = Some(Box::new(preprocessor));
        self
    }

    #[must_use]
    pub fn state_postprocessor(
        mut self,
        postprocessor: impl StatePostprocessor<D> + 'static,
    ) -> Self {
        self.state_postprocessor = Some(Box::new(postprocessor));
        self
    }

    /// Uses [`IdentityStateProcessor`] on both sides of the integrator.
    #[must_use]
    pub fn identity_state_processing(self) -> Self {
        self.state_preprocessor(IdentityStateProcessor)
            .state_postprocessor(IdentityStateProcessor)
    }

    #[must_use]
    pub fn action_preprocessor(
        mut self,
        preprocessor: impl ActionPreprocessor<D> + 'static,
    ) -> Self {
        self.action_preprocessor = Some(Box::new(preprocessor));
        self
    }

    #[must_use]
    pub fn integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.integrator = Some(integrator);
        self
    }

    #[must_use]
    pub fn time_span_calculator(
        mut self,
        calculator: impl TimeSpanCalculator<D> + 'static,
    ) -> Self {
        self.time_span_calculator = Some(Box::new(calculator));
        self
    }

    #[must_use]
    pub fn parameter_advance(mut self, advance: impl ParameterAdvance<D> + 'static) -> Self {
        self.parameter_advance = Some(Box::new(advance));
        self
    }

    #[must_use]
    pub fn observation_extractor(
        mut self,
        extractor: impl ObservationExtractor<D> + 'static,
    ) -> Self {
        self.observation_extractor = Some(Box::new(extractor));
        self
    }

    #[must_use]
    pub fn reward_extractor(mut self, extractor: impl RewardExtractor<D> + 'static) -> Self {
        self.reward_extractor = Some(Box::new(extractor));
        self
    }

    #[must_use]
    pub fn terminated_extractor(
        mut self,
        extractor: impl TerminatedExtractor<D> + 'static,
    ) -> Self {
        self.terminated_extractor = Some(Box::new(extractor));
        self
    }

    #[must_use]
    pub fn truncated_extractor(mut self, extractor: impl TruncatedExtractor<D> + 'static) -> Self {
        self.truncated_extractor = Some(Box::new(extractor));
        self
    }

    #[must_use]
    pub fn info_extractor(mut self, extractor: impl InfoExtractor<D> + 'static) -> Self {
        self.info_extractor = Some(Box::new(extractor));
        self
    }

    /// # Errors
    ///
    /// Returns [`GymError::MissingCollaborator`] naming the first absent
    /// collaborator, or any error raised while generating the first
    /// episode.
    pub fn build(self) -> Result<Environment<D>, GymError> {
        fn require<T>(slot: Option<T>, name: &'static str) -> Result<T, GymError> {
            slot.ok_or(GymError::MissingCollaborator(name))
        }

        let parts = Collaborators {
            physical_parameters_generator: require(
                self.physical_parameters_generator,
                "physical parameters generator",
            )?,
            initial_state_generator: require(
                self.initial_state_generator,
                "initial state generator",
            )?,
            state_preprocessor: require(self.state_preprocessor, "state preprocessor")?,
            state_postprocessor: require(self.state_postprocessor, "state postprocessor")?,
            action_preprocessor: require(self.action_preprocessor, "action preprocessor")?,
            integrator: require(self.integrator, "integrator")?,
            time_span_calculator: require(self.time_span_calculator, "time span calculator")?,
            parameter_advance: require(self.parameter_advance, "parameter advance")?,
            observation_extractor: require(self.observation_extractor, "observation extractor")?,
            reward_extractor: require(self.reward_extractor, "reward extractor")?,
            terminated_extractor: require(self.terminated_extractor, "terminated extractor")?,
            truncated_extractor: require(self.truncated_extractor, "truncated extractor")?,
            info_extractor: require(self.info_extractor, "info extractor")?,
        };
        Environment::assemble(parts, self.seed)
    }
}
