use crate::{BoxSpace, Domain, Environment, GymError, Info, StepResult};

/// Reinforcement learning environment trait.
///
/// The two-method protocol training loops drive: [`reset`] starts an episode
/// and returns the first observation, and each [`step`] advances the
/// simulation by one action. Observations and actions are flat `f64`
/// arrays inside the declared [`BoxSpace`]s.
///
/// [`reset`]: Env::reset
/// [`step`]: Env::step
pub trait Env {
    /// Start a new episode and return `(observation, info)`.
    ///
    /// # Errors
    ///
    /// Returns an error when the episode cannot be generated.
    fn reset(&mut self, seed: Option<u64>, options: Option<&Info>)
        -> Result<(Vec<f64>, Info), GymError>;

    /// Advance the environment by one action.
    ///
    /// # Errors
    ///
    /// Returns an error when the step cannot be carried out.
    fn step(&mut self, action: &[f64]) -> Result<StepResult, GymError>;

    fn observation_space(&self) -> &BoxSpace;

    fn action_space(&self) -> &BoxSpace;
}

impl<D: Domain> Env for Environment<D> {
    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&Info>,
    ) -> Result<(Vec<f64>, Info), GymError> {
        Environment::reset(self, seed, options)
    }

    fn step(&mut self, action: &[f64]) -> Result<StepResult, GymError> {
        Environment::step(self, action)
    }

    fn observation_space(&self) -> &BoxSpace {
        Environment::observation_space(self)
    }

    fn action_space(&self) -> &BoxSpace {
        Environment::action_space(self)
    }
}
