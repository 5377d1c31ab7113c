//! Domain hooks called by the step algorithm around the integrator.

use solver::TimeSpan;

use crate::{Domain, GymError, StateOf};

/// Chooses the interval the next step integrates over.
///
/// Receives the committed state, before any state preprocessing.
pub trait TimeSpanCalculator<D: Domain> {
    /// # Errors
    ///
    /// Implementations report their own failures; the step is aborted.
    fn calculate_time_span(
        &self,
        current_time: f64,
        state: &StateOf<D>,
    ) -> Result<TimeSpan, GymError>;
}

/// `[t, t + duration]`, regardless of state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedDurationTimeSpan {
    duration: f64,
}

impl FixedDurationTimeSpan {
    /// # Errors
    ///
    /// Returns [`GymError::Configuration`] unless `duration` is finite and
    /// positive.
    pub fn new(duration: f64) -> Result<Self, GymError> {
        if duration.is_finite() && duration > 0.0 {
            Ok(Self { duration })
        } else {
            Err(GymError::Configuration(format!(
                "step duration must be positive and finite, got {duration}"
            )))
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}

impl<D: Domain> TimeSpanCalculator<D> for FixedDurationTimeSpan {
    fn calculate_time_span(
        &self,
        current_time: f64,
        _state: &StateOf<D>,
    ) -> Result<TimeSpan, GymError> {
        Ok(TimeSpan::starting_at(current_time, self.duration))
    }
}

/// Advances the parameters the integrator does not evolve.
///
/// Both methods see the preprocessed state of the current step, not the
/// integrated one.
pub trait ParameterAdvance<D: Domain> {
    /// # Errors
    ///
    /// Implementations report their own failures; the step is aborted.
    fn next_dae_params(&self, state: &StateOf<D>) -> Result<D::DaeParameters, GymError>;

    /// # Errors
    ///
    /// Implementations report their own failures; the step is aborted.
    fn next_non_dae_params(&self, state: &StateOf<D>) -> Result<D::NonDaeParameters, GymError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_durations() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(FixedDurationTimeSpan::new(bad).unwrap_err().is_configuration());
        }
        assert_eq!(FixedDurationTimeSpan::new(2.5).unwrap().duration(), 2.5);
    }
}
