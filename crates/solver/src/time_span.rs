use serde::{Deserialize, Serialize};

/// One integration interval `[start_time, end_time]`.
///
/// A `TimeSpan` is a plain value: it is never mutated after creation and the
/// environment builds a fresh one for every step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start_time: f64,
    pub end_time: f64,
}

impl TimeSpan {
    #[must_use]
    pub const fn new(start_time: f64, end_time: f64) -> Self {
        Self { start_time, end_time }
    }

    /// Span starting at `start_time` and lasting `duration`.
    #[must_use]
    pub fn starting_at(start_time: f64, duration: f64) -> Self {
        Self::new(start_time, start_time + duration)
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}
