use solver::SolverError;
use thiserror::Error;

/// Every failure the environment layer can report.
///
/// The variants fall into the taxonomy used throughout the crate:
/// configuration errors (raised while assembling an environment or its
/// generators), validation errors (raised while building records), and
/// integration failures forwarded from the solver. Out-of-range agent actions
/// are never errors; the action regulator clamps them.
#[derive(Error, Debug)]
pub enum GymError {
    #[error("environment is missing its {0}")]
    MissingCollaborator(&'static str),
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("fixed and sampled parameters overlap on {0:?}")]
    OverlappingKeys(Vec<String>),
    #[error("sampling strategy '{name}' is not implemented; known strategies: {known:?}")]
    UnknownDistribution { name: String, known: Vec<String> },
    #[error("sampling strategy '{distribution}' requires keys {required:?}, got {provided:?}")]
    MissingSamplingKeys {
        distribution: String,
        required: Vec<String>,
        provided: Vec<String>,
    },
    #[error("required parameter '{0}' is neither fixed nor sampled")]
    MissingParameter(String),
    #[error("{record} expects {expected} values, got {got}")]
    ArrayLength {
        record: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("invalid value {value} for field '{field}': {reason}")]
    InvalidField {
        field: String,
        value: f64,
        reason: &'static str,
    },
    #[error("state sub-records share field names {0:?}")]
    OverlappingFields(Vec<String>),
    #[error("invalid space: {0}")]
    InvalidSpace(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Integration(#[from] SolverError),
}

impl GymError {
    /// Raised while assembling an environment or one of its generators.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCollaborator(_)
                | Self::Configuration(_)
                | Self::OverlappingKeys(_)
                | Self::UnknownDistribution { .. }
                | Self::MissingSamplingKeys { .. }
                | Self::MissingParameter(_)
                | Self::InvalidSpace(_)
                | Self::Json(_)
                | Self::Integration(SolverError::InvalidConfig(_))
        )
    }

    /// Raised while building a record, a state, or an action.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ArrayLength { .. } | Self::InvalidField { .. } | Self::OverlappingFields(_)
        )
    }
}
