use rift_core::ValidationError;
use thiserror::Error;

/// Error type for the lane-coaching engine. A budget cutoff is not an
/// error; the search returns its best-so-far result instead.
#[derive(Debug, Error)]
pub enum CoachError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid search config: {0}")]
    InvalidConfig(String),

    #[error("computation invariant violated: {detail}")]
    Computation { detail: String },
}

impl CoachError {
    pub fn computation(detail: impl Into<String>) -> Self {
        CoachError::Computation {
            detail: detail.into(),
        }
    }
}
