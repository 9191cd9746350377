use thiserror::Error;

use rift_core::ValidationError;

#[derive(Debug, Error)]
/// Error type for the outcome model and match simulator.
///
/// Budget exhaustion is deliberately absent: partial work is never an error
/// in this crate. Malformed requests fail fast as `Validation`; a violated
/// internal invariant fails the whole request as `Computation`.
pub enum SimError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("computation invariant violated: {detail}")]
    Computation { detail: String },
}

impl SimError {
    pub fn computation(detail: impl Into<String>) -> Self {
        SimError::Computation {
            detail: detail.into(),
        }
    }
}
