use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
/// Error type for request validation. Every variant is raised before any
/// simulation or search work starts; there are no partial results.
pub enum ValidationError {
    #[error("{side} draft must contain exactly 5 picks, got {count}")]
    WrongPickCount { side: String, count: usize },

    #[error("{side} draft assigns role '{role}' more than once")]
    DuplicateRole { side: String, role: String },

    #[error("unknown champion id '{champion}'")]
    UnknownChampion { champion: String },

    #[error("unknown value '{value}' for {field}")]
    UnknownValue { field: &'static str, value: String },

    #[error("{field} must be within [0, 100], got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },

    #[error("{field} must be >= 0, got {value}")]
    NegativeCooldown { field: &'static str, value: f64 },

    #[error("{field} must be a positive finite value, got {value}")]
    NonPositivePool { field: &'static str, value: f64 },

    #[error("{field} must be within [1, 18], got {value}")]
    LevelOutOfRange { field: &'static str, value: u32 },

    #[error("{field} must be greater than 0")]
    ZeroBudget { field: &'static str },
}
