// Typed errors with thiserror. Configuration problems surface at construction time;
// per-frame evaluation is total and never returns an error for a validated table.

use thiserror::Error;

/// Timeline engine error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid spring config `{name}`: {message}")]
    InvalidSpring { name: String, message: String },

    #[error("Invalid interpolation range: {0}")]
    InvalidRange(String),

    #[error("Unknown scene: {0}")]
    UnknownScene(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TimelineError {
    fn from(err: serde_json::Error) -> Self {
        TimelineError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TimelineError>;
