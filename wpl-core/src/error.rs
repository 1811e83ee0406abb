//! Error types for the planner.

use thiserror::Error;

/// Errors that can occur in planner operations.
#[derive(Error, Debug)]
pub enum WplError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDateKey(String),

    #[error("Event title must not be empty")]
    EmptyTitle,

    #[error("Unknown role '{0}'. Expected 'coach' or 'athlete'")]
    UnknownRole(String),

    #[error("Only coaches can change the team calendar")]
    NotCoach,

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for WplError {
    fn from(err: reqwest::Error) -> Self {
        WplError::Remote(err.to_string())
    }
}

/// Result type alias for planner operations.
pub type WplResult<T> = Result<T, WplError>;
