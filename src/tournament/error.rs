use thiserror::Error;

/// Errors that can occur while building or running a tournament
#[derive(Debug, Error)]
pub enum TournamentError {
    /// The tournament can't be played as configured. Nothing is simulated
    /// for the group or bracket that failed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The match model produced a score that can't exist. This is a bug in
    /// the model, not a problem with the input.
    #[error("Invalid match result: {0}")]
    InvalidMatchResult(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("Failed to serialize JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}

impl TournamentError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        TournamentError::Configuration(msg.into())
    }
}

/// Result type for tournament operations
pub type Result<T> = std::result::Result<T, TournamentError>;
