use thiserror::Error;

/// Errors loading a ranking snapshot.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("I/O error reading ranking snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("Failed to parse ranking snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid ranking entry: {0}")]
    InvalidEntry(String),
}
