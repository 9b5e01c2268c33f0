//! Error types for bookcal.

use thiserror::Error;

/// Errors that can occur in bookcal operations.
///
/// Domain refusals (an illegal working-hours mutation, say) are not errors:
/// those APIs report applied/not-applied instead.
#[derive(Error, Debug)]
pub enum BookCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    DateParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for bookcal operations.
pub type BookCalResult<T> = Result<T, BookCalError>;
