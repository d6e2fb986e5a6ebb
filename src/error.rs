//! Error types for feedlist.

use thiserror::Error;

/// Common error type for feedlist.
#[derive(Error, Debug)]
pub enum FeedlistError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Feed document rendering error.
    #[error("render error: {0}")]
    Render(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for FeedlistError {
    fn from(e: sqlx::Error) -> Self {
        FeedlistError::Database(e.to_string())
    }
}

/// Result type alias for feedlist operations.
pub type Result<T> = std::result::Result<T, FeedlistError>;
