//! Error types for sayit

use std::io;
use thiserror::Error;

/// Main error type for sayit
#[derive(Error, Debug)]
pub enum SayitError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for sayit operations
pub type Result<T> = std::result::Result<T, SayitError>;

impl From<reqwest::Error> for SayitError {
    fn from(e: reqwest::Error) -> Self {
        SayitError::Network(e.to_string())
    }
}
