//! Error types for devscripts

use thiserror::Error;

/// Result type alias for devscripts operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in devscripts operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid hex digit {ch:?} at position {position}")]
    InvalidHexDigit { ch: char, position: usize },

    #[error("Line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Pattern not found: {0}")]
    PatternNotFound(String),

    #[error("Config error: {0}")]
    Config(String),
}
