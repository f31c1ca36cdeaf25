//! Error types for the formparse-core library.

use thiserror::Error;

/// Main error type for the formparse library.
#[derive(Error, Debug)]
pub enum FormparseError {
    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// The template definition could not be decoded.
    #[error("definition error: {0}")]
    Definition(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_yaml::Error> for FormparseError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Definition(err.to_string())
    }
}

impl From<serde_json::Error> for FormparseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Definition(err.to_string())
    }
}

/// Errors related to field extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The input text is empty.
    #[error("Text parameter is empty.")]
    EmptyText,

    /// The input value is not a string.
    #[error("Text parameter is not a string.")]
    NotText,

    /// A pattern failed to compile.
    #[error("{message}")]
    Pattern { pattern: String, message: String },
}

impl ExtractionError {
    /// Build a pattern error from a regex compile failure.
    pub fn pattern(pattern: &str, err: &regex::Error) -> Self {
        Self::Pattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        }
    }

    /// Whether the error is a precondition failure of the whole call.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::EmptyText | Self::NotText)
    }
}

/// Result type for the formparse library.
pub type Result<T> = std::result::Result<T, FormparseError>;
