//! Core error types

use thiserror::Error;

/// Selector parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector string was empty or whitespace only
    #[error("Empty selector")]
    Empty,

    /// The selector could not be parsed
    #[error("Invalid selector '{selector}' at column {column}: {message}")]
    Parse {
        /// The full selector text
        selector: String,
        /// Column (1-indexed) where parsing stopped
        column: usize,
        /// What the parser expected or found
        message: String,
    },
}

/// Result type for selector operations
pub type Result<T> = std::result::Result<T, SelectorError>;
