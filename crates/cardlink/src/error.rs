//! Card link error types

use cardlink_core::SelectorError;
use thiserror::Error;

/// Errors raised while building a card link or loading its options
///
/// Event handling itself never fails; a gesture that cannot be resolved
/// to a destination is simply ignored.
#[derive(Error, Debug)]
pub enum CardLinkError {
    /// The link selector could not be parsed
    #[error("Invalid link selector: {0}")]
    InvalidSelector(#[from] SelectorError),

    /// Options are not valid TOML or have wrongly typed keys
    #[error("Invalid card link options: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for card link operations
pub type Result<T> = std::result::Result<T, CardLinkError>;
