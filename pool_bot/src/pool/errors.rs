//! Card-list format errors.

use thiserror::Error;

/// Malformed pack text. The input is corrupt; retrying will not help.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Line has no space between the count and the card name
    #[error("Line {line}: expected \"<count> <name>\", got {text:?}")]
    MissingSeparator { line: usize, text: String },

    /// Count token is not a positive integer
    #[error("Line {line}: invalid card count {count:?}")]
    InvalidCount { line: usize, count: String },

    /// Nothing left of the card name once the set code is stripped
    #[error("Line {line}: empty card name")]
    EmptyName { line: usize },
}

/// Result type for card-list decoding
pub type FormatResult<T> = Result<T, FormatError>;
