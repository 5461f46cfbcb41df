//! Error types for parsing editor inputs.
//!
//! Editing itself never fails: malformed markup degrades to plain text and
//! bad command arguments are no-ops. These errors only cover turning strings
//! into typed editor values.

use thiserror::Error;

/// A string did not name any [`crate::FormatCommand`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown format command: {0}")]
pub struct UnknownCommand(pub String);

/// Errors from parsing a `block:offset` position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PositionParseError {
    /// No `:` between block and offset.
    #[error("expected `block:offset`, got {0:?}")]
    MissingSeparator(String),

    /// One side was not a non-negative integer.
    #[error("invalid position component: {0:?}")]
    InvalidNumber(String),
}
