use std::io;

use thiserror::Error;

/// Unified error type for the smget engine.
///
/// Per-key conditions (missing keys, trimmed collections) are not errors;
/// they are reported as data in [`MergedResult`](crate::merge::MergedResult).
#[derive(Debug, Error)]
pub enum Error {
    /// A BKey failed validation at construction or parse time.
    #[error("invalid bkey: {0}")]
    InvalidBKey(String),
    /// An element flag failed validation.
    #[error("invalid eflag: {0}")]
    InvalidEFlag(String),
    /// An element flag filter was built with inconsistent operands.
    #[error("invalid eflag filter: {0}")]
    InvalidFilter(String),
    /// Integer and byte BKeys were compared or mixed in one query.
    #[error("bkey type mismatch: {left} vs {right}")]
    KeyTypeMismatch {
        left: &'static str,
        right: &'static str,
    },
    /// The smget request parameters are invalid.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    /// Merge options could not be parsed.
    #[error("config error: {0}")]
    Config(String),
    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;
