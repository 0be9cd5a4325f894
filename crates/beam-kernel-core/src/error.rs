//! Error types for the Beam Kernel Core.

use thiserror::Error;

/// Core errors that can occur while encoding, decoding or parsing beams.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("invalid beam identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("unknown beam status: {0}")]
    UnknownStatus(u64),
}

/// Structural errors in a beam message, detected before any state is read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} exceeds maximum length of {max} bytes")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("malformed beam id: {0:?}")]
    MalformedId(String),

    #[error("page limit {limit} outside 1..={max}")]
    InvalidLimit { limit: usize, max: usize },
}

