//! Decode error types

use std::fmt;

/// Why a raw queue entry could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Timestamp does not match `YYYY-MM-DD HH:MM:SS`
    BadTimestamp,
    /// Status is not `0` or `1`
    BadStatus,
    /// Combined list entry does not split into exactly two fields
    BadArity,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::BadTimestamp => write!(f, "bad timestamp"),
            DecodeErrorKind::BadStatus => write!(f, "bad status"),
            DecodeErrorKind::BadArity => write!(f, "bad arity"),
        }
    }
}

/// A raw entry that failed to decode, with the offending payload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot decode queue entry '{raw}': {kind}: {detail}")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    /// The complete raw entry as it was read from the queue
    pub raw: String,
    pub detail: String,
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind, raw: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
            detail: detail.into(),
        }
    }
}

impl crate::core::error_handling::ContextualError for DecodeError {
    fn is_user_actionable(&self) -> bool {
        false // Bad data comes from producers, not from the operator
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;
