//! Error types for order-event replay.
//!
//! Errors are layered to match the recovery policy at each stage:
//! `ParseError` is per-line and always recoverable (report and skip),
//! `ApplyError` is per-event and recoverable at the driver's discretion,
//! and `ReplayError` is the top-level type the driver and collaborators
//! return.

use thiserror::Error;

/// Result type alias for replay operations.
pub type Result<T> = std::result::Result<T, ReplayError>;

/// A raw input line failed to parse into an `OrderEvent`.
///
/// Parse errors never abort a replay: the driver records a diagnostic for
/// the offending line and continues with the next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Operation code is not one of `A`, `D`, `M`.
    #[error("unknown operation {0:?} - skipping")]
    UnknownOperation(String),

    /// Record has the wrong number of fields for its operation.
    #[error("expected {expected} fields, found {found}")]
    Truncated { expected: usize, found: usize },

    /// A numeric field (order id, size, price) failed to parse.
    #[error("invalid number in field {field:?}: {value:?}")]
    InvalidNumber {
        field: &'static str,
        value: String,
    },

    /// Side is not `B` or `S`.
    #[error("invalid side: {0:?}")]
    InvalidSide(String),
}

/// An event could not be applied to the book.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// A Delete or Modify referenced an order id with no prior Add.
    ///
    /// Applying such an event against an empty history record would
    /// silently corrupt the aggregates, so it fails loudly instead.
    #[error("unknown order id: {0}")]
    UnknownOrder(u64),
}

/// Top-level error for the replay driver and its collaborators.
#[derive(Error, Debug)]
pub enum ReplayError {
    /// A line failed to parse.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// An event failed to apply.
    #[error("apply error: {0}")]
    Apply(#[from] ApplyError),

    /// The line source failed (file not found, read error).
    #[error("source error: {0}")]
    Source(String),

    /// I/O failure in a sink or exporter.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReplayError {
    /// Create a source error from any string-like type.
    pub fn source(msg: impl Into<String>) -> Self {
        ReplayError::Source(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::UnknownOperation("X".to_string());
        assert_eq!(err.to_string(), "unknown operation \"X\" - skipping");

        let err = ParseError::Truncated {
            expected: 6,
            found: 4,
        };
        assert_eq!(err.to_string(), "expected 6 fields, found 4");
    }

    #[test]
    fn test_apply_error_display() {
        let err = ApplyError::UnknownOrder(42);
        assert_eq!(err.to_string(), "unknown order id: 42");
    }

    #[test]
    fn test_conversions() {
        let err: ReplayError = ParseError::InvalidSide("Q".to_string()).into();
        assert!(matches!(err, ReplayError::Parse(_)));

        let err: ReplayError = ApplyError::UnknownOrder(1).into();
        assert!(matches!(err, ReplayError::Apply(_)));
    }
}
