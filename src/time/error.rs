//! Time error type.

use thiserror::Error;

/// Result alias for time operations.
pub type TimeResult<T> = Result<T, TimeError>;

/// Error type for duration parsing and temporal arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// Text is not an ISO-8601 duration.
    #[error("cannot parse {text:?} as a duration: {reason}")]
    Parse {
        /// The rejected text.
        text: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// Text is not an RFC 3339 instant.
    #[error("cannot parse {text:?} as an instant: {source}")]
    InvalidInstant {
        /// The rejected text.
        text: String,
        /// The chrono parse error.
        source: chrono::ParseError,
    },

    /// The end point cannot be expressed in the kind of the start point.
    #[error("cannot measure from a {start} to a {end}")]
    IncompatibleTemporal {
        /// Kind of the start point.
        start: &'static str,
        /// Kind of the end point.
        end: &'static str,
    },

    /// The result does not fit the target type.
    #[error("arithmetic overflow")]
    Overflow,
}
