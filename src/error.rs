//! # Ephemeris Errors
//!
//! Only argument validation is fallible in the astronomical core. Degenerate
//! astronomy (polar day, polar night, a moon that never crosses the horizon)
//! is reported through flags on the result types, never through this enum.

use thiserror::Error;

/// Errors raised synchronously by the ephemeris core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    /// A coordinate or instant was NaN or infinite.
    #[error("{name} missing or not finite (got {value})")]
    InvalidArgument {
        /// Which argument was rejected ("latitude", "longitude", ...)
        name: &'static str,
        /// The offending value
        value: f64,
    },

    /// A computed millisecond timestamp can't be represented as a `DateTime`.
    #[error("timestamp {0} ms is outside the representable range")]
    TimestampOutOfRange(f64),
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, EphemerisError>;

/// Reject NaN and infinities for a named argument.
pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EphemerisError::InvalidArgument { name, value })
    }
}
