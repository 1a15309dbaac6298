//! Error types for the gather crate.

use thiserror::Error;

/// Errors that can occur when building queries or aggregating values.
///
/// Missing attributes, empty inputs and unsupported container shapes are
/// not errors: they surface as `false`, `None` or an empty result.
#[derive(Debug, Error)]
pub enum GatherError {
    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A number was required but the value is of another kind.
    #[error("expected a numeric value, got {kind}")]
    NotNumeric { kind: &'static str },

    /// Two numbers whose kinds cannot be reconciled for comparison.
    #[error("cannot compare {field} value with {literal} value")]
    Incomparable {
        field: &'static str,
        literal: &'static str,
    },
}

/// Result type for gather operations.
pub type Result<T> = std::result::Result<T, GatherError>;
