//! Error types for calculator computations.

use thiserror::Error;

/// Errors a calculator can report from `compute`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// A required input field is absent
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// An input field has the wrong type or an unusable value
    #[error("Invalid input '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// The inputs are well-formed but have no defined result
    #[error("No solution: {0}")]
    Domain(String),
}

impl CalcError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for calculator operations.
pub type CalcResult<T> = Result<T, CalcError>;
