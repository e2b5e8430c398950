//! The calculator contract

use crate::catalog::CalculatorId;
use crate::error::CalcResult;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A validation problem with one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Outcome of [`Calculator::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Require `field` to be present and numeric, and above zero if `positive`.
    pub(crate) fn require_number(
        errors: &mut Vec<FieldError>,
        inputs: &Record,
        field: &str,
        positive: bool,
    ) {
        let message = match inputs.get(field).map(|v| v.as_number()) {
            None => "is required",
            Some(None) => "must be a number",
            Some(Some(n)) if !n.is_finite() => "must be finite",
            Some(Some(n)) if positive && n <= 0.0 => "must be greater than zero",
            Some(Some(_)) => return,
        };
        errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}

/// A loaded calculator module.
///
/// `compute` must be pure: the same inputs always produce the same outputs.
/// The caching layer relies on this and never inspects the implementation.
pub trait Calculator: Send + Sync + Debug {
    fn id(&self) -> CalculatorId;

    fn compute(&self, inputs: &Record) -> CalcResult<Record>;

    /// Check inputs before computing. Accepts everything by default.
    fn validate(&self, _inputs: &Record) -> ValidationResult {
        ValidationResult::valid()
    }
}
