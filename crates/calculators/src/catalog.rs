//! Static identifier table for the built-in calculators

use crate::algebra::Algebra;
use crate::calculator::Calculator;
use crate::finance::{CompoundInterest, Mortgage};
use crate::health::Bmi;
use crate::sum::Sum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Identifier of a built-in calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculatorId {
    Algebra,
    Bmi,
    CompoundInterest,
    Mortgage,
    Sum,
}

/// The identifier is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown calculator: {0}")]
pub struct UnknownCalculator(pub String);

impl CalculatorId {
    pub const ALL: [CalculatorId; 5] = [
        Self::Algebra,
        Self::Bmi,
        Self::CompoundInterest,
        Self::Mortgage,
        Self::Sum,
    ];

    /// Kebab-case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Algebra => "algebra",
            Self::Bmi => "bmi",
            Self::CompoundInterest => "compound-interest",
            Self::Mortgage => "mortgage",
            Self::Sum => "sum",
        }
    }

    /// Content category the calculator is listed under.
    pub fn category(self) -> &'static str {
        match self {
            Self::Algebra | Self::Sum => "math",
            Self::Bmi => "health",
            Self::CompoundInterest | Self::Mortgage => "financial",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Algebra => "Quadratic Equation Solver",
            Self::Bmi => "BMI Calculator",
            Self::CompoundInterest => "Compound Interest Calculator",
            Self::Mortgage => "Mortgage Payment Calculator",
            Self::Sum => "Sum Calculator",
        }
    }

    /// Construct the calculator implementation.
    pub fn instantiate(self) -> Arc<dyn Calculator> {
        match self {
            Self::Algebra => Arc::new(Algebra),
            Self::Bmi => Arc::new(Bmi),
            Self::CompoundInterest => Arc::new(CompoundInterest),
            Self::Mortgage => Arc::new(Mortgage),
            Self::Sum => Arc::new(Sum),
        }
    }
}

impl FromStr for CalculatorId {
    type Err = UnknownCalculator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownCalculator(s.to_string()))
    }
}

impl fmt::Display for CalculatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
