//! Primitive input and output records

use crate::error::{CalcError, CalcResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single form value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Primitive {
    /// Numeric view of the value. Text holding a number is accepted, since
    /// form fields often arrive as strings.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Primitive {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Primitive {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Primitive {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Primitive {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl FromStr for Primitive {
    type Err = std::convert::Infallible;

    /// Booleans and numbers are recognized; anything else is text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => match s.parse::<f64>() {
                Ok(n) if n.is_finite() => Self::Number(n),
                _ => Self::Text(s.to_string()),
            },
        })
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Named primitive values, ordered by field name.
pub type Record = BTreeMap<String, Primitive>;

/// Build a record from `(field, value)` pairs.
pub fn record<I, K, V>(fields: I) -> Record
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Primitive>,
{
    fields
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Read a required numeric field.
pub fn number(inputs: &Record, field: &str) -> CalcResult<f64> {
    let value = inputs
        .get(field)
        .ok_or_else(|| CalcError::MissingInput(field.to_string()))?;
    let n = value
        .as_number()
        .ok_or_else(|| CalcError::invalid(field, "expected a number"))?;
    if n.is_finite() {
        Ok(n)
    } else {
        Err(CalcError::invalid(field, "must be finite"))
    }
}

/// Read an optional numeric field, falling back to `default` when absent.
pub fn number_or(inputs: &Record, field: &str, default: f64) -> CalcResult<f64> {
    if inputs.contains_key(field) {
        number(inputs, field)
    } else {
        Ok(default)
    }
}
