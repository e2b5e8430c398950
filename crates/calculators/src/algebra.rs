//! Quadratic equation solver

use crate::calculator::{Calculator, ValidationResult};
use crate::catalog::CalculatorId;
use crate::error::{CalcError, CalcResult};
use crate::record::{number, Primitive, Record};

/// Solves `a·x² + b·x + c = 0` over the reals.
///
/// With `a = 0` the equation degrades to the linear case.
#[derive(Debug, Clone, Copy, Default)]
pub struct Algebra;

impl Calculator for Algebra {
    fn id(&self) -> CalculatorId {
        CalculatorId::Algebra
    }

    fn validate(&self, inputs: &Record) -> ValidationResult {
        let mut errors = Vec::new();
        for field in ["a", "b", "c"] {
            ValidationResult::require_number(&mut errors, inputs, field, false);
        }
        ValidationResult::from_errors(errors)
    }

    fn compute(&self, inputs: &Record) -> CalcResult<Record> {
        let a = number(inputs, "a")?;
        let b = number(inputs, "b")?;
        let c = number(inputs, "c")?;

        let mut out = Record::new();
        if a == 0.0 {
            if b == 0.0 {
                return Err(CalcError::Domain("a and b cannot both be zero".into()));
            }
            out.insert("rootCount".into(), Primitive::Number(1.0));
            out.insert("root1".into(), Primitive::Number(-c / b));
            return Ok(out);
        }

        let discriminant = b * b - 4.0 * a * c;
        out.insert("discriminant".into(), Primitive::Number(discriminant));

        if discriminant > 0.0 {
            let sqrt = discriminant.sqrt();
            out.insert("rootCount".into(), Primitive::Number(2.0));
            out.insert("root1".into(), Primitive::Number((-b + sqrt) / (2.0 * a)));
            out.insert("root2".into(), Primitive::Number((-b - sqrt) / (2.0 * a)));
        } else if discriminant == 0.0 {
            out.insert("rootCount".into(), Primitive::Number(1.0));
            out.insert("root1".into(), Primitive::Number(-b / (2.0 * a)));
        } else {
            out.insert("rootCount".into(), Primitive::Number(0.0));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record;

    fn solve(a: f64, b: f64, c: f64) -> CalcResult<Record> {
        Algebra.compute(&record([("a", a), ("b", b), ("c", c)]))
    }

    #[test]
    fn test_two_roots() {
        let out = solve(1.0, -3.0, 2.0).unwrap();
        assert_eq!(out["rootCount"], Primitive::Number(2.0));
        assert_eq!(out["root1"], Primitive::Number(2.0));
        assert_eq!(out["root2"], Primitive::Number(1.0));
    }

    #[test]
    fn test_double_and_no_root() {
        let out = solve(1.0, 2.0, 1.0).unwrap();
        assert_eq!(out["root1"], Primitive::Number(-1.0));
        assert!(!out.contains_key("root2"));

        let out = solve(1.0, 0.0, 1.0).unwrap();
        assert_eq!(out["rootCount"], Primitive::Number(0.0));
    }

    #[test]
    fn test_linear_and_degenerate() {
        let out = solve(0.0, 2.0, -4.0).unwrap();
        assert_eq!(out["root1"], Primitive::Number(2.0));
        assert!(matches!(solve(0.0, 0.0, 1.0), Err(CalcError::Domain(_))));
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        let result = Algebra.validate(&record([("a", 1.0)]));
        assert!(!result.is_valid);
        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["b", "c"]);
    }
}
