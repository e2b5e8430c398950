//! Body mass index

use crate::calculator::{Calculator, ValidationResult};
use crate::catalog::CalculatorId;
use crate::error::{CalcError, CalcResult};
use crate::record::{number, Primitive, Record};

/// BMI from `weightKg` and `heightCm`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bmi;

impl Bmi {
    /// WHO adult weight category.
    pub fn category(bmi: f64) -> &'static str {
        if bmi < 18.5 {
            "Underweight"
        } else if bmi < 25.0 {
            "Normal"
        } else if bmi < 30.0 {
            "Overweight"
        } else {
            "Obese"
        }
    }
}

impl Calculator for Bmi {
    fn id(&self) -> CalculatorId {
        CalculatorId::Bmi
    }

    fn validate(&self, inputs: &Record) -> ValidationResult {
        let mut errors = Vec::new();
        ValidationResult::require_number(&mut errors, inputs, "weightKg", true);
        ValidationResult::require_number(&mut errors, inputs, "heightCm", true);
        ValidationResult::from_errors(errors)
    }

    fn compute(&self, inputs: &Record) -> CalcResult<Record> {
        let weight = number(inputs, "weightKg")?;
        let height_m = number(inputs, "heightCm")? / 100.0;
        if height_m <= 0.0 {
            return Err(CalcError::invalid("heightCm", "must be greater than zero"));
        }

        let bmi = (weight / (height_m * height_m) * 10.0).round() / 10.0;

        let mut out = Record::new();
        out.insert("bmi".into(), Primitive::Number(bmi));
        out.insert("category".into(), Primitive::from(Self::category(bmi)));
        Ok(out)
    }
}
