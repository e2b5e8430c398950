//! Sum of all numeric inputs

use crate::calculator::Calculator;
use crate::catalog::CalculatorId;
use crate::error::CalcResult;
use crate::record::{Primitive, Record};

/// Adds every numeric field; non-numeric fields are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl Calculator for Sum {
    fn id(&self) -> CalculatorId {
        CalculatorId::Sum
    }

    fn compute(&self, inputs: &Record) -> CalcResult<Record> {
        let numbers: Vec<f64> = inputs
            .values()
            .filter_map(Primitive::as_number)
            .filter(|n| n.is_finite())
            .collect();

        let mut out = Record::new();
        out.insert("total".into(), Primitive::Number(numbers.iter().sum()));
        out.insert("count".into(), Primitive::Number(numbers.len() as f64));
        Ok(out)
    }
}
