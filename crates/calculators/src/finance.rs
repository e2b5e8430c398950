//! Loan and savings calculators

use crate::calculator::{Calculator, ValidationResult};
use crate::catalog::CalculatorId;
use crate::error::{CalcError, CalcResult};
use crate::record::{number, number_or, Primitive, Record};

/// Fixed-rate mortgage payment.
///
/// Inputs: `principal`, `annualRate` (percent), `years`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mortgage;

impl Calculator for Mortgage {
    fn id(&self) -> CalculatorId {
        CalculatorId::Mortgage
    }

    fn validate(&self, inputs: &Record) -> ValidationResult {
        let mut errors = Vec::new();
        ValidationResult::require_number(&mut errors, inputs, "principal", true);
        ValidationResult::require_number(&mut errors, inputs, "annualRate", false);
        ValidationResult::require_number(&mut errors, inputs, "years", true);
        ValidationResult::from_errors(errors)
    }

    fn compute(&self, inputs: &Record) -> CalcResult<Record> {
        let principal = number(inputs, "principal")?;
        let annual_rate = number(inputs, "annualRate")?;
        let years = number(inputs, "years")?;
        if years <= 0.0 {
            return Err(CalcError::invalid("years", "must be greater than zero"));
        }
        if annual_rate < 0.0 {
            return Err(CalcError::invalid("annualRate", "cannot be negative"));
        }

        let payments = (years * 12.0).round();
        if payments < 1.0 {
            return Err(CalcError::invalid("years", "must cover at least one monthly payment"));
        }
        let monthly_rate = annual_rate / 100.0 / 12.0;
        let monthly_payment = if monthly_rate == 0.0 {
            principal / payments
        } else {
            let growth = (1.0 + monthly_rate).powf(payments);
            principal * monthly_rate * growth / (growth - 1.0)
        };
        let total_paid = monthly_payment * payments;

        let mut out = Record::new();
        out.insert("monthlyPayment".into(), Primitive::Number(round2(monthly_payment)));
        out.insert("totalPaid".into(), Primitive::Number(round2(total_paid)));
        out.insert("totalInterest".into(), Primitive::Number(round2(total_paid - principal)));
        Ok(out)
    }
}

/// Future value of a principal under periodic compounding.
///
/// Inputs: `principal`, `annualRate` (percent), `years`, optional
/// `compoundsPerYear` (default 12).
#[derive(Debug, Clone, Copy, Default)]
pub struct CompoundInterest;

impl Calculator for CompoundInterest {
    fn id(&self) -> CalculatorId {
        CalculatorId::CompoundInterest
    }

    fn validate(&self, inputs: &Record) -> ValidationResult {
        let mut errors = Vec::new();
        ValidationResult::require_number(&mut errors, inputs, "principal", true);
        ValidationResult::require_number(&mut errors, inputs, "annualRate", false);
        ValidationResult::require_number(&mut errors, inputs, "years", true);
        if inputs.contains_key("compoundsPerYear") {
            ValidationResult::require_number(&mut errors, inputs, "compoundsPerYear", true);
        }
        ValidationResult::from_errors(errors)
    }

    fn compute(&self, inputs: &Record) -> CalcResult<Record> {
        let principal = number(inputs, "principal")?;
        let rate = number(inputs, "annualRate")? / 100.0;
        let years = number(inputs, "years")?;
        let periods = number_or(inputs, "compoundsPerYear", 12.0)?;
        if periods <= 0.0 {
            return Err(CalcError::invalid("compoundsPerYear", "must be greater than zero"));
        }

        let future_value = principal * (1.0 + rate / periods).powf(periods * years);

        let mut out = Record::new();
        out.insert("futureValue".into(), Primitive::Number(round2(future_value)));
        out.insert("interestEarned".into(), Primitive::Number(round2(future_value - principal)));
        Ok(out)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record;

    #[test]
    fn test_mortgage_payment() {
        let inputs = record([("principal", 200_000.0), ("annualRate", 6.0), ("years", 30.0)]);
        let out = Mortgage.compute(&inputs).unwrap();
        assert_eq!(out["monthlyPayment"], Primitive::Number(1199.1));
    }

    #[test]
    fn test_mortgage_zero_rate() {
        let inputs = record([("principal", 12_000.0), ("annualRate", 0.0), ("years", 1.0)]);
        let out = Mortgage.compute(&inputs).unwrap();
        assert_eq!(out["monthlyPayment"], Primitive::Number(1000.0));
        assert_eq!(out["totalInterest"], Primitive::Number(0.0));
    }

    #[test]
    fn test_mortgage_term_shorter_than_one_payment() {
        for rate in [0.0, 5.0] {
            let inputs = record([("principal", 1000.0), ("annualRate", rate), ("years", 0.01)]);
            assert!(Mortgage.validate(&inputs).is_valid);
            let result = Mortgage.compute(&inputs);
            assert!(matches!(
                result,
                Err(CalcError::InvalidInput { ref field, .. }) if field == "years"
            ));
        }
    }

    #[test]
    fn test_mortgage_validation() {
        let inputs = record([("principal", -1.0), ("annualRate", 5.0)]);
        let result = Mortgage.validate(&inputs);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].field, "principal");
        assert_eq!(result.errors[1].message, "is required");
    }

    #[test]
    fn test_compound_interest_annual() {
        let inputs = record([
            ("principal", 1000.0),
            ("annualRate", 10.0),
            ("years", 2.0),
            ("compoundsPerYear", 1.0),
        ]);
        let out = CompoundInterest.compute(&inputs).unwrap();
        assert_eq!(out["futureValue"], Primitive::Number(1210.0));
        assert_eq!(out["interestEarned"], Primitive::Number(210.0));
    }

    #[test]
    fn test_compound_interest_default_periods() {
        let inputs = record([("principal", 1000.0), ("annualRate", 0.0), ("years", 5.0)]);
        let out = CompoundInterest.compute(&inputs).unwrap();
        assert_eq!(out["futureValue"], Primitive::Number(1000.0));
    }
}
