//! Calculators
//!
//! The compute/validate contract shared by every calculator module, the
//! static table of built-in calculator identifiers, and their
//! implementations.
//!
//! Calculators map a [`Record`] of primitive inputs to a `Record` of
//! outputs. They are pure functions: the runtime caches their results by
//! input and never looks inside them.
//!
//! # Example
//!
//! ```rust
//! use calculators::{record, Calculator, CalculatorId, Primitive};
//!
//! let bmi = CalculatorId::Bmi.instantiate();
//! let out = bmi.compute(&record([("weightKg", 70.0), ("heightCm", 175.0)])).unwrap();
//! assert_eq!(out["category"], Primitive::from("Normal"));
//! ```

mod algebra;
mod calculator;
mod catalog;
mod error;
mod finance;
mod health;
mod record;
mod sum;

pub use algebra::Algebra;
pub use calculator::{Calculator, FieldError, ValidationResult};
pub use catalog::{CalculatorId, UnknownCalculator};
pub use error::{CalcError, CalcResult};
pub use finance::{CompoundInterest, Mortgage};
pub use health::Bmi;
pub use record::{number, number_or, record, Primitive, Record};
pub use sum::Sum;
