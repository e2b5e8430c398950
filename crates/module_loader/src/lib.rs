//! Calculator Module Loading
//!
//! On-demand loading of calculator modules and the runtime that executes
//! them:
//! - [`ModuleRegistry`]: static identifier → async factory table
//! - [`ModuleLoader`]: single-flight loader with a process-lifetime cache
//! - [`CalculatorRuntime`]: validates inputs, consults the per-calculator
//!   result cache and times each computation
//!
//! # Example
//!
//! ```rust
//! use calculators::{record, Primitive};
//! use module_loader::{CalculatorRuntime, ModuleRegistry};
//! use perf::SharedConfig;
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let runtime = CalculatorRuntime::new(ModuleRegistry::builtin(), SharedConfig::default());
//!     let out = runtime
//!         .compute("sum", &record([("a", 1.0), ("b", 2.0)]))
//!         .await
//!         .unwrap();
//!     assert_eq!(out["total"], Primitive::Number(3.0));
//! });
//! ```

mod error;
mod loader;
mod registry;
mod runtime;

pub use error::{BoxError, LoaderError, LoaderResult, RuntimeError, RuntimeResult};
pub use loader::ModuleLoader;
pub use registry::{CalculatorModule, LoadFuture, ModuleRegistry, ModuleSource};
pub use runtime::CalculatorRuntime;
