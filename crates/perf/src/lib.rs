//! Performance Measurement for Calculator Modules
//!
//! This crate provides the measurement side of the calculator runtime:
//! - Timers that append labeled samples to a bounded ring buffer
//! - Runtime-adjustable thresholds and feature flags
//! - Memory sampling that distinguishes "unavailable" from zero
//! - Reports with deterministic optimization recommendations
//!
//! Labels carry their category as a prefix: `calculation_<id>`,
//! `render_<id>` and `load_<id>`. Anything else is counted as "other".
//!
//! # Example
//!
//! ```rust
//! use perf::{MetricsRecorder, PerformanceReport};
//!
//! let recorder = MetricsRecorder::new();
//! let measured = recorder.measure("calculation_sum", || 1 + 2);
//! assert_eq!(measured.result, 3);
//!
//! let report = PerformanceReport::from_recorder(&recorder);
//! assert_eq!(report.calculation_stats.count, 1);
//! ```

mod config;
mod memory;
mod metrics;
mod report;
mod timing;

pub use config::*;
pub use memory::*;
pub use metrics::*;
pub use report::*;
pub use timing::*;
