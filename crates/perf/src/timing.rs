//! Timing utilities for performance measurement

use crate::metrics::MetricsRecorder;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Category of operation being timed, derived from the label prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricCategory {
    /// `calculation_<id>`: calculator compute timing
    Calculation,
    /// `render_<id>`: result rendering timing
    Render,
    /// `load_<id>`: module load timing
    Load,
    /// Anything else
    Other,
}

impl MetricCategory {
    pub const CALCULATION_PREFIX: &'static str = "calculation_";
    pub const RENDER_PREFIX: &'static str = "render_";
    pub const LOAD_PREFIX: &'static str = "load_";

    /// Classify a label by its prefix.
    pub fn of(label: &str) -> Self {
        if label.starts_with(Self::CALCULATION_PREFIX) {
            Self::Calculation
        } else if label.starts_with(Self::RENDER_PREFIX) {
            Self::Render
        } else if label.starts_with(Self::LOAD_PREFIX) {
            Self::Load
        } else {
            Self::Other
        }
    }

    /// The label prefix for this category, if it has one.
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            Self::Calculation => Some(Self::CALCULATION_PREFIX),
            Self::Render => Some(Self::RENDER_PREFIX),
            Self::Load => Some(Self::LOAD_PREFIX),
            Self::Other => None,
        }
    }

    /// Strip the category prefix, leaving the subject (usually a calculator id).
    pub fn subject(label: &str) -> &str {
        match Self::of(label).prefix() {
            Some(prefix) => &label[prefix.len()..],
            None => label,
        }
    }
}

/// Build the label for a calculator compute.
pub fn calculation_label(id: &str) -> String {
    format!("{}{}", MetricCategory::CALCULATION_PREFIX, id)
}

/// Build the label for rendering a calculator's output.
pub fn render_label(id: &str) -> String {
    format!("{}{}", MetricCategory::RENDER_PREFIX, id)
}

/// Build the label for loading a calculator module.
pub fn load_label(id: &str) -> String {
    format!("{}{}", MetricCategory::LOAD_PREFIX, id)
}

/// A running timer bound to a recorder.
///
/// Nothing is recorded until [`PerfTimer::stop`] is called. `stop` takes
/// `&self`: every call appends a sample, so calling it twice records a
/// second, spurious sample.
///
/// # Example
///
/// ```rust
/// use perf::MetricsRecorder;
///
/// let recorder = MetricsRecorder::new();
/// let timer = recorder.start_timer("calculation_mortgage");
/// // ... compute ...
/// let elapsed_ms = timer.stop();
/// assert!(elapsed_ms >= 0.0);
/// assert_eq!(recorder.len(), 1);
/// ```
#[derive(Debug)]
pub struct PerfTimer<'a> {
    recorder: &'a MetricsRecorder,
    label: String,
    start: Instant,
    memory_start: Option<u64>,
}

impl<'a> PerfTimer<'a> {
    pub(crate) fn start(recorder: &'a MetricsRecorder, label: String) -> Self {
        let memory_start = recorder.probe().used_bytes();
        Self {
            recorder,
            label,
            start: Instant::now(),
            memory_start,
        }
    }

    /// Get the elapsed time in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Get the label of this timer.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the category of this timer.
    #[inline]
    pub fn category(&self) -> MetricCategory {
        MetricCategory::of(&self.label)
    }

    /// Record a sample and return the elapsed milliseconds.
    pub fn stop(&self) -> f64 {
        self.stop_with_memory().0
    }

    /// Record a sample and return the elapsed milliseconds and memory delta.
    pub(crate) fn stop_with_memory(&self) -> (f64, Option<f64>) {
        let duration_ms = self.elapsed_ms();
        let memory_delta_mb = match (self.memory_start, self.recorder.probe().used_bytes()) {
            (Some(before), Some(after)) => {
                Some((after as f64 - before as f64) / (1024.0 * 1024.0))
            }
            _ => None,
        };

        self.recorder
            .record(self.label.clone(), duration_ms, memory_delta_mb);
        (duration_ms, memory_delta_mb)
    }
}

/// The outcome of [`MetricsRecorder::measure`].
#[derive(Debug, Clone, PartialEq)]
pub struct Measured<T> {
    pub result: T,
    pub duration_ms: f64,
    /// `None` when the host exposes no memory data
    pub memory_delta_mb: Option<f64>,
    /// Whether the duration exceeded the category threshold
    pub over_threshold: bool,
}
