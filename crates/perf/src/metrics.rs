//! Metrics collection for performance measurement

use crate::config::SharedConfig;
use crate::memory::{MemoryProbe, ProcessMemoryProbe};
use crate::report::suggestions_for;
use crate::timing::{Measured, MetricCategory, PerfTimer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// Default number of samples kept by a recorder.
pub const DEFAULT_METRICS_CAPACITY: usize = 100;

/// One recorded measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    pub label: String,
    pub duration_ms: f64,
    /// `None` when memory could not be observed for this sample
    #[serde(rename = "memoryDeltaMB")]
    pub memory_delta_mb: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl MetricSample {
    pub fn new(label: impl Into<String>, duration_ms: f64, memory_delta_mb: Option<f64>) -> Self {
        Self {
            label: label.into(),
            duration_ms,
            memory_delta_mb,
            timestamp: Utc::now(),
        }
    }

    /// Category derived from the label prefix.
    pub fn category(&self) -> MetricCategory {
        MetricCategory::of(&self.label)
    }

    /// Whether memory data was available for this sample.
    pub fn has_memory(&self) -> bool {
        self.memory_delta_mb.is_some()
    }
}

/// Bounded recorder of timing samples.
///
/// Samples live in a ring buffer; once it is full the oldest sample is
/// dropped for each new one. The recorder is shared by reference between the
/// module loader, the calculator runtime and the reporter.
#[derive(Debug)]
pub struct MetricsRecorder {
    samples: Mutex<VecDeque<MetricSample>>,
    capacity: usize,
    config: SharedConfig,
    probe: Arc<dyn MemoryProbe>,
}

impl MetricsRecorder {
    /// Create a recorder with default capacity, config and memory probe.
    pub fn new() -> Self {
        Self {
            samples: Mutex::new(VecDeque::with_capacity(DEFAULT_METRICS_CAPACITY)),
            capacity: DEFAULT_METRICS_CAPACITY,
            config: SharedConfig::default(),
            probe: Arc::new(ProcessMemoryProbe),
        }
    }

    /// Set the maximum number of samples to keep.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Use a shared configuration for threshold checks.
    pub fn with_config(mut self, config: SharedConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a specific memory probe.
    pub fn with_probe(mut self, probe: Arc<dyn MemoryProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Start timing a labeled unit of work.
    pub fn start_timer(&self, label: impl Into<String>) -> PerfTimer<'_> {
        PerfTimer::start(self, label.into())
    }

    /// Time a synchronous computation.
    ///
    /// A duration above the threshold of the label's category logs a warning
    /// and optimization suggestions; the result is returned either way.
    pub fn measure<T>(&self, label: impl Into<String>, f: impl FnOnce() -> T) -> Measured<T> {
        let timer = self.start_timer(label);
        let result = f();
        let (duration_ms, memory_delta_mb) = timer.stop_with_memory();
        let over_threshold = self.check_threshold(timer.label(), duration_ms);

        Measured {
            result,
            duration_ms,
            memory_delta_mb,
            over_threshold,
        }
    }

    /// Compare a duration against the configured threshold for its label.
    ///
    /// Returns whether the threshold was exceeded. Never fails.
    pub fn check_threshold(&self, label: &str, duration_ms: f64) -> bool {
        let category = MetricCategory::of(label);
        let thresholds = self.config.thresholds();
        let threshold_ms = match category {
            MetricCategory::Calculation => thresholds.calculation_time,
            MetricCategory::Render => thresholds.render_time,
            MetricCategory::Load => thresholds.load_time,
            MetricCategory::Other => return false,
        };

        if duration_ms <= threshold_ms {
            return false;
        }

        tracing::warn!(
            target: "perf",
            label,
            duration_ms,
            threshold_ms,
            "performance threshold exceeded"
        );
        for suggestion in suggestions_for(category) {
            tracing::info!(target: "perf::suggest", label, "{}", suggestion);
        }
        true
    }

    /// Append a sample, dropping the oldest one when the buffer is full.
    pub fn record(&self, label: impl Into<String>, duration_ms: f64, memory_delta_mb: Option<f64>) {
        let sample = MetricSample::new(label, duration_ms, memory_delta_mb);
        tracing::trace!(
            target: "perf",
            label = %sample.label,
            duration_ms,
            "sample recorded"
        );

        let mut samples = self.lock();
        while samples.len() >= self.capacity {
            samples.pop_front();
        }
        samples.push_back(sample);
    }

    /// Copy of all samples, oldest first.
    pub fn samples(&self) -> Vec<MetricSample> {
        self.lock().iter().cloned().collect()
    }

    /// Samples whose label starts with `prefix`.
    pub fn samples_with_prefix(&self, prefix: &str) -> Vec<MetricSample> {
        self.lock()
            .iter()
            .filter(|s| s.label.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all samples.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn probe(&self) -> &dyn MemoryProbe {
        self.probe.as_ref()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<MetricSample>> {
        self.samples.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistical summary of timing data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingStats {
    /// Number of samples
    pub count: usize,
    /// Minimum time in milliseconds
    pub min_ms: f64,
    /// Maximum time in milliseconds
    pub max_ms: f64,
    /// Mean time in milliseconds
    pub mean_ms: f64,
    /// Median time in milliseconds
    pub median_ms: f64,
    /// 95th percentile in milliseconds
    pub p95_ms: f64,
    /// Total time in milliseconds
    pub total_ms: f64,
}

impl TimingStats {
    /// Calculate statistics from a slice of durations.
    ///
    /// An empty slice yields all zeros.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let count = samples.len();
        let mut sorted: Vec<f64> = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let total_ms: f64 = samples.iter().sum();
        let median_ms = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Self {
            count,
            min_ms: sorted[0],
            max_ms: sorted[count - 1],
            mean_ms: total_ms / count as f64,
            median_ms,
            p95_ms: percentile(&sorted, 95.0),
            total_ms,
        }
    }
}

/// Calculate a percentile from sorted samples.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    if upper >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[lower] + fraction * (sorted[upper] - sorted[lower])
    }
}
