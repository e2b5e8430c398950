//! Performance report generation
//!
//! A report is a read-only view over the recorder's samples: building one
//! never records a sample of its own. Recommendations are produced in a
//! fixed order so identical inputs always yield identical reports.

use crate::config::Thresholds;
use crate::metrics::{MetricSample, MetricsRecorder, TimingStats};
use crate::timing::MetricCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Optimization hints logged when a single measurement exceeds its threshold.
pub fn suggestions_for(category: MetricCategory) -> &'static [&'static str] {
    match category {
        MetricCategory::Calculation => &[
            "Enable memoization for this calculator",
            "Move expensive intermediate values out of the compute path",
        ],
        MetricCategory::Render => &[
            "Reduce the amount of output rendered per update",
            "Skip re-rendering when results are unchanged",
        ],
        MetricCategory::Load => &[
            "Preload this module before it is needed",
            "Split the module so less code loads on first use",
        ],
        MetricCategory::Other => &[],
    }
}

/// Aggregated view of recorded samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub calculation_stats: TimingStats,
    pub render_stats: TimingStats,
    pub load_stats: TimingStats,
    /// Samples that are neither calculation nor render (load samples included)
    pub other_stats: TimingStats,
    /// Calculators whose mean compute time exceeds the threshold, sorted
    pub slow_calculators: Vec<String>,
    pub recommendations: Vec<String>,
    pub sample_count: usize,
    /// Samples recorded without memory data
    pub samples_without_memory: usize,
    /// Mean memory delta over samples that carry memory data
    #[serde(rename = "averageMemoryDeltaMB")]
    pub average_memory_delta_mb: Option<f64>,
    #[serde(rename = "currentMemoryMB")]
    pub current_memory_mb: Option<f64>,
}

impl PerformanceReport {
    /// Build a report from the recorder's current samples and configuration.
    pub fn from_recorder(recorder: &MetricsRecorder) -> Self {
        let samples = recorder.samples();
        let thresholds = recorder.config().thresholds();
        let current_memory_mb = recorder.probe().used_mb();
        Self::from_samples(&samples, &thresholds, current_memory_mb)
    }

    /// Build a report from explicit inputs.
    pub fn from_samples(
        samples: &[MetricSample],
        thresholds: &Thresholds,
        current_memory_mb: Option<f64>,
    ) -> Self {
        let mut calculation = Vec::new();
        let mut render = Vec::new();
        let mut load = Vec::new();
        let mut other = Vec::new();
        let mut per_calculator: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

        for sample in samples {
            match sample.category() {
                MetricCategory::Calculation => {
                    calculation.push(sample.duration_ms);
                    per_calculator
                        .entry(MetricCategory::subject(&sample.label))
                        .or_default()
                        .push(sample.duration_ms);
                }
                MetricCategory::Render => render.push(sample.duration_ms),
                MetricCategory::Load => {
                    load.push(sample.duration_ms);
                    other.push(sample.duration_ms);
                }
                MetricCategory::Other => other.push(sample.duration_ms),
            }
        }

        let slow_calculators: Vec<String> = per_calculator
            .into_iter()
            .filter(|(_, times)| mean(times) > thresholds.calculation_time)
            .map(|(id, _)| id.to_string())
            .collect();

        let memory_deltas: Vec<f64> = samples.iter().filter_map(|s| s.memory_delta_mb).collect();
        let average_memory_delta_mb = if memory_deltas.is_empty() {
            None
        } else {
            Some(mean(&memory_deltas))
        };

        let mut report = Self {
            calculation_stats: TimingStats::from_samples(&calculation),
            render_stats: TimingStats::from_samples(&render),
            load_stats: TimingStats::from_samples(&load),
            other_stats: TimingStats::from_samples(&other),
            slow_calculators,
            recommendations: Vec::new(),
            sample_count: samples.len(),
            samples_without_memory: samples.len() - memory_deltas.len(),
            average_memory_delta_mb,
            current_memory_mb,
        };
        report.recommendations = report.recommend(thresholds);
        report
    }

    pub fn average_calculation_ms(&self) -> f64 {
        self.calculation_stats.mean_ms
    }

    pub fn average_render_ms(&self) -> f64 {
        self.render_stats.mean_ms
    }

    pub fn average_load_ms(&self) -> f64 {
        self.load_stats.mean_ms
    }

    pub fn average_other_ms(&self) -> f64 {
        self.other_stats.mean_ms
    }

    pub fn has_recommendations(&self) -> bool {
        !self.recommendations.is_empty()
    }

    /// Serialize the report for a telemetry sink.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn recommend(&self, thresholds: &Thresholds) -> Vec<String> {
        let mut out = Vec::new();

        if self.average_calculation_ms() > thresholds.calculation_time {
            out.push(format!(
                "Average calculation time {:.1}ms exceeds {:.1}ms: enable memoization for expensive calculators",
                self.average_calculation_ms(),
                thresholds.calculation_time
            ));
        }
        if self.average_render_ms() > thresholds.render_time {
            out.push(format!(
                "Average render time {:.1}ms exceeds {:.1}ms: reduce re-renders of unchanged results",
                self.average_render_ms(),
                thresholds.render_time
            ));
        }
        if self.average_load_ms() > thresholds.load_time {
            out.push(format!(
                "Average module load time {:.1}ms exceeds {:.1}ms: preload frequently used calculators",
                self.average_load_ms(),
                thresholds.load_time
            ));
        }
        if !self.slow_calculators.is_empty() {
            out.push(format!(
                "Slow calculators: {}. Cache their results or simplify their formulas",
                self.slow_calculators.join(", ")
            ));
        }
        // Memory is only judged alongside recorded work
        if let Some(memory) = self.current_memory_mb.filter(|_| self.sample_count > 0) {
            if memory > thresholds.memory_usage {
                out.push(format!(
                    "Memory usage {:.1}MB exceeds {:.1}MB: clear result caches or lower their capacity",
                    memory, thresholds.memory_usage
                ));
            }
        }

        out
    }
}

impl std::fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Performance Report: {} samples", self.sample_count)?;
        writeln!(
            f,
            "  Calculation: {:.2}ms avg ({} samples)",
            self.average_calculation_ms(),
            self.calculation_stats.count
        )?;
        writeln!(
            f,
            "  Render: {:.2}ms avg ({} samples)",
            self.average_render_ms(),
            self.render_stats.count
        )?;
        writeln!(
            f,
            "  Load: {:.2}ms avg ({} samples)",
            self.average_load_ms(),
            self.load_stats.count
        )?;
        match self.current_memory_mb {
            Some(mb) => writeln!(f, "  Memory: {:.1}MB", mb)?,
            None => writeln!(f, "  Memory: unavailable")?,
        }
        if self.recommendations.is_empty() {
            write!(f, "  No recommendations")
        } else {
            write!(f, "  Recommendations:")?;
            for r in &self.recommendations {
                write!(f, "\n  - {}", r)?;
            }
            Ok(())
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
