//! Performance thresholds and runtime feature flags

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// Threshold configuration.
///
/// A measurement above its threshold produces a warning and an
/// optimization suggestion. Thresholds never affect control flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    /// Maximum acceptable calculator compute time in milliseconds.
    pub calculation_time: f64,

    /// Maximum acceptable render time in milliseconds.
    ///
    /// Target: 16ms for 60fps.
    pub render_time: f64,

    /// Maximum acceptable process memory usage in megabytes.
    pub memory_usage: f64,

    /// Maximum acceptable module load time in milliseconds.
    pub load_time: f64,
}

impl Thresholds {
    /// Create thresholds with custom values.
    pub fn new(calculation_time: f64, render_time: f64, memory_usage: f64, load_time: f64) -> Self {
        Self {
            calculation_time,
            render_time,
            memory_usage,
            load_time,
        }
    }

    /// Tight thresholds for performance testing.
    pub fn strict() -> Self {
        Self {
            calculation_time: 16.0,
            render_time: 8.0,
            memory_usage: 25.0,
            load_time: 250.0,
        }
    }

    /// Relaxed thresholds for slow devices.
    pub fn relaxed() -> Self {
        Self {
            calculation_time: 250.0,
            render_time: 33.0, // 30fps
            memory_usage: 100.0,
            load_time: 3000.0,
        }
    }

    /// Builder method to set the calculation threshold.
    pub fn with_calculation_time(mut self, ms: f64) -> Self {
        self.calculation_time = ms;
        self
    }

    /// Builder method to set the render threshold.
    pub fn with_render_time(mut self, ms: f64) -> Self {
        self.render_time = ms;
        self
    }

    /// Builder method to set the memory threshold.
    pub fn with_memory_usage(mut self, mb: f64) -> Self {
        self.memory_usage = mb;
        self
    }

    /// Builder method to set the load threshold.
    pub fn with_load_time(mut self, ms: f64) -> Self {
        self.load_time = ms;
        self
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            calculation_time: 100.0,
            render_time: 16.0,
            memory_usage: 50.0,
            load_time: 1000.0,
        }
    }
}

/// Where computed results are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheStrategy {
    /// In-process memory caches
    #[default]
    Memory,
    /// No result caching
    Off,
}

/// Process-wide performance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceConfig {
    pub thresholds: Thresholds,
    /// Cache calculator results for repeated inputs
    pub enable_memoization: bool,
    /// Load calculator modules on first use instead of at startup
    pub enable_lazy_loading: bool,
    pub cache_strategy: CacheStrategy,
}

impl PerformanceConfig {
    /// Whether result caches should be consulted at all.
    pub fn caching_enabled(&self) -> bool {
        self.enable_memoization && self.cache_strategy != CacheStrategy::Off
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, update: &ConfigUpdate) {
        if let Some(thresholds) = &update.thresholds {
            let t = &mut self.thresholds;
            if let Some(v) = thresholds.calculation_time {
                t.calculation_time = v;
            }
            if let Some(v) = thresholds.render_time {
                t.render_time = v;
            }
            if let Some(v) = thresholds.memory_usage {
                t.memory_usage = v;
            }
            if let Some(v) = thresholds.load_time {
                t.load_time = v;
            }
        }
        if let Some(v) = update.enable_memoization {
            self.enable_memoization = v;
        }
        if let Some(v) = update.enable_lazy_loading {
            self.enable_lazy_loading = v;
        }
        if let Some(v) = update.cache_strategy {
            self.cache_strategy = v;
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            enable_memoization: true,
            enable_lazy_loading: true,
            cache_strategy: CacheStrategy::Memory,
        }
    }
}

/// Partial thresholds, every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThresholdsUpdate {
    pub calculation_time: Option<f64>,
    pub render_time: Option<f64>,
    pub memory_usage: Option<f64>,
    pub load_time: Option<f64>,
}

/// Partial configuration accepted by [`SharedConfig::update`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigUpdate {
    pub thresholds: Option<ThresholdsUpdate>,
    pub enable_memoization: Option<bool>,
    pub enable_lazy_loading: Option<bool>,
    pub cache_strategy: Option<CacheStrategy>,
}

impl ConfigUpdate {
    /// Builder method to set the calculation threshold.
    pub fn calculation_time(mut self, ms: f64) -> Self {
        self.thresholds.get_or_insert_with(Default::default).calculation_time = Some(ms);
        self
    }

    /// Builder method to set the render threshold.
    pub fn render_time(mut self, ms: f64) -> Self {
        self.thresholds.get_or_insert_with(Default::default).render_time = Some(ms);
        self
    }

    /// Builder method to set the memory threshold.
    pub fn memory_usage(mut self, mb: f64) -> Self {
        self.thresholds.get_or_insert_with(Default::default).memory_usage = Some(mb);
        self
    }

    /// Builder method to set the load threshold.
    pub fn load_time(mut self, ms: f64) -> Self {
        self.thresholds.get_or_insert_with(Default::default).load_time = Some(ms);
        self
    }

    pub fn enable_memoization(mut self, enabled: bool) -> Self {
        self.enable_memoization = Some(enabled);
        self
    }

    pub fn enable_lazy_loading(mut self, enabled: bool) -> Self {
        self.enable_lazy_loading = Some(enabled);
        self
    }

    pub fn cache_strategy(mut self, strategy: CacheStrategy) -> Self {
        self.cache_strategy = Some(strategy);
        self
    }
}

/// Shared handle to the mutable configuration.
///
/// Clones point at the same configuration. Every measurement reads a fresh
/// snapshot, so an update applies to all measurements that start after it.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<PerformanceConfig>>,
}

impl SharedConfig {
    pub fn new(config: PerformanceConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Snapshot of the current configuration.
    pub fn get(&self) -> PerformanceConfig {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current thresholds.
    pub fn thresholds(&self) -> Thresholds {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .thresholds
            .clone()
    }

    /// Merge a partial update into the configuration.
    pub fn update(&self, update: &ConfigUpdate) {
        let mut config = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        config.apply(update);
        tracing::debug!(target: "perf", ?update, "performance config updated");
    }

    /// Restore defaults.
    pub fn reset(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = PerformanceConfig::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PerformanceConfig::default();
        assert_eq!(config.thresholds.calculation_time, 100.0);
        assert_eq!(config.thresholds.render_time, 16.0);
        assert_eq!(config.thresholds.memory_usage, 50.0);
        assert_eq!(config.thresholds.load_time, 1000.0);
        assert!(config.enable_memoization);
        assert!(config.enable_lazy_loading);
        assert!(config.caching_enabled());
    }

    #[test]
    fn test_partial_update_leaves_other_fields() {
        let shared = SharedConfig::default();
        shared.update(&ConfigUpdate::default().render_time(8.0));

        let config = shared.get();
        assert_eq!(config.thresholds.render_time, 8.0);
        assert_eq!(config.thresholds.calculation_time, 100.0);
        assert!(config.enable_memoization);
    }

    #[test]
    fn test_clones_share_state() {
        let shared = SharedConfig::default();
        let other = shared.clone();
        other.update(&ConfigUpdate::default().cache_strategy(CacheStrategy::Off));

        assert_eq!(shared.get().cache_strategy, CacheStrategy::Off);
        assert!(!shared.get().caching_enabled());

        shared.reset();
        assert_eq!(other.get(), PerformanceConfig::default());
    }

    #[test]
    fn test_update_from_json() {
        let json = r#"{"thresholds":{"loadTime":500},"enableMemoization":false}"#;
        let update: ConfigUpdate = serde_json::from_str(json).unwrap();

        let mut config = PerformanceConfig::default();
        config.apply(&update);
        assert_eq!(config.thresholds.load_time, 500.0);
        assert!(!config.enable_memoization);
        assert!(!config.caching_enabled());
        assert_eq!(config.cache_strategy, CacheStrategy::Memory);
    }

    #[test]
    fn test_threshold_builders() {
        let t = Thresholds::default()
            .with_calculation_time(10.0)
            .with_load_time(20.0);
        assert_eq!(t.calculation_time, 10.0);
        assert_eq!(t.load_time, 20.0);
        assert_eq!(Thresholds::strict().render_time, 8.0);
    }
}
