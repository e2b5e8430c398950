//! Calculator runtime: load, validate, cache and time a computation

use crate::error::{RuntimeError, RuntimeResult};
use crate::loader::ModuleLoader;
use crate::registry::{CalculatorModule, ModuleRegistry};
use calculators::{Calculator, Record};
use perf::{calculation_label, MetricsRecorder, PerformanceReport, SharedConfig};
use result_cache::{cache_key, CacheConfig, ResultCacheRegistry};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Application context tying the loader, result caches and metrics together.
///
/// Built once at startup and shared by reference. Nothing here is a global:
/// separate runtimes (for example one per test) never share state.
#[derive(Debug)]
pub struct CalculatorRuntime {
    loader: ModuleLoader,
    caches: ResultCacheRegistry<Record>,
    recorder: Arc<MetricsRecorder>,
}

impl CalculatorRuntime {
    /// Runtime over `registry` with default limits.
    pub fn new(registry: ModuleRegistry, config: SharedConfig) -> Self {
        let recorder = Arc::new(MetricsRecorder::new().with_config(config));
        Self::with_parts(registry, recorder, CacheConfig::default())
    }

    /// Runtime from explicit parts. The recorder's config drives thresholds
    /// and feature flags.
    pub fn with_parts(
        registry: ModuleRegistry,
        recorder: Arc<MetricsRecorder>,
        cache_config: CacheConfig,
    ) -> Self {
        Self {
            loader: ModuleLoader::new(registry, Arc::clone(&recorder)),
            caches: ResultCacheRegistry::with_config(cache_config),
            recorder,
        }
    }

    /// Preload every registered module when lazy loading is disabled.
    pub fn warm_up(&self) -> Option<JoinHandle<()>> {
        if self.config().get().enable_lazy_loading {
            return None;
        }
        tracing::info!(target: "module_loader", "lazy loading disabled, preloading all modules");
        Some(self.loader.preload(self.loader.registry().ids()))
    }

    /// Resolve a module through the loader.
    pub async fn module(&self, id: &str) -> RuntimeResult<CalculatorModule> {
        Ok(self.loader.resolve(id).await?)
    }

    /// Run calculator `id` on `inputs`.
    ///
    /// Inputs are validated first. When caching is enabled a fresh cached
    /// result is returned without computing; otherwise the computation is
    /// timed as `calculation_<id>` and its result stored. Errors are never
    /// cached.
    pub async fn compute(&self, id: &str, inputs: &Record) -> RuntimeResult<Record> {
        let module = self.loader.resolve(id).await?;

        let validation = module.validate(inputs);
        if !validation.is_valid {
            return Err(RuntimeError::Validation {
                id: id.to_string(),
                errors: validation.errors,
            });
        }

        let cache = if self.config().get().caching_enabled() {
            Some((self.caches.cache_for(id), cache_key(inputs)?))
        } else {
            None
        };

        if let Some((cache, key)) = &cache {
            if let Some(outputs) = cache.lookup_key(key).into_option() {
                return Ok(outputs);
            }
        }

        let measured = self
            .recorder
            .measure(calculation_label(id), || module.compute(inputs));
        let outputs = measured.result?;

        if let Some((cache, key)) = cache {
            cache.set_key(key, outputs.clone());
        }
        Ok(outputs)
    }

    /// Summarize recorded samples.
    pub fn report(&self) -> PerformanceReport {
        PerformanceReport::from_recorder(&self.recorder)
    }

    /// Empty every result cache.
    pub fn clear_caches(&self) {
        self.caches.clear_all();
    }

    pub fn loader(&self) -> &ModuleLoader {
        &self.loader
    }

    pub fn caches(&self) -> &ResultCacheRegistry<Record> {
        &self.caches
    }

    pub fn recorder(&self) -> &Arc<MetricsRecorder> {
        &self.recorder
    }

    pub fn config(&self) -> &SharedConfig {
        self.recorder.config()
    }
}
