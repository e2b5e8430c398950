//! Single-flight module loader
//!
//! Resolution order for an identifier:
//! 1. Unknown to the registry: fail immediately.
//! 2. Already loaded: return the cached module without suspending.
//! 3. A load is in flight: join it.
//! 4. Otherwise start a load and record it as in flight before the first
//!    suspension point, so every later caller joins the same load.
//!
//! Steps 2-4 run under one lock, and the load itself moves its result into
//! the module cache and clears the in-flight entry under that same lock.
//! Each load is driven by a spawned task, so it runs to completion even if
//! every caller stops waiting. Failures are not cached.

use crate::error::{LoaderError, LoaderResult};
use crate::registry::{CalculatorModule, ModuleRegistry, ModuleSource};
use futures_util::future::{join_all, BoxFuture, FutureExt, Shared};
use perf::{load_label, MetricsRecorder};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;

type SharedLoad = Shared<BoxFuture<'static, LoaderResult<CalculatorModule>>>;

#[derive(Default)]
struct LoaderState {
    /// Loaded modules; entries are never removed
    modules: HashMap<String, CalculatorModule>,
    in_flight: HashMap<String, SharedLoad>,
}

struct LoaderInner {
    registry: ModuleRegistry,
    recorder: Arc<MetricsRecorder>,
    state: Mutex<LoaderState>,
}

impl LoaderInner {
    fn lock(&self) -> std::sync::MutexGuard<'_, LoaderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

enum Resolution {
    Ready(CalculatorModule),
    Pending(SharedLoad),
}

/// Loads calculator modules on demand, at most once concurrently per id.
///
/// Cloning is cheap; clones share the module cache and in-flight loads.
#[derive(Clone)]
pub struct ModuleLoader {
    inner: Arc<LoaderInner>,
}

impl ModuleLoader {
    pub fn new(registry: ModuleRegistry, recorder: Arc<MetricsRecorder>) -> Self {
        Self {
            inner: Arc::new(LoaderInner {
                registry,
                recorder,
                state: Mutex::new(LoaderState::default()),
            }),
        }
    }

    /// Resolve `id` to its module, loading it if needed.
    ///
    /// Concurrent callers for the same unloaded id share one load and all
    /// receive its module or its error.
    pub async fn resolve(&self, id: &str) -> LoaderResult<CalculatorModule> {
        match self.begin(id)? {
            Resolution::Ready(module) => Ok(module),
            Resolution::Pending(load) => load.await,
        }
    }

    /// Resolve `id`, discarding any error.
    ///
    /// Used for preloading, where a failure must never reach the user.
    pub async fn resolve_best_effort(&self, id: &str) -> Option<CalculatorModule> {
        match self.resolve(id).await {
            Ok(module) => Some(module),
            Err(err) => {
                tracing::warn!(target: "module_loader", id, error = %err, "preload failed");
                None
            }
        }
    }

    /// Load `ids` in the background after yielding to pending work.
    ///
    /// Errors are swallowed. The handle may be dropped; loads still finish.
    pub fn preload<I, S>(&self, ids: I) -> JoinHandle<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let loader = self.clone();
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            join_all(ids.iter().map(|id| loader.resolve_best_effort(id))).await;
        })
    }

    /// The loaded module for `id`, without starting a load.
    pub fn get_cached(&self, id: &str) -> Option<CalculatorModule> {
        self.inner.lock().modules.get(id).cloned()
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        self.inner.lock().modules.contains_key(id)
    }

    pub fn is_loading(&self, id: &str) -> bool {
        self.inner.lock().in_flight.contains_key(id)
    }

    /// Identifiers of loaded modules, sorted.
    pub fn loaded_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.lock().modules.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.inner.registry
    }

    pub fn recorder(&self) -> &Arc<MetricsRecorder> {
        &self.inner.recorder
    }

    fn begin(&self, id: &str) -> LoaderResult<Resolution> {
        let source = self
            .inner
            .registry
            .source(id)
            .ok_or_else(|| LoaderError::UnknownModule(id.to_string()))?;

        let load = {
            let mut state = self.inner.lock();
            if let Some(module) = state.modules.get(id) {
                return Ok(Resolution::Ready(Arc::clone(module)));
            }
            if let Some(load) = state.in_flight.get(id) {
                tracing::debug!(target: "module_loader", id, "joining in-flight load");
                return Ok(Resolution::Pending(load.clone()));
            }

            let load = self.start_load(id, source);
            state.in_flight.insert(id.to_string(), load.clone());
            load
        };

        tokio::spawn(load.clone());
        Ok(Resolution::Pending(load))
    }

    fn start_load(&self, id: &str, source: ModuleSource) -> SharedLoad {
        tracing::debug!(target: "module_loader", id, "starting load");
        let inner = Arc::clone(&self.inner);
        let id = id.to_string();

        async move {
            let timer = inner.recorder.start_timer(load_label(&id));
            let outcome = source().await;
            let duration_ms = timer.stop();
            inner.recorder.check_threshold(timer.label(), duration_ms);

            let mut state = inner.lock();
            state.in_flight.remove(&id);
            match outcome {
                Ok(module) => {
                    tracing::debug!(target: "module_loader", id = %id, duration_ms, "module loaded");
                    state.modules.insert(id, Arc::clone(&module));
                    Ok(module)
                }
                Err(cause) => {
                    tracing::warn!(target: "module_loader", id = %id, error = %cause, "module load failed");
                    Err(LoaderError::module_load(id, cause))
                }
            }
        }
        .boxed()
        .shared()
    }
}

impl std::fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("registry", &self.inner.registry)
            .field("loaded", &self.loaded_ids())
            .finish()
    }
}
