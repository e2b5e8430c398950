//! Identifier → module source table
//!
//! The registry is consulted synchronously before any load starts, so an
//! unknown identifier fails without suspending or recording a sample.

use crate::error::BoxError;
use calculators::{Calculator, CalculatorId};
use futures_util::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A loaded calculator implementation.
pub type CalculatorModule = Arc<dyn Calculator>;

/// Future produced by a module source.
pub type LoadFuture = BoxFuture<'static, Result<CalculatorModule, BoxError>>;

/// Asynchronous factory for one module.
pub type ModuleSource = Arc<dyn Fn() -> LoadFuture + Send + Sync>;

/// Table of loadable modules.
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    sources: HashMap<String, ModuleSource>,
}

impl ModuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of every built-in calculator.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for id in CalculatorId::ALL {
            registry.register(id.as_str(), move || async move {
                // Instantiation happens off the caller's poll, as a real
                // code-split chunk would.
                tokio::task::yield_now().await;
                Ok(id.instantiate())
            });
        }
        registry
    }

    /// Register (or replace) the source for `id`.
    pub fn register<F, Fut>(&mut self, id: impl Into<String>, load: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CalculatorModule, BoxError>> + Send + 'static,
    {
        let source: ModuleSource = Arc::new(move || load().boxed());
        self.sources.insert(id.into(), source);
    }

    /// Builder form of [`ModuleRegistry::register`].
    pub fn with_module<F, Fut>(mut self, id: impl Into<String>, load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CalculatorModule, BoxError>> + Send + 'static,
    {
        self.register(id, load);
        self
    }

    pub fn source(&self, id: &str) -> Option<ModuleSource> {
        self.sources.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sources.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_catalog() {
        let registry = ModuleRegistry::builtin();
        assert_eq!(registry.len(), CalculatorId::ALL.len());
        assert!(registry.contains("compound-interest"));
        assert!(!registry.contains("tax-return"));
        assert_eq!(registry.ids()[0], "algebra");
    }

    #[tokio::test]
    async fn test_builtin_source_instantiates() {
        let registry = ModuleRegistry::builtin();
        let source = registry.source("bmi").unwrap();
        let module = source().await.unwrap();
        assert_eq!(module.id(), CalculatorId::Bmi);
    }

    #[tokio::test]
    async fn test_register_replaces() {
        let registry = ModuleRegistry::new()
            .with_module("x", || async { Err::<CalculatorModule, _>("first".into()) })
            .with_module("x", || async { Ok(CalculatorId::Sum.instantiate()) });

        assert_eq!(registry.len(), 1);
        assert!(registry.source("x").unwrap()().await.is_ok());
    }
}
