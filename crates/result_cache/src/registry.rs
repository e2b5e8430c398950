//! On-demand result caches, one per owning calculator

use crate::ttl::{CacheConfig, ResultCache};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Creates and hands out one [`ResultCache`] per owner identifier.
///
/// Caches live as long as the registry; `clear_all` empties them without
/// dropping the instances callers may still hold.
#[derive(Debug)]
pub struct ResultCacheRegistry<V> {
    config: CacheConfig,
    caches: Mutex<HashMap<String, Arc<ResultCache<V>>>>,
}

impl<V: Clone> ResultCacheRegistry<V> {
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            config,
            caches: Mutex::new(HashMap::new()),
        }
    }

    /// The cache for `owner`, created on first request.
    pub fn cache_for(&self, owner: &str) -> Arc<ResultCache<V>> {
        let mut caches = self.lock();
        if let Some(cache) = caches.get(owner) {
            return Arc::clone(cache);
        }

        tracing::debug!(target: "result_cache", owner, "creating result cache");
        let cache = Arc::new(ResultCache::with_config(owner, &self.config));
        caches.insert(owner.to_string(), Arc::clone(&cache));
        cache
    }

    /// The cache for `owner` if one has been created.
    pub fn get(&self, owner: &str) -> Option<Arc<ResultCache<V>>> {
        self.lock().get(owner).cloned()
    }

    /// Owners with a cache, sorted.
    pub fn owners(&self) -> Vec<String> {
        let mut owners: Vec<String> = self.lock().keys().cloned().collect();
        owners.sort();
        owners
    }

    /// Empty every cache.
    pub fn clear_all(&self) {
        for cache in self.lock().values() {
            cache.clear();
        }
    }

    /// Total entries across all caches.
    pub fn total_entries(&self) -> usize {
        self.lock().values().map(|c| c.len()).sum()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<ResultCache<V>>>> {
        self.caches.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> Default for ResultCacheRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_owner_same_cache() {
        let registry: ResultCacheRegistry<u32> = ResultCacheRegistry::new();
        let a = registry.cache_for("mortgage");
        let b = registry.cache_for("mortgage");
        assert!(Arc::ptr_eq(&a, &b));

        let c = registry.cache_for("bmi");
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.owners(), vec!["bmi", "mortgage"]);
    }

    #[test]
    fn test_clear_all_keeps_instances() {
        let registry = ResultCacheRegistry::new();
        let cache = registry.cache_for("sum");
        cache.set(&[1, 2], 3).unwrap();
        assert_eq!(registry.total_entries(), 1);

        registry.clear_all();
        assert!(cache.is_empty());
        assert!(registry.get("sum").is_some());
        assert!(registry.get("other").is_none());
    }
}
