//! Generic memoization of pure functions
//!
//! Entries never expire; the store is bounded and evicts in insertion order
//! (see [`FifoStore`]). The wrapped function must be referentially
//! transparent: nothing is invalidated when outside state changes.

use crate::error::CacheResult;
use crate::fifo::FifoStore;
use crate::key::cache_key;
use crate::stats::CacheStats;
use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Default number of memoized results.
pub const DEFAULT_MEMO_CAPACITY: usize = 100;

type KeyFn<A> = Box<dyn Fn(&A) -> String + Send + Sync>;

struct MemoState<R> {
    store: FifoStore<String, R>,
    stats: CacheStats,
}

/// A function wrapped with a bounded result cache.
///
/// # Example
///
/// ```rust
/// use result_cache::memoize;
///
/// let square = memoize(|x: &u64| x * x);
/// assert_eq!(square.call(&12).unwrap(), 144);
/// assert_eq!(square.call(&12).unwrap(), 144);
/// assert_eq!(square.stats().hits, 1);
/// ```
pub struct Memoizer<A, R> {
    func: Box<dyn Fn(&A) -> R + Send + Sync>,
    key_fn: Option<KeyFn<A>>,
    state: Mutex<MemoState<R>>,
}

/// Wrap `func`, keying results by the serialized arguments.
pub fn memoize<A, R, F>(func: F) -> Memoizer<A, R>
where
    A: Serialize,
    R: Clone,
    F: Fn(&A) -> R + Send + Sync + 'static,
{
    Memoizer::new(func)
}

/// Wrap `func`, keying results with `key_fn`.
pub fn memoize_with_key<A, R, F, K>(func: F, key_fn: K) -> Memoizer<A, R>
where
    R: Clone,
    F: Fn(&A) -> R + Send + Sync + 'static,
    K: Fn(&A) -> String + Send + Sync + 'static,
{
    Memoizer::new(func).with_key_fn(key_fn)
}

impl<A, R: Clone> Memoizer<A, R> {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        Self {
            func: Box::new(func),
            key_fn: None,
            state: Mutex::new(MemoState {
                store: FifoStore::new(DEFAULT_MEMO_CAPACITY),
                stats: CacheStats::default(),
            }),
        }
    }

    /// Set the maximum number of stored results. Existing entries are dropped.
    pub fn with_capacity(self, capacity: usize) -> Self {
        {
            let mut state = self.lock();
            state.store = FifoStore::new(capacity);
        }
        self
    }

    /// Use a custom key function instead of argument serialization.
    pub fn with_key_fn<K>(mut self, key_fn: K) -> Self
    where
        K: Fn(&A) -> String + Send + Sync + 'static,
    {
        self.key_fn = Some(Box::new(key_fn));
        self
    }

    /// Call through the cache with a precomputed key.
    ///
    /// The lock is released while the wrapped function runs, so two callers
    /// missing on the same key may both compute it; the result is identical
    /// for a pure function.
    pub fn call_with_key(&self, key: String, args: &A) -> R {
        {
            let mut state = self.lock();
            if let Some(value) = state.store.get(&key).cloned() {
                state.stats.hits += 1;
                tracing::trace!(target: "result_cache", key = %key, "memo hit");
                return value;
            }
            state.stats.misses += 1;
        }

        let value = (self.func)(args);

        let mut state = self.lock();
        if let Some((evicted, _)) = state.store.insert(key, value.clone()) {
            state.stats.evictions += 1;
            tracing::trace!(target: "result_cache", key = %evicted, "memo evicted");
        }
        value
    }

    /// Whether a result for `key` is stored.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().store.contains_key(key)
    }

    /// Stored keys, oldest first.
    pub fn keys(&self) -> Vec<String> {
        self.lock().store.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().store.capacity()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    /// Drop all stored results and reset statistics.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.store.clear();
        state.stats.reset();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoState<R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A: Serialize, R: Clone> Memoizer<A, R> {
    /// Compute the cache key for `args`.
    pub fn key_for(&self, args: &A) -> CacheResult<String> {
        match &self.key_fn {
            Some(key_fn) => Ok(key_fn(args)),
            None => cache_key(args),
        }
    }

    /// Return the cached result for `args`, computing it on a miss.
    pub fn call(&self, args: &A) -> CacheResult<R> {
        let key = self.key_for(args)?;
        Ok(self.call_with_key(key, args))
    }
}

impl<A, R> fmt::Debug for Memoizer<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoizer")
            .field("custom_key", &self.key_fn.is_some())
            .finish_non_exhaustive()
    }
}
