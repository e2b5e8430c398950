//! Per-calculator result cache with time-to-live
//!
//! Entries are visible only while younger than the configured TTL. Expiry is
//! detected lazily on read: a stale entry is removed and reported as a miss.
//! Timestamps use `tokio::time::Instant`, so paused test runtimes control
//! the clock.

use crate::error::CacheResult;
use crate::fifo::FifoStore;
use crate::key::cache_key;
use crate::stats::CacheStats;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Configuration for result caches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    /// Maximum number of entries per cache
    pub max_entries: usize,
    /// Entry lifetime in milliseconds
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 50,
            ttl_ms: 5 * 60 * 1000,
        }
    }
}

impl CacheConfig {
    /// Create a cache config with specified limits
    pub fn with_limits(max_entries: usize, ttl: Duration) -> Self {
        Self {
            max_entries,
            ttl_ms: ttl.as_millis() as u64,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

/// A cached value and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    /// Whether the entry is still younger than `ttl` at `now`.
    pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) < ttl
    }
}

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    Hit(V),
    Miss,
    /// An entry existed but had expired; it has been removed
    Stale,
}

impl<V> Lookup<V> {
    /// Collapse stale reads into misses.
    pub fn into_option(self) -> Option<V> {
        match self {
            Self::Hit(v) => Some(v),
            Self::Miss | Self::Stale => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

struct CacheState<V> {
    entries: FifoStore<String, CacheEntry<V>>,
    stats: CacheStats,
}

/// Result cache owned by one calculator.
pub struct ResultCache<V> {
    owner: String,
    ttl: Duration,
    state: Mutex<CacheState<V>>,
}

impl<V: Clone> ResultCache<V> {
    pub fn new(owner: impl Into<String>) -> Self {
        Self::with_config(owner, &CacheConfig::default())
    }

    pub fn with_config(owner: impl Into<String>, config: &CacheConfig) -> Self {
        Self {
            owner: owner.into(),
            ttl: config.ttl(),
            state: Mutex::new(CacheState {
                entries: FifoStore::new(config.max_entries),
                stats: CacheStats::default(),
            }),
        }
    }

    /// Identifier of the calculator owning this cache.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached value for `inputs`, or `None` on a miss or expired entry.
    pub fn get<I: Serialize + ?Sized>(&self, inputs: &I) -> CacheResult<Option<V>> {
        Ok(self.lookup(inputs)?.into_option())
    }

    /// Read with the stale case reported separately.
    pub fn lookup<I: Serialize + ?Sized>(&self, inputs: &I) -> CacheResult<Lookup<V>> {
        let key = cache_key(inputs)?;
        Ok(self.lookup_key(&key))
    }

    /// Read by precomputed key.
    pub fn lookup_key(&self, key: &str) -> Lookup<V> {
        let now = Instant::now();
        let mut state = self.lock();

        let found = state
            .entries
            .get(key)
            .map(|entry| entry.is_fresh(self.ttl, now).then(|| entry.value.clone()));

        match found {
            None => {
                state.stats.misses += 1;
                Lookup::Miss
            }
            Some(Some(value)) => {
                state.stats.hits += 1;
                tracing::debug!(target: "result_cache", owner = %self.owner, "cache hit");
                Lookup::Hit(value)
            }
            Some(None) => {
                state.entries.remove(key);
                state.stats.misses += 1;
                state.stats.stale_reads += 1;
                tracing::debug!(target: "result_cache", owner = %self.owner, "stale entry dropped");
                Lookup::Stale
            }
        }
    }

    /// Store `value` for `inputs`, evicting the oldest entry when full.
    pub fn set<I: Serialize + ?Sized>(&self, inputs: &I, value: V) -> CacheResult<()> {
        let key = cache_key(inputs)?;
        self.set_key(key, value);
        Ok(())
    }

    /// Store by precomputed key.
    pub fn set_key(&self, key: String, value: V) {
        let mut state = self.lock();
        if state.entries.insert(key, CacheEntry::new(value)).is_some() {
            state.stats.evictions += 1;
            tracing::trace!(target: "result_cache", owner = %self.owner, "entry evicted");
        }
    }

    /// Remove every entry for this owner.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.stats.reset();
    }

    /// Number of stored entries, expired ones included until read.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> std::fmt::Debug for ResultCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("owner", &self.owner)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
