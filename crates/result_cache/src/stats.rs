//! Cache statistics

use serde::{Deserialize, Serialize};

/// Hit/miss counters for a single cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    /// Misses, stale reads included
    pub misses: u64,
    /// Reads that found an expired entry
    pub stale_reads: u64,
    /// Entries removed to stay within capacity
    pub evictions: u64,
}

impl CacheStats {
    /// Hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
