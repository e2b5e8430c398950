//! Result Caching
//!
//! Caches for pure, deterministic computations:
//! - [`Memoizer`]: wraps any function, size-bounded, no expiry
//! - [`ResultCache`]: per-calculator cache with TTL expiry and a size bound
//! - [`ResultCacheRegistry`]: one `ResultCache` per owning calculator
//!
//! Both bounded caches evict the earliest-inserted entry when full. Reading
//! an entry does not protect it from eviction.
//!
//! Keys are derived from a deterministic JSON serialization of the
//! arguments, so structurally equal inputs share an entry.

mod error;
mod fifo;
mod key;
mod memo;
mod registry;
mod stats;
mod ttl;

pub use error::{CacheError, CacheResult};
pub use fifo::FifoStore;
pub use key::cache_key;
pub use memo::{memoize, memoize_with_key, Memoizer, DEFAULT_MEMO_CAPACITY};
pub use registry::ResultCacheRegistry;
pub use stats::CacheStats;
pub use ttl::{CacheConfig, CacheEntry, Lookup, ResultCache};
