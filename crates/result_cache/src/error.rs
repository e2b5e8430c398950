//! Error types for result caching.

use thiserror::Error;

/// Errors that can occur while caching results.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Arguments could not be turned into a cache key
    #[error("Cannot build cache key: {0}")]
    KeySerialization(#[from] serde_json::Error),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
