//! Integration tests for eviction order and expiry
//!
//! Both bounded caches evict by insertion order. These tests pin that
//! behavior down: a key that was just read is still evicted first.

use result_cache::{memoize_with_key, CacheConfig, Memoizer, ResultCache, ResultCacheRegistry};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Memoizer keyed by the argument itself, counting invocations.
fn tracking_memo(capacity: usize) -> (Memoizer<String, String>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let memo = memoize_with_key(
        move |k: &String| {
            counter.fetch_add(1, Ordering::SeqCst);
            k.to_lowercase()
        },
        |k: &String| k.clone(),
    )
    .with_capacity(capacity);
    (memo, calls)
}

fn call(memo: &Memoizer<String, String>, key: &str) -> String {
    memo.call(&key.to_string()).unwrap()
}

#[test]
fn recently_read_key_is_evicted_first() {
    let (memo, calls) = tracking_memo(2);
    call(&memo, "A");
    call(&memo, "B");

    // Read A: a hit, but its position does not change
    call(&memo, "A");
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    call(&memo, "C");
    assert!(!memo.contains_key("A"), "first-inserted key must be evicted even after a read");
    assert!(memo.contains_key("B"));
    assert!(memo.contains_key("C"));
}

#[test]
fn capacity_plus_one_evicts_first_inserted() {
    let (memo, _) = tracking_memo(3);
    for key in ["A", "B", "C"] {
        call(&memo, key);
    }
    call(&memo, "A");
    call(&memo, "D");

    assert_eq!(memo.keys(), vec!["B", "C", "D"]);
}

#[test]
fn rereading_an_evicted_key_recomputes_and_reinserts_it() {
    let (memo, calls) = tracking_memo(2);
    call(&memo, "A");
    call(&memo, "B");
    call(&memo, "C"); // evicts A
    assert_eq!(memo.keys(), vec!["B", "C"]);

    call(&memo, "A"); // miss: recomputed, evicts B
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(memo.keys(), vec!["C", "A"]);

    call(&memo, "D"); // evicts C
    assert_eq!(memo.keys(), vec!["A", "D"]);
    assert!(!memo.contains_key("B"));
    assert_eq!(memo.stats().evictions, 3);
}

#[tokio::test(start_paused = true)]
async fn result_cache_expires_after_ttl() {
    let cache = ResultCache::new("algebra");
    cache.set(&json!({"a": 1}), 42).unwrap();
    assert_eq!(cache.get(&json!({"a": 1})).unwrap(), Some(42));

    tokio::time::advance(Duration::from_secs(5 * 60)).await;
    assert_eq!(cache.get(&json!({"a": 1})).unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn registry_caches_share_config() {
    let registry = ResultCacheRegistry::with_config(CacheConfig::with_limits(1, Duration::from_secs(1)));
    let cache = registry.cache_for("bmi");
    cache.set(&json!({"w": 1}), 1).unwrap();
    cache.set(&json!({"w": 2}), 2).unwrap();
    assert_eq!(cache.len(), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(cache.get(&json!({"w": 2})).unwrap(), None);
}
