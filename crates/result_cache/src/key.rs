//! Deterministic cache keys

use crate::error::CacheResult;
use serde::Serialize;

/// Serialize arguments into a cache key.
///
/// Values go through `serde_json::Value` first, whose maps are ordered by
/// key, so two records with the same fields produce the same key regardless
/// of the order they were built in.
pub fn cache_key<T: Serialize + ?Sized>(args: &T) -> CacheResult<String> {
    let value = serde_json::to_value(args)?;
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_key_ignores_map_order() {
        let mut a = HashMap::new();
        a.insert("principal", 1000.0);
        a.insert("rate", 5.0);
        a.insert("years", 30.0);

        let mut b = HashMap::new();
        b.insert("years", 30.0);
        b.insert("rate", 5.0);
        b.insert("principal", 1000.0);

        assert_eq!(cache_key(&a).unwrap(), cache_key(&b).unwrap());
    }

    #[test]
    fn test_key_distinguishes_values() {
        assert_ne!(cache_key(&(1, 2)).unwrap(), cache_key(&(2, 1)).unwrap());
        assert_ne!(cache_key("1").unwrap(), cache_key(&1).unwrap());
    }

    #[test]
    fn test_non_string_map_keys_fail() {
        let mut m = HashMap::new();
        m.insert((1, 2), "pair");
        assert!(cache_key(&m).is_err());
    }
}
