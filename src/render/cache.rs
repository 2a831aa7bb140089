//! Bounded insertion-order cache.
//!
//! Backs the per-row bound-intent cache so that scrolling through a large
//! dataset never grows memory without bound.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A cache with a fixed capacity that evicts the oldest inserted key first.
///
/// Lookups do not promote entries; replacing a value keeps its position.
pub struct BoundedCache<K: Hash + Eq + Clone, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> BoundedCache<K, V> {
    /// Create a new cache with the given capacity.
    ///
    /// A capacity of 0 disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert or replace a value. Returns the previous value, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }
        let previous = self.entries.insert(key.clone(), value);
        if previous.is_none() {
            self.order.push_back(key);
            self.enforce_cap();
        }
        previous
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn enforce_cap(&mut self) {
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_eviction_is_insertion_order() {
        let mut cache: BoundedCache<usize, &str> = BoundedCache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        assert_eq!(cache.get(&1), Some(&"a"));
        cache.insert(3, "c");

        // 1 was inserted first; reading it did not protect it
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.get(&3), Some(&"c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut cache: BoundedCache<usize, &str> = BoundedCache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        assert_eq!(cache.insert(1, "A"), Some("a"));
        cache.insert(3, "c");
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity() {
        let mut cache: BoundedCache<usize, i32> = BoundedCache::new(0);
        assert_eq!(cache.insert(1, 1), None);
        assert!(cache.is_empty());
    }
}
