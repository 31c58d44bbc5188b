//! Bucketed lookup cache with insertion timestamps
//!
//! A key's bucket is the sum of its character codes modulo the bucket
//! count. The hash is deliberately weak: any two keys that are anagrams of
//! each other ("ab" and "ba") share a bucket. There is no eviction; entries
//! stay until [`Cache::clear`].

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Bucket count used when none is configured
pub const DEFAULT_BUCKETS: usize = 100;

/// A cached value and when it was stored
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Cache<V> {
    buckets: Vec<HashMap<String, CacheEntry<V>>>,
}

impl<V> Default for Cache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKETS)
    }
}

impl<V> Cache<V> {
    /// Creates a cache with `bucket_count` buckets (at least one)
    pub fn new(bucket_count: usize) -> Self {
        let bucket_count = bucket_count.max(1);
        Self {
            buckets: (0..bucket_count).map(|_| HashMap::new()).collect(),
        }
    }

    /// Returns the bucket a key lands in
    pub fn bucket_index(&self, key: &str) -> usize {
        let total: u64 = key.chars().map(|c| u64::from(c as u32)).sum();
        (total % self.buckets.len() as u64) as usize
    }

    /// Stores a value stamped with the current time
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.set_at(key, value, Utc::now());
    }

    /// Stores a value with an explicit timestamp
    pub fn set_at(&mut self, key: impl Into<String>, value: V, inserted_at: DateTime<Utc>) {
        let key = key.into();
        let index = self.bucket_index(&key);
        self.buckets[index].insert(key, CacheEntry { value, inserted_at });
    }

    /// Returns the cached value, if any
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entry(key).map(|entry| &entry.value)
    }

    /// Returns the cached value together with its timestamp
    pub fn entry(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.buckets[self.bucket_index(key)].get(key)
    }

    /// Drops every entry, keeping the bucket count
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(HashMap::is_empty)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns how many entries share the given bucket
    pub fn bucket_len(&self, index: usize) -> usize {
        self.buckets.get(index).map_or(0, HashMap::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn set_then_get() {
        let mut cache = Cache::default();
        cache.set("p-1", "Apollo");

        assert_eq!(cache.get("p-1"), Some(&"Apollo"));
        assert_eq!(cache.get("p-2"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn set_overwrites_and_restamps() {
        let mut cache = Cache::new(10);
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        cache.set_at("k", 1, early);
        cache.set_at("k", 2, late);

        let entry = cache.entry("k").unwrap();
        assert_eq!(entry.value, 2);
        assert_eq!(entry.inserted_at, late);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn anagrams_share_a_bucket() {
        let mut cache = Cache::default();
        assert_eq!(cache.bucket_index("ab"), cache.bucket_index("ba"));

        cache.set("ab", 1);
        cache.set("ba", 2);

        // Same bucket, still distinct entries
        assert_eq!(cache.bucket_len(cache.bucket_index("ab")), 2);
        assert_eq!(cache.get("ab"), Some(&1));
        assert_eq!(cache.get("ba"), Some(&2));
    }

    #[test]
    fn bucket_index_is_char_code_sum() {
        let cache: Cache<()> = Cache::new(100);
        // 'a' = 97, 'b' = 98
        assert_eq!(cache.bucket_index("ab"), 195 % 100);
        assert_eq!(cache.bucket_index(""), 0);
    }

    #[test]
    fn clear_empties_every_bucket() {
        let mut cache = Cache::new(4);
        for key in ["a", "b", "c", "d", "e"] {
            cache.set(key, ());
        }
        assert_eq!(cache.len(), 5);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.bucket_count(), 4);
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn zero_buckets_clamped_to_one() {
        let mut cache = Cache::new(0);
        cache.set("x", 1);
        assert_eq!(cache.bucket_count(), 1);
        assert_eq!(cache.get("x"), Some(&1));
    }
}
