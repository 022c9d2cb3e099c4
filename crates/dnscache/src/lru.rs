//! LRU (Least Recently Used) cache implementation
//!
//! Key index over a [`RecencyList`]. The list owns every entry, key included;
//! the index is a raw hash table of handles and hashes/compares through the
//! list, so each key is stored exactly once.

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};

use ahash::RandomState;
use hashbrown::HashTable;
use tracing::{trace, warn};

use crate::list::{Handle, RecencyList};

/// Entry owned by the recency list
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Result of [`LruCache::put`]
#[derive(Debug, PartialEq, Eq)]
pub enum PutOutcome<K, V> {
    /// Existing key, value replaced in place
    Updated,
    /// New key, possibly displacing the least recently used entry
    Inserted {
        /// Entry evicted to make room
        evicted: Option<(K, V)>,
    },
}

/// LRU cache with fixed capacity
pub struct LruCache<K, V> {
    table: HashTable<Handle>,
    hasher: RandomState,
    list: RecencyList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + std::fmt::Debug,
{
    /// Create a new LRU cache with the given capacity
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");

        Self {
            table: HashTable::with_capacity(capacity),
            hasher: RandomState::new(),
            list: RecencyList::with_capacity(capacity),
            capacity,
        }
    }

    /// Get a value from the cache, marking it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.find(key)?;
        self.list.move_to_front(handle);
        self.list.get(handle).map(|entry| &entry.value)
    }

    /// Check whether a key is cached without touching recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Insert or overwrite a key-value pair, marking it most recently used
    pub fn put(&mut self, key: K, value: V) -> PutOutcome<K, V> {
        if let Some(handle) = self.find(&key) {
            if let Some(entry) = self.list.get_mut(handle) {
                entry.value = value;
            }
            self.list.move_to_front(handle);
            return PutOutcome::Updated;
        }

        let evicted = if self.table.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let hash = self.hash(&key);
        let handle = self.list.push_front(Entry { key, value });

        let list = &self.list;
        let hasher = &self.hasher;
        self.table.insert_unique(hash, handle, |&h| {
            list.get(h)
                .map_or(0, |entry| BuildHasher::hash_one(hasher, &entry.key))
        });

        PutOutcome::Inserted { evicted }
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.table.clear();
        self.list.clear();
    }

    /// Iterate over entries from most to least recently used
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }

    fn hash<Q: Hash + ?Sized>(&self, key: &Q) -> u64 {
        BuildHasher::hash_one(&self.hasher, key)
    }

    fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let list = &self.list;
        self.table
            .find(self.hash(key), |&h| {
                list.get(h)
                    .is_some_and(|entry| <K as Borrow<Q>>::borrow(&entry.key) == key)
            })
            .copied()
    }

    /// Drop the least recently used entry.
    ///
    /// If the tail's handle is missing from the index the step is skipped and
    /// the cache temporarily exceeds its capacity.
    fn evict(&mut self) -> Option<(K, V)> {
        let tail = self.list.back_handle()?;
        let key = &self.list.back()?.key;
        let hash = self.hash(key);

        match self.table.find_entry(hash, |&h| h == tail) {
            Ok(indexed) => {
                indexed.remove();
            }
            Err(_) => {
                warn!(key = ?key, "LRU tail is not indexed, skipping eviction");
                return None;
            }
        }

        let entry = self.list.pop_back()?;
        trace!(key = ?entry.key, "Evicted least recently used entry");
        Some((entry.key, entry.value))
    }

    #[cfg(test)]
    pub(crate) fn list_len(&self) -> usize {
        self.list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<V>(cache: &LruCache<i32, V>) -> Vec<i32> {
        cache.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_lru_basic() {
        let mut cache = LruCache::new(2);

        assert_eq!(cache.get(&1), None);

        cache.put(1, "a");
        cache.put(2, "b");

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.list_len(), 2);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = LruCache::new(2);

        cache.put(1, "a");
        cache.put(2, "b");
        let outcome = cache.put(3, "c"); // Should evict 1

        assert_eq!(
            outcome,
            PutOutcome::Inserted {
                evicted: Some((1, "a"))
            }
        );
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.get(&3), Some(&"c"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.list_len(), 2);
    }

    #[test]
    fn test_lru_get_refreshes() {
        let mut cache = LruCache::new(2);

        cache.put(1, "a");
        cache.put(2, "b");
        cache.get(&1); // Move 1 to front
        cache.put(3, "c"); // Should evict 2

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&3), Some(&"c"));
    }

    #[test]
    fn test_lru_contains_does_not_refresh() {
        let mut cache = LruCache::new(2);

        cache.put(1, "a");
        cache.put(2, "b");
        assert!(cache.contains(&1));
        cache.put(3, "c");

        assert!(!cache.contains(&1));
        assert_eq!(keys(&cache), vec![3, 2]);
    }

    #[test]
    fn test_lru_overwrite() {
        let mut cache = LruCache::new(2);

        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.put(1, "z"), PutOutcome::Updated); // Overwrite

        assert_eq!(keys(&cache), vec![1, 2]);
        assert_eq!(cache.get(&1), Some(&"z"));
        assert_eq!(cache.len(), 2);

        // Overwrite refreshed 1, so 2 goes first
        cache.put(3, "c");
        assert_eq!(cache.get(&2), None);
    }

    #[test]
    fn test_lru_reuses_evicted_slots() {
        let mut cache = LruCache::new(3);

        for i in 0..100 {
            cache.put(i, "x");
        }

        assert_eq!(keys(&cache), vec![99, 98, 97]);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.list_len(), 3);
        for i in 97..100 {
            assert!(cache.contains(&i));
        }
        assert!(!cache.contains(&96));
    }

    #[test]
    fn test_lru_borrowed_lookup() {
        let mut cache: LruCache<String, String> = LruCache::new(4);

        cache.put("example.com".to_string(), "93.184.216.34".to_string());
        assert_eq!(
            cache.put("example.com".to_string(), "93.184.216.35".to_string()),
            PutOutcome::Updated
        );
        assert_eq!(cache.len(), 1);

        assert_eq!(
            cache.get("example.com").map(String::as_str),
            Some("93.184.216.35")
        );
        assert!(!cache.contains(""));
        assert!(!cache.contains("missing.org"));
    }

    #[test]
    fn test_lru_unindexed_tail_skips_eviction() {
        let mut cache = LruCache::new(2);

        cache.put(1, "a");
        cache.put(2, "b");

        // Drop the tail from the index but keep the index size by
        // indexing the head a second time under a foreign hash
        let tail = cache.list.back_handle().unwrap();
        let tail_hash = cache.hash(&1);
        cache
            .table
            .find_entry(tail_hash, |&h| h == tail)
            .ok()
            .unwrap()
            .remove();
        let head = cache.find(&2).unwrap();
        let foreign_hash = cache.hash(&7);
        cache.table.insert_unique(foreign_hash, head, |_| 0);
        assert_eq!(cache.len(), 2);

        let outcome = cache.put(3, "c");

        assert_eq!(outcome, PutOutcome::Inserted { evicted: None });
        assert_eq!(cache.list_len(), 3);
        assert_eq!(cache.get(&3), Some(&"c"));
        assert_eq!(cache.get(&2), Some(&"b"));
        assert!(!cache.contains(&7));
    }

    #[test]
    fn test_lru_clear() {
        let mut cache = LruCache::new(3);

        cache.put(1, "a");
        cache.put(2, "b");
        cache.clear();

        assert_eq!(cache.len(), 0);
        assert_eq!(cache.list_len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 3);
    }

    #[test]
    #[should_panic(expected = "Capacity must be greater than 0")]
    fn test_lru_zero_capacity() {
        let _ = LruCache::<i32, i32>::new(0);
    }
}
