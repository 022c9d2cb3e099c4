//! DnsCache: thread-safe hostname to address cache

use std::sync::OnceLock;

use tracing::debug;

use crate::barrier::WriteBarrier;
use crate::config::configured_capacity;
use crate::error::{Error, Result};
use crate::lru::{LruCache, PutOutcome};
use crate::stats::CacheStats;

static CACHE: OnceLock<DnsCache> = OnceLock::new();

/// Process-wide cache, built on first use from [`configured_capacity`]
///
/// Capacity is fixed from then on; reconfiguring afterwards has no effect
/// on this instance.
pub fn cache() -> &'static DnsCache {
    CACHE.get_or_init(|| {
        let capacity = configured_capacity();
        debug!(capacity, "Creating process-wide DNS cache");
        DnsCache::new(capacity)
    })
}

/// Fixed-capacity LRU cache of resolved hostnames
pub struct DnsCache {
    /// Recency list and key index, locked as one unit
    entries: WriteBarrier<LruCache<String, String>>,

    /// Cache statistics
    stats: CacheStats,
}

impl DnsCache {
    /// Create a cache holding at most `capacity` names
    ///
    /// # Panics
    /// Panics if `capacity` is 0; see [`DnsCache::try_new`].
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: WriteBarrier::new(LruCache::new(capacity)),
            stats: CacheStats::new(),
        }
    }

    /// Create a cache, refusing a zero capacity
    pub fn try_new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        Ok(Self::new(capacity))
    }

    /// Store the address for `name`, making it the most recently used entry
    ///
    /// A new name evicts the least recently used one when the cache is full.
    pub fn update(&self, name: &str, ip: &str) {
        let mut entries = self.entries.begin_write();

        match entries.put(name.to_owned(), ip.to_owned()) {
            PutOutcome::Updated => self.stats.record_update(),
            PutOutcome::Inserted { evicted } => {
                self.stats.record_insert();
                if evicted.is_some() {
                    self.stats.record_eviction();
                }
            }
        }
    }

    /// Look up the address for `name`
    ///
    /// Returns an empty string on a miss. A hit counts as a use.
    pub fn resolve(&self, name: &str) -> String {
        self.lookup(name).unwrap_or_default()
    }

    /// Look up the address for `name`, with `None` on a miss
    pub fn lookup(&self, name: &str) -> Option<String> {
        let mut entries = self.entries.settled();

        match entries.get(name) {
            Some(ip) => {
                self.stats.record_hit();
                Some(ip.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Check whether `name` is cached without refreshing it
    pub fn contains(&self, name: &str) -> bool {
        self.entries.settled().contains(name)
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current number of cached names
    pub fn len(&self) -> usize {
        self.entries.settled().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.settled().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.entries.settled().capacity()
    }

    /// Copy out every cached pair, most recently used first
    ///
    /// Does not refresh recency.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.entries
            .settled()
            .iter()
            .map(|(name, ip)| (name.clone(), ip.clone()))
            .collect()
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        let mut entries = self.entries.begin_write();
        entries.clear();
        self.stats.reset();
    }

    #[cfg(test)]
    fn sizes(&self) -> (usize, usize) {
        let entries = self.entries.settled();
        (entries.len(), entries.list_len())
    }
}
