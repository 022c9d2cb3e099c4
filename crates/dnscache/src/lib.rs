//! # dnscache
//!
//! Fixed-capacity, thread-safe LRU cache mapping hostnames to resolved
//! addresses. It sits in front of a slow resolver and never resolves
//! anything itself.
//!
//! ## Architecture
//! - **Recency list**: slab-backed doubly-linked list, O(1) splice and eviction
//! - **Key index**: AHash map from hostname to list handle
//! - **Write barrier**: mutex + condvar ordering lookups after in-flight updates
//!
//! ```
//! use dnscache::DnsCache;
//!
//! let cache = DnsCache::new(10);
//! assert_eq!(cache.resolve("example.com"), "");
//!
//! cache.update("example.com", "93.184.216.34");
//! assert_eq!(cache.resolve("example.com"), "93.184.216.34");
//! ```

#![warn(missing_docs)]

mod barrier;
mod cache;
mod config;
mod error;
mod list;
mod lru;
mod stats;

pub use barrier::{SettledGuard, WriteBarrier, WriteGuard};
pub use cache::{cache, DnsCache};
pub use config::{
    configure_capacity, configured_capacity, is_valid_capacity, try_configure_capacity,
    DEFAULT_CAPACITY, MAX_CAPACITY, MIN_CAPACITY,
};
pub use error::{Error, Result};
pub use list::{Handle, Iter, RecencyList};
pub use lru::{LruCache, PutOutcome};
pub use stats::CacheStats;
