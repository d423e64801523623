pub mod in_memory;

pub use in_memory::{CacheEntry, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, InMemorySearchCache};

use std::time::SystemTime;

use crate::models::SearchResult;

pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Fingerprint-keyed store for aggregated results.
///
/// Operations are synchronous and complete without yielding. Racing
/// get-then-set pairs on one fingerprint resolve as last write wins.
pub trait SearchCacheStore: Send + Sync {
    fn get(&self, fingerprint: &str) -> Option<SearchResult>;

    fn set(&self, fingerprint: &str, result: SearchResult);

    /// Returns true if an entry was removed.
    fn invalidate(&self, fingerprint: &str) -> bool;

    /// Drops every expired entry, returning how many were removed.
    fn prune(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
