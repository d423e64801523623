use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use crate::cache::{Clock, SearchCacheStore, SystemClock};
use crate::models::SearchResult;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CacheEntry {
    pub result: SearchResult,
    pub inserted_at: SystemTime,
}

/// Process-local TTL cache. Expired entries are evicted lazily on lookup
/// and in bulk by `prune`; when full, inserting evicts the oldest entry.
pub struct InMemorySearchCache {
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl Default for InMemorySearchCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl InMemorySearchCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, DEFAULT_CACHE_CAPACITY, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_expired(&self, entry: &CacheEntry, now: SystemTime) -> bool {
        // A clock that moved backwards reads as age zero.
        now.duration_since(entry.inserted_at)
            .map(|age| age > self.ttl)
            .unwrap_or(false)
    }
}

impl SearchCacheStore for InMemorySearchCache {
    fn get(&self, fingerprint: &str) -> Option<SearchResult> {
        let now = self.clock.now();
        let mut entries = self.entries();

        let expired = self.is_expired(entries.get(fingerprint)?, now);
        if expired {
            entries.remove(fingerprint);
            tracing::debug!(fingerprint = %fingerprint, "evicted expired search cache entry");
            return None;
        }

        entries.get(fingerprint).map(|entry| entry.result.clone())
    }

    fn set(&self, fingerprint: &str, result: SearchResult) {
        let now = self.clock.now();
        let mut entries = self.entries();

        if !entries.contains_key(fingerprint) && entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            fingerprint.to_string(),
            CacheEntry {
                result,
                inserted_at: now,
            },
        );
    }

    fn invalidate(&self, fingerprint: &str) -> bool {
        self.entries().remove(fingerprint).is_some()
    }

    fn prune(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        before - entries.len()
    }

    fn len(&self) -> usize {
        self.entries().len()
    }
}
