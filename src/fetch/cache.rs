//! Small in-memory LRU for section responses, keyed by [`FetchKey`].

use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;

use super::envelope::ApiEnvelope;
use super::request::FetchKey;

const CACHE_CAPACITY: usize = 32;

struct Entry<T> {
    stored_at: Instant,
    envelope: ApiEnvelope<T>,
}

/// Successful envelopes remembered for `ttl`.
///
/// Only `success: true` envelopes are stored; failures are always refetched.
pub struct ResponseCache<T> {
    ttl: Duration,
    lru: Mutex<LruCache<FetchKey, Entry<T>>>,
}

impl<T: Clone> ResponseCache<T> {
    /// Cache holding up to a few dozen keys for `ttl` each.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            ttl,
            lru: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Fresh entry for `key`; expired entries are evicted on lookup.
    #[must_use]
    pub fn get(&self, key: &FetchKey) -> Option<ApiEnvelope<T>> {
        let mut lru = self.lru.lock().unwrap_or_else(PoisonError::into_inner);
        let fresh = match lru.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.envelope.clone()),
            Some(_) => None,
            None => return None,
        };
        if fresh.is_none() {
            let _ = lru.pop(key);
            tracing::trace!(resource = %key.resource, "response cache entry expired");
        }
        fresh
    }

    /// Remember a successful envelope.
    pub fn put(&self, key: FetchKey, envelope: &ApiEnvelope<T>) {
        if !envelope.success {
            return;
        }
        let mut lru = self.lru.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = lru.put(
            key,
            Entry {
                stored_at: Instant::now(),
                envelope: envelope.clone(),
            },
        );
    }

    /// Number of stored entries, fresh or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lru.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
