//! Bounded, access-ordered response store.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use bytes::Bytes;
use lru::LruCache;

/// One previously fetched origin response.
///
/// Immutable once constructed; a refreshed response replaces the
/// entry rather than mutating it.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    /// Status line plus header block, including the terminating blank line.
    pub head: String,
    /// Raw response body.
    pub body: Bytes,
    created_at: Instant,
}

impl CachedEntry {
    pub fn new(head: String, body: Bytes) -> Self {
        Self {
            head,
            body,
            created_at: Instant::now(),
        }
    }

    fn expired_at(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.created_at) > ttl
    }
}

/// Shared response cache keyed by request target.
///
/// Bounded at a fixed entry count; every lookup marks its entry
/// most-recently-used, and an insert past capacity evicts the
/// least-recently-used entry. Lookups never check the TTL; removal
/// of aged entries is the janitor's job.
pub struct ResponseCache {
    entries: Mutex<LruCache<String, Arc<CachedEntry>>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).expect("cache capacity must be non-zero");
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Look up a response, marking it most-recently-used on a hit.
    pub fn get(&self, key: &str) -> Option<Arc<CachedEntry>> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.get(key).cloned()
    }

    /// Insert or replace a response. Past capacity, the
    /// least-recently-used entry is evicted.
    pub fn put(&self, key: String, entry: CachedEntry) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.put(key, Arc::new(entry));
    }

    /// Remove every entry older than the TTL. Returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    fn sweep_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");

        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.expired_at(now, self.ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            entries.pop(key);
        }

        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(body: &str) -> CachedEntry {
        CachedEntry::new(
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\n".to_string(),
            Bytes::copy_from_slice(body.as_bytes()),
        )
    }

    #[test]
    fn put_then_get_returns_the_entry_unchanged() {
        let cache = ResponseCache::new(4, Duration::from_secs(60));
        cache.put("/a".to_string(), entry("alpha"));

        let hit = cache.get("/a").expect("entry should be present");
        assert_eq!(hit.body, Bytes::from_static(b"alpha"));
        assert!(hit.head.starts_with("HTTP/1.1 200 OK"));
    }

    #[test]
    fn insert_past_capacity_evicts_the_least_recently_used() {
        let cache = ResponseCache::new(3, Duration::from_secs(60));
        cache.put("/a".to_string(), entry("a"));
        cache.put("/b".to_string(), entry("b"));
        cache.put("/c".to_string(), entry("c"));

        // Touch /a so /b becomes the eviction candidate.
        cache.get("/a");
        cache.put("/d".to_string(), entry("d"));

        assert_eq!(cache.len(), 3);
        assert!(cache.get("/b").is_none());
        assert!(cache.get("/a").is_some());
        assert!(cache.get("/d").is_some());
    }

    #[test]
    fn replacement_refreshes_an_entry() {
        let cache = ResponseCache::new(4, Duration::from_secs(60));
        cache.put("/a".to_string(), entry("old"));
        cache.put("/a".to_string(), entry("new"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("/a").unwrap().body, Bytes::from_static(b"new"));
    }

    #[test]
    fn sweep_removes_entries_past_ttl_and_keeps_younger_ones() {
        let ttl = Duration::from_secs(60);
        let cache = ResponseCache::new(4, ttl);
        cache.put("/old".to_string(), entry("old"));

        let removed = cache.sweep_expired_at(Instant::now() + Duration::from_secs(61));
        assert_eq!(removed, 1);
        assert!(cache.get("/old").is_none());

        cache.put("/young".to_string(), entry("young"));
        let removed = cache.sweep_expired_at(Instant::now() + Duration::from_secs(30));
        assert_eq!(removed, 0);
        assert!(cache.get("/young").is_some());
    }

    #[test]
    fn get_does_not_check_ttl() {
        let cache = ResponseCache::new(4, Duration::from_millis(1));
        cache.put("/stale".to_string(), entry("stale"));
        std::thread::sleep(Duration::from_millis(10));

        // Stale but unswept entries are still served.
        assert!(cache.get("/stale").is_some());
    }
}
