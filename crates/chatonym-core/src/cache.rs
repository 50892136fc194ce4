#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

//! Idempotency cache for issued tokens.
//!
//! Bounded LRU with a per-entry time-to-live measured on the environment's
//! clock. Entries are only inserted after encryption succeeds, so a reader
//! never sees a partially built token.

use std::{
    hash::Hash,
    num::NonZeroUsize,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use lru::LruCache;

use crate::env::Environment;

struct CacheEntry<I> {
    token: String,
    inserted_at: I,
}

/// Token cache owned by a single codec.
///
/// Thread-safe through an internal mutex. Expired entries are dropped when
/// they are looked up; the least recently used entry is evicted when the
/// cache is full.
pub struct TokenCache<K, E: Environment> {
    env: E,
    ttl: Duration,
    entries: Mutex<LruCache<K, CacheEntry<E::Instant>>>,
}

impl<K: Hash + Eq, E: Environment> TokenCache<K, E> {
    /// Create an empty cache holding at most `capacity` entries for `ttl`
    /// each.
    pub fn new(env: E, capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self { env, ttl, entries: Mutex::new(LruCache::new(capacity)) }
    }

    /// Cached token for `key`, if present and not expired.
    pub fn get(&self, key: &K) -> Option<String> {
        let now = self.env.now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let lookup =
            entries.get(key).map(|entry| (now - entry.inserted_at < self.ttl, entry.token.clone()));

        match lookup {
            Some((true, token)) => Some(token),
            Some((false, _)) => {
                entries.pop(key);
                None
            },
            None => None,
        }
    }

    /// Store `token` under `key`, replacing any previous entry.
    pub fn insert(&self, key: K, token: String) {
        let inserted_at = self.env.now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.put(key, CacheEntry { token, inserted_at });
    }

    /// Number of entries, including expired ones not yet looked up.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    };

    use super::*;

    #[derive(Clone, Default)]
    struct TestEnv {
        clock_secs: Arc<AtomicU64>,
    }

    impl TestEnv {
        fn advance(&self, secs: u64) {
            self.clock_secs.fetch_add(secs, Ordering::SeqCst);
        }
    }

    impl Environment for TestEnv {
        type Instant = Duration;

        fn now(&self) -> Duration {
            Duration::from_secs(self.clock_secs.load(Ordering::SeqCst))
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            buffer.fill(0);
        }
    }

    fn cache(env: &TestEnv, capacity: usize, ttl_secs: u64) -> TokenCache<i64, TestEnv> {
        TokenCache::new(
            env.clone(),
            NonZeroUsize::new(capacity).unwrap(),
            Duration::from_secs(ttl_secs),
        )
    }

    #[test]
    fn returns_inserted_token() {
        let env = TestEnv::default();
        let cache = cache(&env, 4, 60);

        cache.insert(5, "token".to_string());

        assert_eq!(cache.get(&5), Some("token".to_string()));
        assert_eq!(cache.get(&6), None);
    }

    #[test]
    fn entry_expires_after_ttl() {
        let env = TestEnv::default();
        let cache = cache(&env, 4, 60);

        cache.insert(5, "token".to_string());

        env.advance(59);
        assert_eq!(cache.get(&5), Some("token".to_string()));

        env.advance(1);
        assert_eq!(cache.get(&5), None);
        assert!(cache.is_empty(), "expired entry is dropped on lookup");
    }

    #[test]
    fn lookup_does_not_extend_ttl() {
        let env = TestEnv::default();
        let cache = cache(&env, 4, 60);

        cache.insert(5, "token".to_string());
        env.advance(30);
        assert!(cache.get(&5).is_some());
        env.advance(30);

        assert_eq!(cache.get(&5), None);
    }

    #[test]
    fn evicts_least_recently_used() {
        let env = TestEnv::default();
        let cache = cache(&env, 2, 60);

        cache.insert(1, "one".to_string());
        cache.insert(2, "two".to_string());

        // Touch 1 so that 2 becomes least recently used
        assert!(cache.get(&1).is_some());
        cache.insert(3, "three".to_string());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some("one".to_string()));
        assert_eq!(cache.get(&3), Some("three".to_string()));
    }

    #[test]
    fn clear_empties_cache() {
        let env = TestEnv::default();
        let cache = cache(&env, 4, 60);

        cache.insert(1, "one".to_string());
        cache.clear();

        assert!(cache.is_empty());
    }

    #[test]
    fn reports_configured_ttl() {
        let env = TestEnv::default();
        assert_eq!(cache(&env, 4, 90).ttl(), Duration::from_secs(90));
    }
}
