//! Process-wide TTL cache for expensive catalog calls and derived data.
//!
//! One convention rules this module: every expiry is an epoch-seconds `i64` produced by a single [`Clock`], and
//! every freshness comparison happens against that same representation. Timezone-aware and naive timestamps never
//! meet in a comparison here.
//!
//! Values are stored as JSON. A value that no longer round-trips is treated as a miss and dropped, never surfaced as
//! an error: a cold cache is always a valid state.

use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use log::*;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Source of "now" for the cache subsystem, in epoch seconds.
pub trait Clock: Send + Sync {
    fn now_epoch(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch(&self) -> i64 {
        Utc::now().timestamp()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: i64,
}

/// Shared key → (value, expiry) store with per-call TTLs.
///
/// Expired entries are evicted lazily on the next access, never swept. Mutation goes through a single
/// check-then-set path per key; concurrent writers on the same key resolve last-writer-wins.
pub struct TtlCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
    enabled: bool,
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.entries.lock().unwrap_or_else(|e| e.into_inner()).len();
        write!(f, "TtlCache ({count} entries, enabled: {})", self.enabled)
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TtlCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { entries: Mutex::new(HashMap::new()), clock, enabled: true }
    }

    /// A cache that never stores anything. Every lookup is a miss, so callers behave exactly as on a cold start.
    pub fn disabled() -> Self {
        Self { entries: Mutex::new(HashMap::new()), clock: Arc::new(SystemClock), enabled: false }
    }

    pub fn now_epoch(&self) -> i64 {
        self.clock.now_epoch()
    }

    /// Look up a non-expired entry. Expired or undecodable entries are evicted and reported as a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }
        let now = self.clock.now_epoch();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(key)?;
        if now >= entry.expires_at {
            trace!("Cache entry {key} expired {}s ago", now - entry.expires_at);
            entries.remove(key);
            return None;
        }
        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Cache entry {key} no longer decodes ({e}). Dropping it");
                entries.remove(key);
                None
            },
        }
    }

    /// Store a value under `key` for `ttl_secs` seconds. Undecodable values are logged and skipped.
    pub fn put<T: Serialize>(&self, key: &str, value: &T, ttl_secs: i64) {
        if !self.enabled {
            return;
        }
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                error!("Could not serialize cache value for {key}: {e}");
                return;
            },
        };
        let expires_at = self.clock.now_epoch() + ttl_secs;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), CacheEntry { value, expires_at });
    }

    pub fn delete(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }

    /// Return the cached value for `key` if it is still live, otherwise run `compute`, store its result for
    /// `ttl_secs`, and return it. The compute function is not invoked on a hit.
    pub async fn get_or_compute<T, E, F, Fut>(&self, key: &str, ttl_secs: i64, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get::<T>(key) {
            trace!("Cache hit for {key}");
            return Ok(hit);
        }
        trace!("Cache miss for {key}");
        self.compute_and_store(key, ttl_secs, compute).await
    }

    /// Bypass mode: skip the lookup entirely, always recompute, and still write the fresh result back so that
    /// subsequent [`Self::get_or_compute`] calls benefit.
    pub async fn refresh<T, E, F, Fut>(&self, key: &str, ttl_secs: i64, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        trace!("Cache bypass for {key}");
        self.compute_and_store(key, ttl_secs, compute).await
    }

    async fn compute_and_store<T, E, F, Fut>(&self, key: &str, ttl_secs: i64, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let value = compute().await?;
        self.put(key, &value, ttl_secs);
        Ok(value)
    }
}

/// Cache key builders, namespaced by purpose so unrelated data classes can never collide.
pub mod keys {
    /// One inventory snapshot per seller. Keying on the seller alone is the point: N users interested in the same
    /// seller share one fetch instead of N.
    pub fn seller_inventory(seller_name: &str) -> String {
        format!("inventory:{seller_name}")
    }

    pub fn wantlist(user_id: i64) -> String {
        format!("wantlist:{user_id}")
    }

    pub fn seller_profile(seller_name: &str) -> String {
        format!("seller:{seller_name}")
    }

    pub fn listing(listing_id: i64) -> String {
        format!("listing:{listing_id}")
    }
}

#[cfg(test)]
mod test {
    use std::{
        convert::Infallible,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::test_utils::ManualClock;

    fn counting_compute(calls: &Arc<AtomicUsize>, value: i32) -> impl Future<Output = Result<i32, Infallible>> {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        }
    }

    #[tokio::test]
    async fn second_call_within_ttl_computes_exactly_once() {
        let clock = Arc::new(ManualClock::new(1_000));
        let cache = TtlCache::with_clock(clock.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache.get_or_compute("k", 60, || counting_compute(&calls, 7)).await.unwrap();
        clock.advance(59);
        let second = cache.get_or_compute("k", 60, || counting_compute(&calls, 8)).await.unwrap();

        assert_eq!(first, 7);
        assert_eq!(second, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_recomputes_and_extends_the_expiry() {
        let clock = Arc::new(ManualClock::new(1_000));
        let cache = TtlCache::with_clock(clock.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        cache.get_or_compute("k", 60, || counting_compute(&calls, 1)).await.unwrap();
        clock.advance(60);
        let recomputed = cache.get_or_compute("k", 60, || counting_compute(&calls, 2)).await.unwrap();
        assert_eq!(recomputed, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // The new entry expires at recompute-time + ttl, not at the original expiry.
        clock.advance(59);
        let still_cached = cache.get_or_compute("k", 60, || counting_compute(&calls, 3)).await.unwrap();
        assert_eq!(still_cached, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn bypass_always_computes_and_rewrites_the_entry() {
        let clock = Arc::new(ManualClock::new(1_000));
        let cache = TtlCache::with_clock(clock.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        cache.get_or_compute("k", 600, || counting_compute(&calls, 1)).await.unwrap();
        let refreshed = cache.refresh("k", 600, || counting_compute(&calls, 2)).await.unwrap();
        assert_eq!(refreshed, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // The refreshed value is what later normal calls see.
        let cached = cache.get_or_compute("k", 600, || counting_compute(&calls, 3)).await.unwrap();
        assert_eq!(cached, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn disabled_cache_never_stores() {
        let cache = TtlCache::disabled();
        let calls = Arc::new(AtomicUsize::new(0));
        cache.get_or_compute("k", 600, || counting_compute(&calls, 1)).await.unwrap();
        cache.get_or_compute("k", 600, || counting_compute(&calls, 2)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.get::<i32>("k"), None);
    }

    #[tokio::test]
    async fn delete_forces_a_recompute() {
        let clock = Arc::new(ManualClock::new(1_000));
        let cache = TtlCache::with_clock(clock);
        let calls = Arc::new(AtomicUsize::new(0));
        cache.get_or_compute("k", 600, || counting_compute(&calls, 1)).await.unwrap();
        cache.delete("k");
        cache.get_or_compute("k", 600, || counting_compute(&calls, 2)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn keys_are_namespaced_by_purpose() {
        assert_eq!(keys::seller_inventory("vinyl_vault"), "inventory:vinyl_vault");
        assert_eq!(keys::wantlist(42), "wantlist:42");
        assert_eq!(keys::seller_profile("vinyl_vault"), "seller:vinyl_vault");
        assert_eq!(keys::listing(7), "listing:7");
        assert_ne!(keys::seller_inventory("42"), keys::wantlist(42));
    }
}
