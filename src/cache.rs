use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info};

use crate::cache_ttl::{get_cleanup_interval, get_validation_result_ttl};

// ============================================================================
// CACHE ENTRY
// ============================================================================

#[derive(Clone)]
struct CacheEntry {
    /// Pre-rendered JSON, written back byte for byte on a hit
    body: String,
    /// `None` never expires
    expiry: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expiry.map_or(true, |expiry| expiry > now)
    }
}

// ============================================================================
// RESULT CACHE
// ============================================================================

/// In-memory response cache keyed by the validation cache key.
///
/// Clones share the same table. Concurrent `get`/`set` on one key never see a
/// partially written entry; two concurrent misses may both write, the last
/// one wins.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<DashMap<String, CacheEntry>>,
    default_ttl: Duration,
    cleanup_interval: Duration,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(get_validation_result_ttl(), get_cleanup_interval())
    }
}

impl ResultCache {
    pub fn new(default_ttl: Duration, cleanup_interval: Duration) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            default_ttl,
            cleanup_interval,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let entry = self.store.get(key)?;
        if entry.is_live(Instant::now()) {
            return Some(entry.body.clone());
        }
        // Expired but not swept yet
        None
    }

    /// Store `body` under `key`. A zero `ttl` keeps the entry until restart.
    pub fn set(&self, key: String, body: String, ttl: Duration) {
        let expiry = if ttl.is_zero() {
            None
        } else {
            Some(Instant::now() + ttl)
        };
        self.store.insert(key, CacheEntry { body, expiry });
    }

    /// Store `body` with the default TTL.
    pub fn set_default(&self, key: String, body: String) {
        self.set(key, body, self.default_ttl);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Remove all expired entries from the cache
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_at(Instant::now())
    }

    fn cleanup_expired_at(&self, now: Instant) -> usize {
        let before_count = self.store.len();
        self.store.retain(|_, entry| entry.is_live(now));
        let removed = before_count.saturating_sub(self.store.len());
        if removed > 0 {
            debug!("🧹 ResultCache cleanup: removed {} expired entries", removed);
        }
        removed
    }

    /// Start the periodic sweep. The task runs until the runtime shuts down or
    /// the returned handle is aborted.
    pub fn start_background_cleanup(&self) -> JoinHandle<()> {
        let cache = self.clone();
        let period = self.cleanup_interval;
        tokio::spawn(async move {
            let mut cleanup_interval = interval(period);
            info!("🔄 Started background cache cleanup task (interval: {}s)", period.as_secs());

            loop {
                cleanup_interval.tick().await;
                cache.cleanup_expired();
            }
        })
    }
}
