//! In-memory response cache.
//!
//! Successful responses are stored under a key derived from the request
//! (see [`cache_key`]) and served until their TTL elapses. The cache is bounded
//! by `maxCacheSize`: expired entries are dropped first, then the oldest ones.
//!
//! The cache is an optimization only. With `cacheResponses` disabled, `get`
//! always misses and `set` never stores.

pub mod clock;
pub mod key;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::cache_key;

use crate::config::SettingsHandle;
use crate::models::{RequestConfig, RequestResponse};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A cached response with its creation time and TTL.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub response: RequestResponse,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub ttl_ms: i64,
}

impl CacheEntry {
    /// An entry is fresh while `now - timestamp < ttl`.
    pub fn is_expired(&self, now: i64) -> bool {
        now.saturating_sub(self.timestamp) >= self.ttl_ms
    }
}

/// Counters describing cache usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Key-based, TTL-bounded response cache.
pub struct CacheService {
    settings: SettingsHandle,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheService {
    /// Creates a cache that reads its limits from `settings` and uses the
    /// system clock.
    pub fn new(settings: SettingsHandle) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: SettingsHandle, clock: Arc<dyn Clock>) -> Self {
        Self {
            settings,
            clock,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Looks up a fresh cached response for the request.
    ///
    /// Expired entries are removed on the way. Always `None` while caching
    /// is disabled.
    pub fn get(&self, config: &RequestConfig) -> Option<RequestResponse> {
        if !self.settings.get().cache_responses {
            return None;
        }

        let key = cache_key(config);
        let now = self.clock.now_millis();
        let mut entries = self.entries.lock().ok()?;

        let result = match entries.get(&key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.response.clone()),
            Some(_) => {
                log::debug!("Cache entry expired: {}", key);
                entries.remove(&key);
                None
            }
            None => None,
        };

        if result.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    /// Stores a response for the request.
    ///
    /// When the cache is full it is pruned first, leaving room for the new
    /// entry. This also applies when the key is already cached. No-op while
    /// caching is disabled.
    pub fn set(&self, config: &RequestConfig, response: &RequestResponse) {
        let settings = self.settings.get();
        if !settings.cache_responses {
            return;
        }

        let key = cache_key(config);
        let now = self.clock.now_millis();
        let Ok(mut entries) = self.entries.lock() else {
            log::warn!("Response cache is unavailable; skipping store");
            return;
        };

        // An overwrite at capacity still drops expired entries, but the
        // replaced entry never pushes out a live one.
        let full = entries.len() >= settings.max_cache_size;
        entries.remove(&key);
        if full {
            let removed = prune_entries(&mut entries, now, settings.max_cache_size.saturating_sub(1));
            log::debug!("Pruned {} cache entries to make room", removed);
        }

        entries.insert(
            key,
            CacheEntry {
                response: response.clone(),
                timestamp: now,
                ttl_ms: settings.cache_ttl_ms(),
            },
        );
    }

    /// Removes expired entries, then the oldest entries while the cache is
    /// over `maxCacheSize`.
    ///
    /// # Returns
    ///
    /// The number of entries removed.
    pub fn prune(&self) -> usize {
        let max_size = self.settings.get().max_cache_size;
        let now = self.clock.now_millis();
        match self.entries.lock() {
            Ok(mut entries) => prune_entries(&mut entries, now, max_size),
            Err(_) => 0,
        }
    }

    /// Drops all entries.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("stats", &self.stats())
            .finish()
    }
}

/// Two-phase pruning down to at most `limit` entries.
fn prune_entries(entries: &mut HashMap<String, CacheEntry>, now: i64, limit: usize) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now));

    if entries.len() > limit {
        let mut by_age: Vec<(String, i64)> = entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.timestamp))
            .collect();
        by_age.sort_by_key(|(_, timestamp)| *timestamp);

        let excess = entries.len() - limit;
        for (key, _) in by_age.into_iter().take(excess) {
            entries.remove(&key);
        }
    }

    before - entries.len()
}
