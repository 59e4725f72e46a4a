//! Process-wide TTL store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use moka::Expiry;
use moka::sync::Cache;
use serde::Serialize;

use super::Payload;
use crate::telemetry;

/// Configuration for the cache store.
///
/// ```rust
/// # use dashgate::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(1_000)
///     .ttl(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Upper bound on stored entries. Default: 10,000.
    pub max_entries: u64,
    /// Lifetime of every entry stored through the executor. Default: 5 minutes.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(300),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// One stored value with its own expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Payload,
    pub stored_at: DateTime<Utc>,
    pub ttl: Duration,
}

/// Hit/miss counters and the current number of live keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub key_count: u64,
}

struct PerEntryTtl;

impl Expiry<String, CacheEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Key/value store with per-entry expiration.
///
/// Expired entries are never returned, whether or not moka has evicted
/// them yet. Capacity is bounded by [`CacheConfig::max_entries`].
pub struct CacheStore {
    entries: Cache<String, CacheEntry>,
    default_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStore {
    pub fn new(config: &CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_entries)
            .expire_after(PerEntryTtl)
            .build();
        Self {
            entries,
            default_ttl: config.ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// TTL the executor stores every computed value with.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Look up a live entry, counting a hit or a miss.
    pub fn get(&self, key: &str) -> Option<Payload> {
        let endpoint = telemetry::endpoint_label(key);
        match self.entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "endpoint" => endpoint)
                    .increment(1);
                tracing::debug!(key, "cache hit");
                Some(entry.value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "endpoint" => endpoint)
                    .increment(1);
                tracing::debug!(key, "cache miss");
                None
            }
        }
    }

    /// Look up a live entry without touching the counters.
    pub fn peek(&self, key: &str) -> Option<Payload> {
        self.entries.get(key).map(|entry| entry.value)
    }

    /// Store `value` under `key`, overwriting any existing entry and
    /// restarting its expiry.
    pub fn set(&self, key: impl Into<String>, value: Payload, ttl: Duration) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: Utc::now(),
                ttl,
            },
        );
    }

    /// Full entry for `key`, including when it was stored.
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key)
    }

    /// Live keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .map(|(key, _)| key.as_ref().clone())
            .collect();
        keys.sort();
        keys
    }

    /// Remove every entry and reset the hit/miss counters.
    pub fn flush_all(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        tracing::info!("cache flushed");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            key_count: self.keys().len() as u64,
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
