//! TTL-bounded result cache kept outside the engine
//!
//! Keyed by the canonical JSON of a validated [`Profile`]. One cache should
//! front a single engine configuration; results from engines with different
//! assumptions or aggregation policies must not share a cache.

use crate::engine::CalculationResult;
use crate::error::EngineError;
use crate::profile::Profile;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::collections::HashMap;

/// Canonical cache key for a profile
pub fn cache_key(profile: &Profile) -> Option<String> {
    serde_json::to_string(profile).ok()
}

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: DateTime<Utc>,
    result: CalculationResult,
}

/// Calculation results by profile, expiring after a fixed TTL
#[derive(Debug)]
pub struct CalculationCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,

    /// Statistics
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub expirations: u64,
}

impl CalculationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            cache_hits: 0,
            cache_misses: 0,
            expirations: 0,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now - entry.stored_at < self.ttl
    }

    /// Cached result for `profile` if present and not expired at `now`
    pub fn get(&mut self, profile: &Profile, now: DateTime<Utc>) -> Option<CalculationResult> {
        let key = cache_key(profile)?;

        let fresh = match self.entries.get(&key) {
            Some(entry) => self.is_fresh(entry, now),
            None => {
                self.cache_misses += 1;
                return None;
            }
        };

        if !fresh {
            self.entries.remove(&key);
            self.expirations += 1;
            self.cache_misses += 1;
            return None;
        }

        self.cache_hits += 1;
        self.entries.get(&key).map(|entry| entry.result.clone())
    }

    /// Store a result computed at `now`, dropping entries already expired by then
    pub fn insert(&mut self, profile: &Profile, result: CalculationResult, now: DateTime<Utc>) {
        let purged = self.purge_expired(now);
        if purged > 0 {
            debug!("purged {} expired cache entries", purged);
        }

        if let Some(key) = cache_key(profile) {
            self.entries.insert(key, CacheEntry { stored_at: now, result });
        }
    }

    /// Return the cached result or compute, store and return a new one
    ///
    /// Failed calculations are not cached.
    pub fn get_or_calculate<F>(
        &mut self,
        profile: &Profile,
        now: DateTime<Utc>,
        calculate: F,
    ) -> Result<CalculationResult, EngineError>
    where
        F: FnOnce() -> Result<CalculationResult, EngineError>,
    {
        if let Some(result) = self.get(profile, now) {
            debug!("cache hit ({} entries)", self.entries.len());
            return Ok(result);
        }

        let result = calculate()?;
        self.insert(profile, result.clone(), now);
        Ok(result)
    }

    /// Drop every entry expired at `now`; returns how many were removed
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| now - entry.stored_at < ttl);
        let removed = before - self.entries.len();
        self.expirations += removed as u64;
        removed
    }

    /// Clear all cached data
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cache_hits = 0;
        self.cache_misses = 0;
        self.expirations = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}
