//! In-memory TTL cache for lookup results.
//!
//! Backed by `DashMap` so concurrent requests only contend when they land on
//! the same shard. Entries are never removed on read; an expired entry is
//! simply treated as absent and overwritten by the next successful fetch.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::models::{Coordinate, HucResult, LookupLevel};

/// Decimal places kept when collapsing coordinates into a key (~1.1 m)
pub const KEY_PRECISION: i32 = 5;

/// Source of "now" for expiry decisions
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Rounded (lat, lng, level) triple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(coord: &Coordinate, level: &LookupLevel) -> Self {
        Self(format!(
            "{:.5}:{:.5}:{}",
            round_degrees(coord.lat),
            round_degrees(coord.lng),
            level
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn round_degrees(value: f64) -> f64 {
    let factor = 10f64.powi(KEY_PRECISION);
    // + 0.0 folds -0.0 into 0.0
    (value * factor).round() / factor + 0.0
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: HucResult,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Thread-safe lookup cache keyed by [`CacheKey`]
pub struct HucCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
    max_entries: Option<usize>,
    clock: Arc<dyn Clock>,
}

impl HucCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries: None,
            clock,
        }
    }

    /// Cap the number of stored entries
    pub fn with_max_entries(mut self, max_entries: Option<usize>) -> Self {
        self.max_entries = max_entries.filter(|m| *m > 0);
        self
    }

    /// Live payload for `key`, if any
    pub fn get(&self, key: &CacheKey) -> Option<HucResult> {
        let now = self.clock.now();
        let entry = self.entries.get(key)?;
        if entry.is_live(now) {
            Some(entry.payload.clone())
        } else {
            debug!("Cache entry {} expired at {}", key, entry.expires_at);
            None
        }
    }

    /// Store `payload` under `key`, expiring one TTL from now.
    pub fn put(&self, key: CacheKey, payload: HucResult) {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        if let Some(max) = self.max_entries {
            if !self.entries.contains_key(&key) && self.entries.len() >= max {
                self.make_room(max, now);
            }
        }

        self.entries.insert(
            key,
            CacheEntry {
                payload,
                expires_at,
            },
        );
    }

    /// Number of stored entries, live or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        self.purge_before(self.clock.now())
    }

    fn purge_before(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        before.saturating_sub(self.entries.len())
    }

    fn make_room(&self, max: usize, now: DateTime<Utc>) {
        self.purge_before(now);

        while self.entries.len() >= max {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|e| e.value().expires_at)
                .map(|e| e.key().clone());
            match oldest {
                Some(key) => {
                    debug!("Evicting cache entry {}", key);
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}
