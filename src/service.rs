//! HUC lookup service: validation, caching and upstream delegation.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::{CacheKey, HucCache};
use crate::config::Config;
use crate::error::LookupError;
use crate::models::{Coordinate, HucResult, LookupLevel};
use crate::upstream::{HucSource, WbdClient};

/// Resolves points to hydrologic units, memoizing successful answers
pub struct HucLookupService {
    source: Arc<dyn HucSource>,
    cache: HucCache,
}

impl HucLookupService {
    pub fn new(source: Arc<dyn HucSource>, cache: HucCache) -> Self {
        Self { source, cache }
    }

    /// Wire the WBD client and cache from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = WbdClient::new(config.upstream.clone())?;
        let cache = HucCache::new(config.cache.ttl()).with_max_entries(config.cache.max_entries);
        Ok(Self::new(Arc::new(client), cache))
    }

    /// Look up the unit containing `(raw_lat, raw_lng)` at `raw_level`.
    ///
    /// Cache hits never touch the network. Failures are never cached, so an
    /// identical request retries upstream.
    pub async fn lookup(
        &self,
        raw_lat: Option<&str>,
        raw_lng: Option<&str>,
        raw_level: Option<&str>,
    ) -> Result<HucResult, LookupError> {
        let coord = Coordinate::parse(raw_lat, raw_lng)?;
        let level = LookupLevel::parse(raw_level);
        self.lookup_point(coord, level).await
    }

    /// Same as [`lookup`](Self::lookup) for an already validated point
    pub async fn lookup_point(
        &self,
        coord: Coordinate,
        level: LookupLevel,
    ) -> Result<HucResult, LookupError> {
        let key = CacheKey::new(&coord, &level);

        if let Some(hit) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(hit);
        }

        debug!("Cache miss for {}", key);
        match self.source.fetch_huc(coord, &level).await {
            Ok(result) => {
                self.cache.put(key, result.clone());
                Ok(result)
            }
            Err(e) => {
                if let LookupError::LookupFailed(ref reason) = e {
                    warn!("Upstream lookup for {} failed: {}", key, reason);
                }
                Err(e)
            }
        }
    }

    /// Get the cache (for stats/debugging)
    pub fn cache(&self) -> &HucCache {
        &self.cache
    }
}
