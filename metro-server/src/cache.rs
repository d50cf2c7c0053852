//! Caching layer for route search results.
//!
//! Route search is pure over an immutable graph, so a found route stays
//! valid until the graph is rebuilt. Keys carry the generation of the graph
//! they were searched on; a route found on a replaced graph never answers a
//! lookup against its successor. Unreachable pairs are not cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{PathResult, SearchMode, StationId};

/// Cache key for routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteKey {
    /// Generation of the graph the route was searched on
    pub generation: u64,
    pub origin: StationId,
    pub destination: StationId,
    pub mode: SearchMode,
}

impl RouteKey {
    pub fn new(
        generation: u64,
        origin: StationId,
        destination: StationId,
        mode: SearchMode,
    ) -> Self {
        Self {
            generation,
            origin,
            destination,
            mode,
        }
    }
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 10_000,
        }
    }
}

/// Cache for found routes.
pub struct RouteCache {
    routes: MokaCache<RouteKey, Arc<PathResult>>,
}

impl RouteCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { routes }
    }

    pub async fn get(&self, key: &RouteKey) -> Option<Arc<PathResult>> {
        self.routes.get(key).await
    }

    pub async fn insert(&self, key: RouteKey, route: Arc<PathResult>) {
        self.routes.insert(key, route).await;
    }

    /// Look up a route, computing and caching it on a miss.
    ///
    /// `search` runs only on a miss; a `None` result is returned as is and
    /// not stored.
    pub async fn get_or_search<F>(&self, key: RouteKey, search: F) -> Option<Arc<PathResult>>
    where
        F: FnOnce() -> Option<PathResult>,
    {
        if let Some(cached) = self.get(&key).await {
            return Some(cached);
        }

        let route = Arc::new(search()?);
        self.insert(key, route.clone()).await;
        Some(route)
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count()
    }

    /// Invalidate all cached entries.
    ///
    /// Entries inserted concurrently may survive; generation keys keep
    /// them from being served.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
