//! Target resolver — orchestrates the fallback chain.
//!
//! Name flow: Cache → Sesame → built-in catalog → error

use super::cache::TargetCache;
use super::providers;
use super::types::{ResolveError, ResolvedTarget, TargetSource};
use crate::coord::Coordinate;
use std::sync::Mutex;
use tracing::{debug, info};

/// The name resolver with its fallback pipeline.
///
/// Shared between request handlers: the cache lock is held only for cache
/// reads and writes, never across the Sesame round-trip.
pub struct TargetResolver {
    cache: Mutex<TargetCache>,
    offline: bool,
}

impl TargetResolver {
    pub fn new() -> Self {
        Self::with_cache(TargetCache::load())
    }

    /// Create a resolver with a specific cache.
    pub fn with_cache(cache: TargetCache) -> Self {
        Self {
            cache: Mutex::new(cache),
            offline: false,
        }
    }

    /// Set offline mode — skip network calls.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Resolve an object name through the full fallback chain.
    pub fn resolve(&self, query: &str) -> Result<ResolvedTarget, ResolveError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResolveError::NoInput);
        }

        // 1. Cache
        if let Some(target) = self.lock_cache().get(query) {
            debug!(query, name = %target.name, "cache hit");
            return Ok(target);
        }

        // 2. Sesame (if online)
        if !self.offline {
            match providers::sesame_resolve(query) {
                Ok(target) => {
                    info!(query, name = %target.name, "resolved via Sesame");
                    self.lock_cache().put(query, &target);
                    return Ok(target);
                }
                Err(e) => debug!(query, error = %e, "Sesame lookup failed, trying built-in catalog"),
            }
        }

        // 3. Built-in catalog (always available)
        if let Some(target) = providers::builtin_lookup(query) {
            debug!(query, name = %target.name, "resolved from built-in catalog");
            return Ok(target);
        }

        Err(ResolveError::NotFound(query.to_string()))
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, TargetCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Wrap a user-supplied position as a target.
    pub fn from_manual(coord: Coordinate) -> ResolvedTarget {
        ResolvedTarget {
            name: coord.to_string(),
            coord,
            source: TargetSource::Manual,
            display_name: None,
            object_type: None,
        }
    }
}

impl Default for TargetResolver {
    fn default() -> Self {
        Self::new()
    }
}
