//! File-based name cache at ~/.skytools/cache.json.
//!
//! TTL: 90 days. Keys are normalized names, so "M 31" and "m31" share an entry.

use super::providers::normalize_name;
use super::types::{ResolvedTarget, TargetSource};
use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CACHE_TTL_MS: i64 = 90 * 24 * 3600 * 1000;

#[derive(Serialize, Deserialize, Clone)]
struct CacheEntry {
    name: String,
    ra_hours: f64,
    dec_degrees: f64,
    timestamp: i64,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    object_type: Option<String>,
    #[serde(default)]
    source_name: Option<String>,
}

impl CacheEntry {
    fn from_target(target: &ResolvedTarget) -> Self {
        Self {
            name: target.name.clone(),
            ra_hours: target.coord.ra_hours,
            dec_degrees: target.coord.dec_degrees,
            timestamp: chrono::Utc::now().timestamp_millis(),
            display_name: target.display_name.clone(),
            object_type: target.object_type.clone(),
            source_name: Some(target.source.to_string()),
        }
    }

    fn to_target(&self) -> ResolvedTarget {
        ResolvedTarget {
            name: self.name.clone(),
            coord: Coordinate::new(self.ra_hours, self.dec_degrees),
            source: TargetSource::Cache,
            display_name: self.display_name.clone(),
            object_type: self.object_type.clone(),
        }
    }
}

/// The name cache.
pub struct TargetCache {
    path: PathBuf,
    entries: HashMap<String, CacheEntry>,
}

impl TargetCache {
    /// Load cache from the default location (~/.skytools/cache.json).
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load cache from a specific path. A missing or unreadable file gives an empty cache.
    pub fn load_from(path: PathBuf) -> Self {
        let entries = Self::read_file(&path).unwrap_or_default();
        debug!(path = %path.display(), entries = entries.len(), "loaded name cache");
        Self { path, entries }
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".skytools")
            .join("cache.json")
    }

    fn read_file(path: &Path) -> Option<HashMap<String, CacheEntry>> {
        let data = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&data) {
            Ok(entries) => Some(entries),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring corrupt name cache");
                None
            }
        }
    }

    /// Look up a name. Returns None if missing or expired.
    pub fn get(&self, query: &str) -> Option<ResolvedTarget> {
        let entry = self.entries.get(&normalize_name(query))?;

        let now = chrono::Utc::now().timestamp_millis();
        if now - entry.timestamp > CACHE_TTL_MS {
            return None;
        }

        Some(entry.to_target())
    }

    /// Store a target under the original query and under its resolved name, then persist.
    pub fn put(&mut self, query: &str, target: &ResolvedTarget) {
        let entry = CacheEntry::from_target(target);
        let query_key = normalize_name(query);
        let name_key = normalize_name(&target.name);

        if name_key != query_key {
            self.entries.insert(name_key, entry.clone());
        }
        self.entries.insert(query_key, entry);
        self.persist();
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %e, "cannot create cache directory");
                return;
            }
        }
        let result = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&self.path, json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "cannot write name cache");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_cache() -> (TargetCache, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        (TargetCache::load_from(path), dir)
    }

    fn m31() -> ResolvedTarget {
        ResolvedTarget {
            name: "M 31".into(),
            coord: Coordinate::new(0.7123, 41.2688),
            source: TargetSource::Sesame,
            display_name: Some("M 31".into()),
            object_type: Some("G".into()),
        }
    }

    #[test]
    fn test_cache_put_get() {
        let (mut cache, _dir) = test_cache();
        cache.put("m31", &m31());

        let result = cache.get("M31").unwrap();
        assert_eq!(result.name, "M 31");
        assert_eq!(result.source, TargetSource::Cache);
        assert!((result.coord.dec_degrees - 41.2688).abs() < 1e-9);
        assert_eq!(result.object_type.as_deref(), Some("G"));
    }

    #[test]
    fn test_cache_stores_query_and_name() {
        let (mut cache, _dir) = test_cache();
        cache.put("Andromeda Galaxy", &m31());

        assert_eq!(cache.len(), 2);
        assert!(cache.get("andromeda galaxy").is_some());
        assert!(cache.get("m 31").is_some());
    }

    #[test]
    fn test_cache_miss() {
        let (cache, _dir) = test_cache();
        assert!(cache.is_empty());
        assert!(cache.get("nonexistent").is_none());
    }

    #[test]
    fn test_cache_persistence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        {
            let mut cache = TargetCache::load_from(path.clone());
            cache.put("m31", &m31());
        }

        let reloaded = TargetCache::load_from(path);
        assert_eq!(reloaded.get("m31").unwrap().name, "M 31");
    }

    #[test]
    fn test_cache_expired_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let json = r#"{
            "vega": {
                "name": "Vega",
                "ra_hours": 18.6156,
                "dec_degrees": 38.7837,
                "timestamp": 0
            }
        }"#;
        fs::write(&path, json).unwrap();

        let cache = TargetCache::load_from(path);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("vega").is_none());
    }

    #[test]
    fn test_cache_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{ not json").unwrap();

        let cache = TargetCache::load_from(path);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_optional_fields_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let json = r#"{
            "vega": {
                "name": "Vega",
                "ra_hours": 18.6156,
                "dec_degrees": 38.7837,
                "timestamp": 9999999999999
            }
        }"#;
        fs::write(&path, json).unwrap();

        let cache = TargetCache::load_from(path);
        let result = cache.get("Vega").unwrap();
        assert!(result.object_type.is_none());
        assert!(result.display_name.is_none());
    }
}
