//! Response caching
//!
//! An explicit cache component shared by the resolver and the aggregator.
//! Entries live in memory and, when a directory is given, are mirrored to
//! `<dir>/<sha256(key)>.json` so they survive across CLI invocations.

use crate::error::Result;
use crate::types::CacheEntry;
use crate::utils::paths::ensure_dir;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs;
use tracing::debug;

/// Source of "now" in epoch seconds
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

fn system_clock() -> Clock {
    Arc::new(|| Utc::now().timestamp())
}

/// Generate the on-disk file name for a cache key
pub fn get_cache_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry<serde_json::Value>>>,
    dir: Option<PathBuf>,
    clock: Clock,
}

impl ResponseCache {
    /// Process-local cache
    pub fn in_memory() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            dir: None,
            clock: system_clock(),
        }
    }

    /// Cache mirrored to files under `dir`
    pub fn persistent(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            ..Self::in_memory()
        }
    }

    /// Replace the clock, mostly for tests
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> i64 {
        (self.clock)()
    }

    fn cache_path(&self, key: &str) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", get_cache_key(key))))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry<serde_json::Value>>> {
        // A panic while holding the lock leaves only cached data behind
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get cached data if present and not expired
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let now = self.now();

        let in_memory = {
            let mut entries = self.lock();
            match entries.get(key).map(|entry| entry.is_expired(now)) {
                Some(true) => {
                    entries.remove(key);
                    None
                }
                Some(false) => entries.get(key).map(|entry| entry.data.clone()),
                None => None,
            }
        };

        let value = match in_memory {
            Some(value) => value,
            None => self.read_file(key, now).await?,
        };

        match serde_json::from_value(value) {
            Ok(data) => {
                debug!(key, "cache hit");
                Some(data)
            }
            Err(e) => {
                debug!(key, error = %e, "cached value has unexpected shape");
                None
            }
        }
    }

    async fn read_file(&self, key: &str, now: i64) -> Option<serde_json::Value> {
        let path = self.cache_path(key)?;
        if !path.exists() {
            return None;
        }

        let content = fs::read_to_string(&path).await.ok()?;
        let entry: CacheEntry<serde_json::Value> = serde_json::from_str(&content).ok()?;

        if entry.is_expired(now) {
            let _ = fs::remove_file(&path).await;
            return None;
        }

        let data = entry.data.clone();
        self.lock().insert(key.to_string(), entry);
        Some(data)
    }

    /// Store data under `key` for `ttl` seconds
    ///
    /// Disk write failures are logged and ignored; caching is best-effort.
    pub async fn set<T: Serialize>(&self, key: &str, data: &T, ttl: u64) -> Result<()> {
        let entry = CacheEntry {
            data: serde_json::to_value(data)?,
            timestamp: self.now(),
            ttl,
        };

        if let Some(path) = self.cache_path(key) {
            if let Err(e) = write_entry(&path, &entry).await {
                debug!(key, error = %e, "failed to persist cache entry");
            }
        }

        self.lock().insert(key.to_string(), entry);
        Ok(())
    }

    /// Drop one entry from memory and disk
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        if let Some(path) = self.cache_path(key) {
            if path.exists() {
                fs::remove_file(&path).await?;
            }
        }
        Ok(())
    }

    /// Drop every expired in-memory entry
    pub fn purge_expired(&self) -> usize {
        let now = self.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Clear all cache
    pub async fn clear(&self) -> Result<()> {
        self.lock().clear();
        if let Some(dir) = &self.dir {
            if dir.exists() {
                fs::remove_dir_all(dir).await?;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

async fn write_entry(path: &Path, entry: &CacheEntry<serde_json::Value>) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    let content = serde_json::to_string(entry)?;
    fs::write(path, content).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock the test advances by hand
    pub(crate) fn manual_clock(start: i64) -> (Clock, Arc<AtomicI64>) {
        let now = Arc::new(AtomicI64::new(start));
        let handle = now.clone();
        (Arc::new(move || handle.load(Ordering::SeqCst)), now)
    }

    #[test]
    fn test_get_cache_key_is_stable_hex() {
        let key = get_cache_key("search:lofi");
        assert_eq!(key.len(), 64);
        assert_eq!(key, get_cache_key("search:lofi"));
        assert_ne!(key, get_cache_key("search:jazz"));
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = ResponseCache::in_memory();
        cache.set("k", &vec![1, 2, 3], 60).await.unwrap();
        assert_eq!(cache.get::<Vec<i32>>("k").await, Some(vec![1, 2, 3]));
        assert_eq!(cache.get::<Vec<i32>>("missing").await, None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let (clock, now) = manual_clock(1_000);
        let cache = ResponseCache::in_memory().with_clock(clock);
        cache.set("k", &"v", 30).await.unwrap();

        now.store(1_029, Ordering::SeqCst);
        assert_eq!(cache.get::<String>("k").await.as_deref(), Some("v"));

        now.store(1_030, Ordering::SeqCst);
        assert_eq!(cache.get::<String>("k").await, None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let cache = ResponseCache::in_memory();
        cache.set("k", &1, 60).await.unwrap();
        cache.set("k", &2, 60).await.unwrap();
        assert_eq!(cache.get::<i32>("k").await, Some(2));
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (clock, now) = manual_clock(0);
        let cache = ResponseCache::in_memory().with_clock(clock);
        cache.set("short", &1, 5).await.unwrap();
        cache.set("long", &2, 500).await.unwrap();

        now.store(10, Ordering::SeqCst);
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_persistent_entries_survive_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let (clock, now) = manual_clock(50);

        let first = ResponseCache::persistent(dir.path()).with_clock(clock.clone());
        first.set("feed:UC1", &vec!["a".to_string()], 100).await.unwrap();

        let second = ResponseCache::persistent(dir.path()).with_clock(clock);
        assert_eq!(
            second.get::<Vec<String>>("feed:UC1").await,
            Some(vec!["a".to_string()])
        );

        now.store(200, Ordering::SeqCst);
        assert_eq!(second.purge_expired(), 1);
        let third = ResponseCache::persistent(dir.path()).with_clock(Arc::new(|| 200));
        assert_eq!(third.get::<Vec<String>>("feed:UC1").await, None);
    }

    #[tokio::test]
    async fn test_clear_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("cache");
        let cache = ResponseCache::persistent(&cache_dir);
        cache.set("k", &1, 60).await.unwrap();
        assert!(cache_dir.exists());

        cache.clear().await.unwrap();
        assert!(!cache_dir.exists());
        assert_eq!(cache.get::<i32>("k").await, None);
    }

    #[tokio::test]
    async fn test_remove_drops_one_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::persistent(dir.path());
        cache.set("feed:UC1", &1, 60).await.unwrap();
        cache.set("search:10:lofi", &2, 60).await.unwrap();

        cache.remove("feed:UC1").await.unwrap();
        cache.remove("never-set").await.unwrap();

        let fresh = ResponseCache::persistent(dir.path());
        assert_eq!(fresh.get::<i32>("feed:UC1").await, None);
        assert_eq!(fresh.get::<i32>("search:10:lofi").await, Some(2));
    }
}
