//! Sitemap output cache.
//!
//! The cache is an optimization: callers treat every [`CacheError`] as a miss.
//! Concurrent misses may each rebuild and store; the last write wins.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use thiserror::Error;

/// Cache backend errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backend could not be reached or failed the operation.
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Key/value cache with per-entry time to live.
pub trait SitemapCache: Send + Sync {
    /// Fetch a fresh value, or `None` when absent or expired.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value for `ttl`.
    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Remove a value.
    fn forget(&self, key: &str) -> Result<()>;
}

#[derive(Debug)]
struct CachedValue {
    value: String,
    expires_at: Instant,
}

/// In-process cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CachedValue>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SitemapCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(cached) if Instant::now() < cached.expires_at => Ok(Some(cached.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| CacheError::Unavailable(format!("ttl out of range: {ttl:?}")))?;
        self.entries.lock().insert(
            key.to_string(),
            CachedValue {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    fn forget(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_forget() {
        let cache = MemoryCache::new();
        cache.put("k", "v", Duration::from_secs(60)).unwrap();

        assert_eq!(cache.get("k").unwrap().as_deref(), Some("v"));

        cache.forget("k").unwrap();
        assert!(cache.get("k").unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = MemoryCache::new();
        cache.put("k", "v", Duration::ZERO).unwrap();

        assert!(cache.get("k").unwrap().is_none());
        assert_eq!(cache.len(), 0);
    }
}
