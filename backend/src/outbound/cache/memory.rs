//! In-process cache with per-entry expiry.
//!
//! Expired entries are dropped on read, on every write and during pattern
//! eviction, so the map never holds more than the entries written within one
//! TTL.
//! Used for single-instance deployments and by the integration tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::domain::ports::{CacheError, CacheKey, CachePattern, LookasideCache};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Mutex-guarded map implementing [`LookasideCache`].
#[derive(Debug, Default)]
pub struct MemoryLookasideCache {
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl MemoryLookasideCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock()
            .map(|entries| entries.values().filter(|entry| entry.expires_at > now).count())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<CacheKey, Entry>>, CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::backend("memory cache lock poisoned"))
    }
}

#[async_trait]
impl LookasideCache for MemoryLookasideCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_with_ttl(
        &self,
        key: &CacheKey,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.clone(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.lock()?.remove(key);
        Ok(())
    }

    async fn evict_matching(&self, pattern: &CachePattern) -> Result<(), CacheError> {
        let now = Instant::now();
        self.lock()?
            .retain(|key, entry| entry.expires_at > now && !pattern.matches(key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn cache() -> MemoryLookasideCache {
        MemoryLookasideCache::new()
    }

    fn key(raw: &str) -> CacheKey {
        CacheKey::new(raw).expect("valid key")
    }

    fn stored(cache: &MemoryLookasideCache) -> usize {
        cache.entries.lock().expect("lock").len()
    }

    #[rstest]
    #[tokio::test]
    async fn stored_values_are_returned(cache: MemoryLookasideCache) {
        cache
            .set_with_ttl(&key("book:1"), "dune".to_owned(), Duration::from_secs(60))
            .await
            .expect("set succeeds");

        let value = cache.get(&key("book:1")).await.expect("get succeeds");
        assert_eq!(value.as_deref(), Some("dune"));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_their_ttl(cache: MemoryLookasideCache) {
        cache
            .set_with_ttl(&key("book:1"), "dune".to_owned(), Duration::from_secs(5))
            .await
            .expect("set succeeds");

        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(cache.get(&key("book:1")).await.expect("get succeeds"), None);
        assert!(cache.is_empty());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn writes_sweep_expired_entries(cache: MemoryLookasideCache) {
        for genre in 0..500 {
            cache
                .set_with_ttl(
                    &key(&format!("books:{genre}:1:10")),
                    "x".to_owned(),
                    Duration::from_secs(1),
                )
                .await
                .expect("set succeeds");
        }
        assert_eq!(stored(&cache), 500);

        tokio::time::advance(Duration::from_secs(3600)).await;
        cache
            .set_with_ttl(&key("book:1"), "dune".to_owned(), Duration::from_secs(60))
            .await
            .expect("set succeeds");

        assert_eq!(stored(&cache), 1);
        assert_eq!(cache.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn pattern_eviction_only_touches_matching_keys(cache: MemoryLookasideCache) {
        for raw in ["books:all:1:10", "books:abc:2:10", "book:1"] {
            cache
                .set_with_ttl(&key(raw), "x".to_owned(), Duration::from_secs(60))
                .await
                .expect("set succeeds");
        }

        let pattern = CachePattern::new("books:*").expect("valid pattern");
        cache.evict_matching(&pattern).await.expect("evict succeeds");

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key("book:1")).await.expect("get").is_some());
        assert!(cache.get(&key("books:all:1:10")).await.expect("get").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_a_single_key(cache: MemoryLookasideCache) {
        cache
            .set_with_ttl(&key("book:2"), "x".to_owned(), Duration::from_secs(60))
            .await
            .expect("set succeeds");
        cache.delete(&key("book:2")).await.expect("delete succeeds");
        cache.delete(&key("book:2")).await.expect("repeat delete succeeds");
        assert!(cache.is_empty());
    }
}
