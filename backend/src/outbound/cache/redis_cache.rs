//! Redis-backed look-aside cache using a `bb8-redis` connection pool.
//!
//! Values are written with `SET key value EX seconds`. Pattern eviction walks
//! the keyspace with `SCAN MATCH` and deletes each batch, so it never blocks
//! the server the way `KEYS` would.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::redis::{self, RedisError};
use tracing::debug;

use crate::domain::ports::{CacheError, CacheKey, CachePattern, LookasideCache};

const SCAN_BATCH: usize = 100;

/// Connection settings for [`RedisLookasideCache`].
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    url: String,
    max_connections: u32,
    connection_timeout: Duration,
}

impl RedisCacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 8,
            connection_timeout: Duration::from_secs(2),
        }
    }

    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// [`LookasideCache`] adapter for Redis.
#[derive(Clone)]
pub struct RedisLookasideCache {
    pool: Pool<RedisConnectionManager>,
}

fn backend_error(error: &RedisError) -> CacheError {
    CacheError::backend(error.to_string())
}

/// Seconds for `EX`; Redis rejects zero, so sub-second TTLs round up.
fn expiry_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

impl RedisLookasideCache {
    /// Build the pool and verify the server answers `PING`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Backend`] for an invalid URL or an unreachable
    /// server.
    pub async fn connect(config: RedisCacheConfig) -> Result<Self, CacheError> {
        let manager =
            RedisConnectionManager::new(config.url.as_str()).map_err(|err| backend_error(&err))?;
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| backend_error(&err))?;

        let cache = Self { pool };
        let mut conn = cache.connection().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut *conn)
            .await
            .map_err(|err| backend_error(&err))?;
        drop(conn);
        Ok(cache)
    }

    async fn connection(&self) -> Result<PooledConnection<'_, RedisConnectionManager>, CacheError> {
        self.pool
            .get()
            .await
            .map_err(|err| CacheError::backend(err.to_string()))
    }
}

#[async_trait]
impl LookasideCache for RedisLookasideCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        redis::cmd("GET")
            .arg(key.as_str())
            .query_async::<Option<String>>(&mut *conn)
            .await
            .map_err(|err| backend_error(&err))
    }

    async fn set_with_ttl(
        &self,
        key: &CacheKey,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        redis::cmd("SET")
            .arg(key.as_str())
            .arg(value)
            .arg("EX")
            .arg(expiry_seconds(ttl))
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|err| backend_error(&err))
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        redis::cmd("DEL")
            .arg(key.as_str())
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|err| backend_error(&err))
    }

    async fn evict_matching(&self, pattern: &CachePattern) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let mut cursor: u64 = 0;
        let mut evicted = 0_usize;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern.as_str())
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut *conn)
                .await
                .map_err(|err| backend_error(&err))?;

            if !keys.is_empty() {
                evicted += keys.len();
                redis::cmd("DEL")
                    .arg(&keys)
                    .query_async::<()>(&mut *conn)
                    .await
                    .map_err(|err| backend_error(&err))?;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }
        debug!(pattern = %pattern, evicted, "evicted cache keys");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Duration::from_millis(10), 1)]
    #[case(Duration::from_secs(300), 300)]
    #[case(Duration::from_millis(600_900), 600)]
    fn expiry_is_whole_seconds_and_never_zero(#[case] ttl: Duration, #[case] expected: u64) {
        assert_eq!(expiry_seconds(ttl), expected);
    }

    #[rstest]
    fn config_clamps_pool_size() {
        let config = RedisCacheConfig::new("redis://localhost:6379").with_max_connections(0);
        assert_eq!(config.max_connections, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_urls_fail_to_connect() {
        let result = RedisLookasideCache::connect(RedisCacheConfig::new("not a url")).await;
        assert!(matches!(result, Err(CacheError::Backend { .. })));
    }
}
