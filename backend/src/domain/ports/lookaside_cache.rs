//! Driven port for the look-aside cache.
//!
//! Values are opaque strings; the catalogue service owns their encoding.
//! A conforming adapter may be backed by a distributed store, a local map,
//! or nothing at all.
use std::time::Duration;

use async_trait::async_trait;

use super::{CacheKey, CachePattern, define_port_error};

define_port_error! {
    /// Errors surfaced by cache adapters.
    pub enum CacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "cache backend failure: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LookasideCache: Send + Sync {
    /// Read a value; `None` on miss or expiry.
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError>;

    /// Store a value that expires after `ttl`.
    async fn set_with_ttl(
        &self,
        key: &CacheKey,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Remove a single key if present.
    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError>;

    /// Remove every key selected by `pattern`.
    async fn evict_matching(&self, pattern: &CachePattern) -> Result<(), CacheError>;
}
