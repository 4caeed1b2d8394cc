//! Process settings and the HTTP server configuration object.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use bookshelf::domain::ports::PasswordHasherError;
use bookshelf::outbound::persistence::DbPool;
use bookshelf::outbound::security::Argon2PasswordHasher;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

/// Which look-aside cache adapter to wire into the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
    Disabled,
}

/// Error returned for an unrecognized `cache_backend` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cache backend {0:?}; expected redis, memory or disabled")]
pub struct UnknownCacheBackend(String);

impl FromStr for CacheBackend {
    type Err = UnknownCacheBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            "disabled" | "none" => Ok(Self::Disabled),
            _ => Err(UnknownCacheBackend(s.to_owned())),
        }
    }
}

/// Startup settings loaded from CLI arguments, `BOOKSHELF_*` environment
/// variables and an optional configuration file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKSHELF")]
pub struct AppSettings {
    /// Interface to listen on.
    pub bind_addr: Option<String>,
    /// TCP port to listen on.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL connection string. Without one the server keeps all state
    /// in process.
    pub database_url: Option<String>,
    /// Redis connection string for the catalogue cache.
    pub redis_url: Option<String>,
    /// `redis`, `memory` or `disabled`.
    pub cache_backend: Option<String>,
    /// HMAC secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Bearer token lifetime.
    #[ortho_config(default = 1440)]
    pub token_ttl_minutes: u32,
    /// Username of an administrator to create at startup.
    pub bootstrap_admin_username: Option<String>,
    /// Password for [`Self::bootstrap_admin_username`].
    pub bootstrap_admin_password: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Argon2 memory cost in KiB.
    #[ortho_config(default = 19456)]
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count.
    #[ortho_config(default = 2)]
    pub argon2_iterations: u32,
    /// Argon2 lane count.
    #[ortho_config(default = 1)]
    pub argon2_parallelism: u32,
}

impl AppSettings {
    /// Socket address assembled from `bind_addr` and `port`.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        let host = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        let ip = IpAddr::from_str(host.trim())?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Effective cache backend.
    ///
    /// Defaults to Redis when a Redis URL is configured and to no caching
    /// otherwise.
    pub fn cache_backend(&self) -> Result<CacheBackend, UnknownCacheBackend> {
        match self.cache_backend.as_deref() {
            Some(raw) => raw.parse(),
            None if self.redis_url.is_some() => Ok(CacheBackend::Redis),
            None => Ok(CacheBackend::Disabled),
        }
    }

    /// Bootstrap administrator credentials when both halves are present.
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        self.bootstrap_admin_username
            .as_deref()
            .zip(self.bootstrap_admin_password.as_deref())
    }

    /// Password hasher using the configured Argon2 costs.
    ///
    /// # Errors
    /// Fails when argon2 rejects the cost combination.
    pub fn password_hasher(&self) -> Result<Argon2PasswordHasher, PasswordHasherError> {
        Argon2PasswordHasher::with_params(
            self.argon2_memory_kib,
            self.argon2_iterations,
            self.argon2_parallelism,
        )
    }

    /// Token lifetime as a signed duration for claim arithmetic.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.token_ttl_minutes.max(1)))
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    ///
    /// Without a pool the repositories fall back to an in-process store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
