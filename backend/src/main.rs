//! Backend entry-point: loads settings, prepares adapters and serves the REST
//! API with its OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use rand::RngCore;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

use bookshelf::domain::ports::LookasideCache;
use bookshelf::inbound::http::health::HealthState;
use bookshelf::outbound::cache::{
    DisabledLookasideCache, MemoryLookasideCache, RedisCacheConfig, RedisLookasideCache,
};
use bookshelf::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use bookshelf::outbound::security::JwtTokenIssuer;
use server::{AppSettings, CacheBackend, ServerConfig, SharedAdapters};

const EPHEMERAL_SECRET_LEN: usize = 32;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let bind_addr = settings
        .socket_addr()
        .map_err(|e| std::io::Error::other(format!("invalid bind address: {e}")))?;
    let mut config = ServerConfig::new(bind_addr);
    if let Some(pool) = connect_database(&settings).await? {
        config = config.with_db_pool(pool);
    }

    let shared = SharedAdapters {
        cache: connect_cache(&settings).await?,
        tokens: Arc::new(JwtTokenIssuer::new(&jwt_secret(&settings)?, settings.token_ttl())),
        hasher: Arc::new(
            settings
                .password_hasher()
                .map_err(|e| std::io::Error::other(format!("invalid argon2 settings: {e}")))?,
        ),
    };
    let http_state = server::build_http_state(&config, shared);

    if let Some((username, password)) = settings.bootstrap_admin() {
        let admin = http_state
            .accounts
            .ensure_admin(username, password)
            .await
            .map_err(|e| std::io::Error::other(format!("admin bootstrap failed: {e}")))?;
        info!(account_id = %admin.id, username = %admin.username, "bootstrap admin ready");
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting HTTP server");
    server::create_server(health_state, http_state, &config)?.await
}

async fn connect_database(settings: &AppSettings) -> std::io::Result<Option<DbPool>> {
    let Some(url) = settings.database_url.as_deref() else {
        return Ok(None);
    };
    let applied = run_migrations(url)
        .await
        .map_err(|e| std::io::Error::other(format!("database migration failed: {e}")))?;
    info!(applied, "database migrations complete");
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections))
        .await
        .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;
    Ok(Some(pool))
}

async fn connect_cache(settings: &AppSettings) -> std::io::Result<Arc<dyn LookasideCache>> {
    let backend = settings.cache_backend().map_err(std::io::Error::other)?;
    let cache: Arc<dyn LookasideCache> = match backend {
        CacheBackend::Redis => {
            let url = settings.redis_url.as_deref().ok_or_else(|| {
                std::io::Error::other("cache backend is redis but no redis_url is configured")
            })?;
            let cache = RedisLookasideCache::connect(RedisCacheConfig::new(url))
                .await
                .map_err(|e| std::io::Error::other(format!("redis connection failed: {e}")))?;
            Arc::new(cache)
        }
        CacheBackend::Memory => Arc::new(MemoryLookasideCache::new()),
        CacheBackend::Disabled => Arc::new(DisabledLookasideCache),
    };
    info!(?backend, "catalogue cache configured");
    Ok(cache)
}

fn jwt_secret(settings: &AppSettings) -> std::io::Result<Zeroizing<Vec<u8>>> {
    if let Some(secret) = settings.jwt_secret.as_deref() {
        return Ok(Zeroizing::new(secret.as_bytes().to_vec()));
    }
    if cfg!(debug_assertions) {
        warn!("using temporary token secret (dev only); tokens will not survive restarts");
        let mut bytes = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
        rand::thread_rng().fill_bytes(&mut bytes);
        return Ok(bytes);
    }
    Err(std::io::Error::other("BOOKSHELF_JWT_SECRET must be set in release builds"))
}
