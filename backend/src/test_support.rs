//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature, which the
//! crate's own dev-dependency enables for integration suites.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use crate::domain::{AccountServiceImpl, CatalogueServiceImpl, FavouritesServiceImpl};
use crate::inbound::http::{self, health::HealthState, state::HttpState};
use crate::outbound::cache::MemoryLookasideCache;
use crate::outbound::persistence::{
    MemoryAccountRepository, MemoryBookRepository, MemoryFavouriteRepository, MemoryStore,
};
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenIssuer};

/// Signing secret used by [`InMemoryBackend`] tokens.
pub const TEST_JWT_SECRET: &[u8] = b"bookshelf-test-secret";

/// Catalogue service type wired by [`InMemoryBackend`].
pub type MemoryCatalogue = CatalogueServiceImpl<MemoryBookRepository, MemoryLookasideCache>;

/// Real services over in-process adapters.
///
/// The handles stay reachable so tests can seed data or inspect the cache
/// behind the services' backs.
#[derive(Clone)]
pub struct InMemoryBackend {
    pub store: MemoryStore,
    pub cache: Arc<MemoryLookasideCache>,
    pub accounts: Arc<AccountServiceImpl<MemoryAccountRepository, Argon2PasswordHasher>>,
    pub catalogue: Arc<MemoryCatalogue>,
    pub favourites: Arc<FavouritesServiceImpl<MemoryFavouriteRepository>>,
    pub tokens: Arc<JwtTokenIssuer>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Fresh store, empty cache, minimum-cost hashing and exact cache TTLs.
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let cache = Arc::new(MemoryLookasideCache::new());
        let hasher = Arc::new(Argon2PasswordHasher::fast_for_tests());
        Self {
            accounts: Arc::new(AccountServiceImpl::new(Arc::new(store.accounts()), hasher)),
            catalogue: Arc::new(
                CatalogueServiceImpl::new(Arc::new(store.books()), cache.clone())
                    .with_ttl_jitter_percent(0),
            ),
            favourites: Arc::new(FavouritesServiceImpl::new(Arc::new(store.favourites()))),
            tokens: Arc::new(JwtTokenIssuer::new(
                TEST_JWT_SECRET,
                chrono::Duration::hours(1),
            )),
            store,
            cache,
        }
    }

    /// Handler state over these services.
    pub fn http_state(&self) -> HttpState {
        HttpState::new(
            self.accounts.clone(),
            self.catalogue.clone(),
            self.favourites.clone(),
            self.tokens.clone(),
        )
    }

    /// Application mounting the API under `/api/v1`, as the server does.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let health = HealthState::new();
        health.mark_ready();
        App::new()
            .app_data(web::Data::new(health))
            .app_data(web::Data::new(self.http_state()))
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(http::configure))
    }
}
