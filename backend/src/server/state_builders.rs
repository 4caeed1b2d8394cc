//! Builders wiring outbound adapters into the HTTP state ports.

use std::sync::Arc;

use tracing::{info, warn};

use bookshelf::domain::ports::{
    AccountRepository, BookRepository, FavouriteRepository, LookasideCache, TokenIssuer,
};
use bookshelf::domain::{AccountServiceImpl, CatalogueServiceImpl, FavouritesServiceImpl};
use bookshelf::inbound::http::state::HttpState;
use bookshelf::outbound::persistence::{
    DieselAccountRepository, DieselBookRepository, DieselFavouriteRepository, MemoryStore,
};
use bookshelf::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Collaborators shared by every service regardless of the store in use.
#[derive(Clone)]
pub struct SharedAdapters {
    pub cache: Arc<dyn LookasideCache>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub hasher: Arc<Argon2PasswordHasher>,
}

fn assemble<A, B, F>(
    accounts: A,
    books: B,
    favourites: F,
    shared: SharedAdapters,
) -> HttpState
where
    A: AccountRepository + 'static,
    B: BookRepository + 'static,
    F: FavouriteRepository + 'static,
{
    HttpState::new(
        Arc::new(AccountServiceImpl::new(Arc::new(accounts), shared.hasher)),
        Arc::new(CatalogueServiceImpl::new(Arc::new(books), shared.cache)),
        Arc::new(FavouritesServiceImpl::new(Arc::new(favourites))),
        shared.tokens,
    )
}

/// Build the HTTP state once per process.
///
/// Diesel repositories are used when a pool is configured; otherwise every
/// service shares one in-process [`MemoryStore`].
pub fn build_http_state(config: &ServerConfig, shared: SharedAdapters) -> HttpState {
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            assemble(
                DieselAccountRepository::new(pool.clone()),
                DieselBookRepository::new(pool.clone()),
                DieselFavouriteRepository::new(pool.clone()),
                shared,
            )
        }
        None => {
            warn!("no database configured; state is held in memory and lost on restart");
            let store = MemoryStore::new();
            assemble(store.accounts(), store.books(), store.favourites(), shared)
        }
    }
}

#[cfg(test)]
mod tests {
    //! Smoke tests for state assembly without external services.

    use super::*;
    use std::net::SocketAddr;

    use bookshelf::outbound::cache::DisabledLookasideCache;
    use bookshelf::outbound::security::JwtTokenIssuer;

    fn shared() -> SharedAdapters {
        SharedAdapters {
            cache: Arc::new(DisabledLookasideCache),
            tokens: Arc::new(JwtTokenIssuer::new(b"state-test", chrono::Duration::hours(1))),
            hasher: Arc::new(
                Argon2PasswordHasher::with_params(64, 1, 1).expect("minimal argon2 costs"),
            ),
        }
    }

    #[actix_web::test]
    async fn memory_backed_state_shares_one_store() {
        let config = ServerConfig::new(SocketAddr::from(([127, 0, 0, 1], 0)));
        let state = build_http_state(&config, shared());

        let registered = state
            .accounts
            .register("alice", "pw123456")
            .await
            .expect("register succeeds");
        let profile = state
            .accounts
            .profile(registered.id)
            .await
            .expect("profile visible through the same store");
        assert_eq!(profile.username.as_ref(), "alice");
    }
}
