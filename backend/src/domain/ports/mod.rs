//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Service`) are called by inbound adapters; driven ports
//! (repositories, cache, hashing, tokens) are implemented by outbound
//! adapters and consumed by the domain services.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod account_service;
mod book_repository;
mod cache_key;
mod catalogue_service;
mod favourite_repository;
mod favourites_service;
mod lookaside_cache;
mod password_hasher;
mod token_issuer;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::AccountService;
#[cfg(test)]
pub use book_repository::MockBookRepository;
pub use book_repository::{BookRepository, BookRepositoryError};
pub use cache_key::{CacheKey, CacheKeyValidationError, CachePattern};
#[cfg(test)]
pub use catalogue_service::MockCatalogueService;
pub use catalogue_service::CatalogueService;
#[cfg(test)]
pub use favourite_repository::MockFavouriteRepository;
pub use favourite_repository::{FavouriteRepository, FavouriteRepositoryError};
#[cfg(test)]
pub use favourites_service::MockFavouritesService;
pub use favourites_service::FavouritesService;
#[cfg(test)]
pub use lookaside_cache::MockLookasideCache;
pub use lookaside_cache::{CacheError, LookasideCache};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{TokenError, TokenIssuer};
