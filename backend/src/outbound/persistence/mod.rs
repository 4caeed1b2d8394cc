//! Persistence adapters.
//!
//! PostgreSQL repositories are built on Diesel and `diesel-async`; the
//! [`MemoryStore`] repositories stand in when no database is configured.

mod diesel_account_repository;
mod diesel_book_repository;
mod diesel_favourite_repository;
mod error_mapping;
mod memory;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_book_repository::DieselBookRepository;
pub use diesel_favourite_repository::DieselFavouriteRepository;
pub use memory::{
    MemoryAccountRepository, MemoryBookRepository, MemoryFavouriteRepository, MemoryStore,
};
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
