//! Driven port for the account/book favourite relation.
use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{AccountId, BookId, BookPage};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by favourite repository adapters.
    pub enum FavouriteRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "favourite repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "favourite repository query failed: {message}",
        /// The account the favourite belongs to does not exist.
        UnknownAccount { account_id: i64 } => "account {account_id} does not exist",
        /// The referenced book does not exist.
        UnknownBook { book_id: i64 } => "book {book_id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavouriteRepository: Send + Sync {
    /// Record a favourite; adding an existing pair is a no-op.
    async fn add(&self, account: AccountId, book: BookId) -> Result<(), FavouriteRepositoryError>;

    /// Forget a favourite; removing an absent pair is a no-op.
    async fn remove(&self, account: AccountId, book: BookId)
    -> Result<(), FavouriteRepositoryError>;

    /// Page through an account's favourites in insertion order.
    async fn list(
        &self,
        account: AccountId,
        page: PageRequest,
    ) -> Result<BookPage, FavouriteRepositoryError>;
}
