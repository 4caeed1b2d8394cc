//! Driving port for per-account favourites.
//!
//! The account id always comes from the caller's own claim, so there is no
//! cross-account access path.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{AccountId, BookBrief, BookId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavouritesService: Send + Sync {
    /// Add `book` to the account's favourites. Idempotent.
    async fn add(&self, account: AccountId, book: BookId) -> Result<(), Error>;

    /// Remove `book` from the account's favourites. Idempotent.
    async fn remove(&self, account: AccountId, book: BookId) -> Result<(), Error>;

    /// Page through the account's favourites.
    async fn list(
        &self,
        account: AccountId,
        page: PageRequest,
    ) -> Result<Paginated<BookBrief>, Error>;
}
