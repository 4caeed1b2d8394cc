//! Driving port for the book catalogue.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::{Book, BookBrief, BookFields, BookId, BookQuery, Error};

/// Catalogue use-cases. Write operations assume the caller was already
/// authorized as an admin.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueService: Send + Sync {
    async fn create_book(&self, fields: &BookFields) -> Result<Book, Error>;

    async fn book(&self, id: BookId) -> Result<Book, Error>;

    async fn list_books(&self, query: &BookQuery) -> Result<Paginated<BookBrief>, Error>;

    async fn genres(&self) -> Result<Vec<String>, Error>;

    async fn update_book(&self, id: BookId, fields: &BookFields) -> Result<Book, Error>;

    async fn delete_book(&self, id: BookId) -> Result<(), Error>;
}
