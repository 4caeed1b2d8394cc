//! Driven port for the catalogue store.
use async_trait::async_trait;

use crate::domain::{Book, BookDraft, BookId, BookPage, BookQuery};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by book repository adapters.
    pub enum BookRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "book repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "book repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a book and return it with its assigned id.
    async fn create(&self, draft: &BookDraft) -> Result<Book, BookRepositoryError>;

    /// Fetch a single book.
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, BookRepositoryError>;

    /// Page through books ordered by id, optionally filtered by exact genre.
    async fn list(&self, query: &BookQuery) -> Result<BookPage, BookRepositoryError>;

    /// Distinct genres in ascending order.
    async fn genres(&self) -> Result<Vec<String>, BookRepositoryError>;

    /// Replace every field of a book; `None` when it does not exist.
    async fn update(&self, id: BookId, draft: &BookDraft)
    -> Result<Option<Book>, BookRepositoryError>;

    /// Remove a book; returns whether a row was deleted.
    async fn delete(&self, id: BookId) -> Result<bool, BookRepositoryError>;
}
