//! Catalogue service: book CRUD behind a look-aside cache.
//!
//! Reads consult the cache first and populate it on a miss. Writes invalidate
//! synchronously after the store write succeeds and before returning, so a
//! caller that observes a successful write never reads the old value back
//! from the cache. Cache read and populate failures only cost a store round
//! trip; invalidation failures are reported because a stale entry would
//! otherwise outlive the write.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pagination::Paginated;
use rand::Rng;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::domain::ports::{
    BookRepository, BookRepositoryError, CacheError, CacheKey, CachePattern, CatalogueService,
    LookasideCache,
};
use crate::domain::{
    Book, BookBrief, BookDraft, BookFields, BookId, BookPage, BookQuery, BookValidationError,
    Error, INVALID_BOOK_MESSAGE,
};

/// Lifetime of a cached single book.
pub const BOOK_TTL: Duration = Duration::from_secs(10 * 60);
/// Lifetime of a cached listing page.
pub const LISTING_TTL: Duration = Duration::from_secs(5 * 60);
/// Default upper bound, in percent, of the random TTL reduction.
pub const DEFAULT_TTL_JITTER_PERCENT: u8 = 10;

pub const BOOK_NOT_FOUND_MESSAGE: &str = "book not found";

const LISTING_PATTERN: &str = "books:*";

fn map_repository_error(error: BookRepositoryError) -> Error {
    match error {
        BookRepositoryError::Connection { message } => {
            Error::internal(format!("book repository unavailable: {message}"))
        }
        BookRepositoryError::Query { message } => {
            Error::internal(format!("book repository error: {message}"))
        }
    }
}

fn map_cache_error(error: CacheError) -> Error {
    Error::internal(format!("cache invalidation failed: {error}"))
}

fn map_validation_error(error: BookValidationError) -> Error {
    Error::invalid_request(INVALID_BOOK_MESSAGE)
        .with_details(json!({ "field": error.field(), "reason": error.to_string() }))
}

/// Cache key for a single book: `book:{id}`.
pub fn book_cache_key(id: BookId) -> Result<CacheKey, Error> {
    CacheKey::new(format!("book:{id}")).map_err(|err| Error::internal(err.to_string()))
}

/// Cache key for a listing page: `books:{genre digest}:{page}:{limit}`.
///
/// The genre is hashed so arbitrary filter text never leaks into key syntax.
pub fn listing_cache_key(query: &BookQuery) -> Result<CacheKey, Error> {
    let genre = match query.genre.as_deref() {
        Some(genre) => hex::encode(Sha256::digest(genre.as_bytes())),
        None => "all".to_owned(),
    };
    CacheKey::new(format!(
        "books:{genre}:{}:{}",
        query.page.page(),
        query.page.limit()
    ))
    .map_err(|err| Error::internal(err.to_string()))
}

/// Catalogue service backed by a book repository and a look-aside cache.
#[derive(Clone)]
pub struct CatalogueServiceImpl<R, C: ?Sized> {
    books: Arc<R>,
    cache: Arc<C>,
    ttl_jitter_percent: u8,
}

impl<R, C> CatalogueServiceImpl<R, C>
where
    R: BookRepository,
    C: LookasideCache + ?Sized,
{
    /// Create a new service with default TTL jitter.
    pub fn new(books: Arc<R>, cache: Arc<C>) -> Self {
        Self {
            books,
            cache,
            ttl_jitter_percent: DEFAULT_TTL_JITTER_PERCENT,
        }
    }

    /// Override the TTL jitter; `0` keeps TTLs exact. Values above 100 are
    /// clamped.
    pub fn with_ttl_jitter_percent(mut self, percent: u8) -> Self {
        self.ttl_jitter_percent = percent.min(100);
        self
    }

    // Jitter only ever shortens the TTL.
    fn jittered(&self, ttl: Duration) -> Duration {
        if self.ttl_jitter_percent == 0 {
            return ttl;
        }
        let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let max_cut = millis / 100 * u64::from(self.ttl_jitter_percent);
        let cut = rand::thread_rng().gen_range(0..=max_cut);
        ttl.saturating_sub(Duration::from_millis(cut))
    }

    async fn read_cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(error) => {
                    warn!(%key, %error, "discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                warn!(%key, %error, "cache read failed; falling back to store");
                None
            }
        }
    }

    async fn populate<T: Serialize + Sync>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(%key, %error, "failed to encode cache entry");
                return;
            }
        };
        if let Err(error) = self.cache.set_with_ttl(key, raw, self.jittered(ttl)).await {
            warn!(%key, %error, "cache populate failed");
        }
    }

    async fn evict_listings(&self) -> Result<(), Error> {
        let pattern =
            CachePattern::new(LISTING_PATTERN).map_err(|err| Error::internal(err.to_string()))?;
        self.cache
            .evict_matching(&pattern)
            .await
            .map_err(map_cache_error)
    }

    async fn evict_book(&self, id: BookId) -> Result<(), Error> {
        let key = book_cache_key(id)?;
        self.cache.delete(&key).await.map_err(map_cache_error)?;
        self.evict_listings().await
    }
}

#[async_trait]
impl<R, C> CatalogueService for CatalogueServiceImpl<R, C>
where
    R: BookRepository,
    C: LookasideCache + ?Sized,
{
    async fn create_book(&self, fields: &BookFields) -> Result<Book, Error> {
        let draft = BookDraft::try_from(fields).map_err(map_validation_error)?;
        let book = self
            .books
            .create(&draft)
            .await
            .map_err(map_repository_error)?;
        // A new id cannot be cached yet; only listings go stale.
        self.evict_listings().await?;
        Ok(book)
    }

    async fn book(&self, id: BookId) -> Result<Book, Error> {
        let key = book_cache_key(id)?;
        if let Some(book) = self.read_cached::<Book>(&key).await {
            return Ok(book);
        }
        let book = self
            .books
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(BOOK_NOT_FOUND_MESSAGE))?;
        self.populate(&key, &book, BOOK_TTL).await;
        Ok(book)
    }

    async fn list_books(&self, query: &BookQuery) -> Result<Paginated<BookBrief>, Error> {
        let key = listing_cache_key(query)?;
        let page = match self.read_cached::<BookPage>(&key).await {
            Some(page) => page,
            None => {
                let page = self
                    .books
                    .list(query)
                    .await
                    .map_err(map_repository_error)?;
                self.populate(&key, &page, LISTING_TTL).await;
                page
            }
        };
        Ok(Paginated::new(page.items, query.page, page.total))
    }

    async fn genres(&self) -> Result<Vec<String>, Error> {
        self.books.genres().await.map_err(map_repository_error)
    }

    async fn update_book(&self, id: BookId, fields: &BookFields) -> Result<Book, Error> {
        let draft = BookDraft::try_from(fields).map_err(map_validation_error)?;
        let book = self
            .books
            .update(id, &draft)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(BOOK_NOT_FOUND_MESSAGE))?;
        self.evict_book(id).await?;
        Ok(book)
    }

    async fn delete_book(&self, id: BookId) -> Result<(), Error> {
        let deleted = self
            .books
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(Error::not_found(BOOK_NOT_FOUND_MESSAGE));
        }
        self.evict_book(id).await
    }
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
