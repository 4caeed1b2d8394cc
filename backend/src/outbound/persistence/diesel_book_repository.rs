//! PostgreSQL-backed `BookRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{BookRepository, BookRepositoryError};
use crate::domain::{Book, BookBrief, BookDraft, BookId, BookPage, BookQuery};

use super::error_mapping::{DieselFailure, classify, map_pool_error};
use super::models::{BookBriefRow, BookRow, BookValues};
use super::pool::{DbPool, PoolError};
use super::schema::books;

/// Diesel-backed catalogue store.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn connection_error(error: &PoolError) -> BookRepositoryError {
    map_pool_error(error, BookRepositoryError::connection)
}

fn map_diesel_error(error: &diesel::result::Error) -> BookRepositoryError {
    match classify(error) {
        DieselFailure::Connection(message) => BookRepositoryError::connection(message),
        DieselFailure::Query(message) => BookRepositoryError::query(message),
        DieselFailure::UniqueViolation | DieselFailure::ForeignKeyViolation { .. } => {
            BookRepositoryError::query("constraint violation")
        }
    }
}

fn book_id(raw: i64) -> Result<BookId, BookRepositoryError> {
    BookId::new(raw).map_err(|err| BookRepositoryError::query(format!("invalid book id: {err}")))
}

fn row_to_book(row: BookRow) -> Result<Book, BookRepositoryError> {
    Ok(Book {
        id: book_id(row.id)?,
        title: row.title,
        author: row.author,
        genre: row.genre,
        description: row.description,
        price: row.price,
    })
}

pub(crate) fn brief_row_to_brief(row: BookBriefRow) -> Result<BookBrief, BookRepositoryError> {
    Ok(BookBrief {
        id: book_id(row.id)?,
        title: row.title,
        author: row.author,
        genre: row.genre,
        price: row.price,
    })
}

fn values(draft: &BookDraft) -> BookValues<'_> {
    BookValues {
        title: draft.title(),
        author: draft.author(),
        genre: draft.genre(),
        description: draft.description(),
        price: draft.price(),
    }
}

/// SQL `LIMIT`/`OFFSET` pair for a page request.
pub(crate) fn limit_offset(page: PageRequest) -> (i64, i64) {
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (i64::from(page.limit()), offset)
}

/// Row counts are never negative; clamp defensively rather than wrap.
pub(crate) fn count_to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn create(&self, draft: &BookDraft) -> Result<Book, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        let row = diesel::insert_into(books::table)
            .values(values(draft))
            .returning(BookRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        row_to_book(row)
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        books::table
            .find(id.get())
            .select(BookRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?
            .map(row_to_book)
            .transpose()
    }

    async fn list(&self, query: &BookQuery) -> Result<BookPage, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        let (limit, offset) = limit_offset(query.page);

        let (count, rows): (i64, Vec<BookBriefRow>) = match query.genre.as_deref() {
            Some(genre) => {
                let count = books::table
                    .filter(books::genre.eq(genre))
                    .count()
                    .get_result(&mut conn)
                    .await
                    .map_err(|err| map_diesel_error(&err))?;
                let rows = books::table
                    .filter(books::genre.eq(genre))
                    .order(books::id.asc())
                    .limit(limit)
                    .offset(offset)
                    .select(BookBriefRow::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(|err| map_diesel_error(&err))?;
                (count, rows)
            }
            None => {
                let count = books::table
                    .count()
                    .get_result(&mut conn)
                    .await
                    .map_err(|err| map_diesel_error(&err))?;
                let rows = books::table
                    .order(books::id.asc())
                    .limit(limit)
                    .offset(offset)
                    .select(BookBriefRow::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(|err| map_diesel_error(&err))?;
                (count, rows)
            }
        };

        let items = rows
            .into_iter()
            .map(brief_row_to_brief)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BookPage {
            items,
            total: count_to_total(count),
        })
    }

    async fn genres(&self) -> Result<Vec<String>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        books::table
            .select(books::genre)
            .distinct()
            .order(books::genre.asc())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))
    }

    async fn update(
        &self,
        id: BookId,
        draft: &BookDraft,
    ) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        diesel::update(books::table.find(id.get()))
            .set((values(draft), books::updated_at.eq(diesel::dsl::now)))
            .returning(BookRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?
            .map(row_to_book)
            .transpose()
    }

    async fn delete(&self, id: BookId) -> Result<bool, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        let deleted = diesel::delete(books::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(PageRequest::normalized(Some(1), Some(10)), (10, 0))]
    #[case(PageRequest::normalized(Some(3), Some(25)), (25, 50))]
    fn page_requests_translate_to_sql_window(
        #[case] page: PageRequest,
        #[case] expected: (i64, i64),
    ) {
        assert_eq!(limit_offset(page), expected);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(42, 42)]
    #[case(-1, 0)]
    fn counts_never_wrap(#[case] count: i64, #[case] expected: u64) {
        assert_eq!(count_to_total(count), expected);
    }

    #[rstest]
    fn rows_with_bad_ids_are_query_errors() {
        let row = BookBriefRow {
            id: -4,
            title: "Dune".to_owned(),
            author: "Frank Herbert".to_owned(),
            genre: "sf".to_owned(),
            price: 9.5,
        };
        assert!(matches!(
            brief_row_to_brief(row),
            Err(BookRepositoryError::Query { .. })
        ));
    }
}
