//! PostgreSQL-backed `FavouriteRepository` implementation using Diesel ORM.
//!
//! Adding is idempotent through `ON CONFLICT DO NOTHING`. The named foreign
//! keys report unknown accounts and books, and both cascade on delete.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{BookRepositoryError, FavouriteRepository, FavouriteRepositoryError};
use crate::domain::{AccountId, BookId, BookPage};

use super::diesel_book_repository::{brief_row_to_brief, count_to_total, limit_offset};
use super::error_mapping::{DieselFailure, classify, map_pool_error};
use super::models::{BookBriefRow, NewFavouriteRow};
use super::pool::{DbPool, PoolError};
use super::schema::{books, favourite_books};

const ACCOUNT_FOREIGN_KEY: &str = "favourite_books_account_fk";

/// Diesel-backed favourite relation.
#[derive(Clone)]
pub struct DieselFavouriteRepository {
    pool: DbPool,
}

impl DieselFavouriteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn connection_error(error: &PoolError) -> FavouriteRepositoryError {
    map_pool_error(error, FavouriteRepositoryError::connection)
}

fn map_diesel_error(error: &diesel::result::Error) -> FavouriteRepositoryError {
    match classify(error) {
        DieselFailure::Connection(message) => FavouriteRepositoryError::connection(message),
        DieselFailure::Query(message) => FavouriteRepositoryError::query(message),
        DieselFailure::UniqueViolation | DieselFailure::ForeignKeyViolation { .. } => {
            FavouriteRepositoryError::query("constraint violation")
        }
    }
}

fn map_row_error(error: BookRepositoryError) -> FavouriteRepositoryError {
    FavouriteRepositoryError::query(error.to_string())
}

#[async_trait]
impl FavouriteRepository for DieselFavouriteRepository {
    async fn add(&self, account: AccountId, book: BookId) -> Result<(), FavouriteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        diesel::insert_into(favourite_books::table)
            .values(NewFavouriteRow {
                account_id: account.get(),
                book_id: book.get(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| match classify(&err) {
                DieselFailure::ForeignKeyViolation { constraint }
                    if constraint.as_deref() == Some(ACCOUNT_FOREIGN_KEY) =>
                {
                    FavouriteRepositoryError::unknown_account(account.get())
                }
                DieselFailure::ForeignKeyViolation { .. } => {
                    FavouriteRepositoryError::unknown_book(book.get())
                }
                _ => map_diesel_error(&err),
            })?;
        Ok(())
    }

    async fn remove(
        &self,
        account: AccountId,
        book: BookId,
    ) -> Result<(), FavouriteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        diesel::delete(favourite_books::table.find((account.get(), book.get())))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        Ok(())
    }

    async fn list(
        &self,
        account: AccountId,
        page: PageRequest,
    ) -> Result<BookPage, FavouriteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        let (limit, offset) = limit_offset(page);

        let count: i64 = favourite_books::table
            .filter(favourite_books::account_id.eq(account.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        let rows: Vec<BookBriefRow> = favourite_books::table
            .inner_join(books::table)
            .filter(favourite_books::account_id.eq(account.get()))
            .order((favourite_books::created_at.asc(), books::id.asc()))
            .limit(limit)
            .offset(offset)
            .select(BookBriefRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        let items = rows
            .into_iter()
            .map(|row| brief_row_to_brief(row).map_err(map_row_error))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BookPage {
            items,
            total: count_to_total(count),
        })
    }
}
