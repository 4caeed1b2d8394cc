//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Username uniqueness is enforced by the `accounts_username_key` index, so
//! two concurrent registrations of the same name race on the insert and the
//! loser surfaces as [`AccountRepositoryError::DuplicateUsername`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, AccountId, NewAccount, PasswordHash, Role, StoredAccount, Username};

use super::error_mapping::{DieselFailure, classify, map_pool_error};
use super::models::{AccountRow, NewAccountRow};
use super::pool::DbPool;
use super::schema::accounts;

/// Diesel-backed credential store.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: &diesel::result::Error) -> AccountRepositoryError {
    match classify(error) {
        DieselFailure::Connection(message) => AccountRepositoryError::connection(message),
        DieselFailure::Query(message) => AccountRepositoryError::query(message),
        DieselFailure::UniqueViolation | DieselFailure::ForeignKeyViolation { .. } => {
            AccountRepositoryError::query("constraint violation")
        }
    }
}

fn connection_error(error: &super::pool::PoolError) -> AccountRepositoryError {
    map_pool_error(error, AccountRepositoryError::connection)
}

/// Convert a row into a domain account, rejecting corrupt columns.
fn row_to_stored(row: AccountRow) -> Result<StoredAccount, AccountRepositoryError> {
    let id = AccountId::new(row.id)
        .map_err(|err| AccountRepositoryError::query(format!("invalid account id: {err}")))?;
    let username = Username::new(&row.username)
        .map_err(|err| AccountRepositoryError::query(format!("invalid username: {err}")))?;
    let role = row.role.parse::<Role>().unwrap_or_else(|_| {
        warn!(value = %row.role, account_id = row.id, "unrecognised role, treating as user");
        Role::User
    });
    Ok(StoredAccount {
        account: Account { id, username, role },
        password_hash: PasswordHash::new(row.password_hash),
    })
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn create(&self, account: &NewAccount) -> Result<StoredAccount, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        let row = NewAccountRow {
            username: account.username.as_ref(),
            password_hash: account.password_hash.as_str(),
            role: account.role.as_str(),
        };

        let inserted = diesel::insert_into(accounts::table)
            .values(&row)
            .returning(AccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| match classify(&err) {
                DieselFailure::UniqueViolation => {
                    AccountRepositoryError::duplicate_username(account.username.to_string())
                }
                _ => map_diesel_error(&err),
            })?;

        row_to_stored(inserted)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredAccount>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        accounts::table
            .filter(accounts::username.eq(username.as_ref()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?
            .map(row_to_stored)
            .transpose()
    }

    async fn find_by_id(
        &self,
        id: AccountId,
    ) -> Result<Option<StoredAccount>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        accounts::table
            .find(id.get())
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?
            .map(row_to_stored)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        let rows: Vec<AccountRow> = accounts::table
            .order(accounts::id.asc())
            .select(AccountRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        rows.into_iter()
            .map(|row| row_to_stored(row).map(StoredAccount::into_account))
            .collect()
    }

    async fn update_role(
        &self,
        id: AccountId,
        role: Role,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        diesel::update(accounts::table.find(id.get()))
            .set((
                accounts::role.eq(role.as_str()),
                accounts::updated_at.eq(diesel::dsl::now),
            ))
            .returning(AccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?
            .map(|row| row_to_stored(row).map(StoredAccount::into_account))
            .transpose()
    }

    async fn delete(&self, id: AccountId) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| connection_error(&err))?;
        let deleted = diesel::delete(accounts::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;
        Ok(deleted > 0)
    }
}
