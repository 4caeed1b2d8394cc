//! Driven port for account persistence (the credential store).
use async_trait::async_trait;

use crate::domain::{Account, AccountId, NewAccount, Role, StoredAccount, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// The username is already taken.
        DuplicateUsername { username: String } => "username {username} already exists",
    }
}

/// Credential store operations.
///
/// Adapters must enforce username uniqueness atomically so concurrent
/// registrations of the same name yield at most one success.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account and return it with its assigned id.
    async fn create(&self, account: &NewAccount) -> Result<StoredAccount, AccountRepositoryError>;

    /// Fetch an account by its unique name.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredAccount>, AccountRepositoryError>;

    /// Fetch an account by id.
    async fn find_by_id(&self, id: AccountId)
    -> Result<Option<StoredAccount>, AccountRepositoryError>;

    /// All accounts ordered by id.
    async fn list(&self) -> Result<Vec<Account>, AccountRepositoryError>;

    /// Persist a new role; `None` when the account does not exist.
    async fn update_role(
        &self,
        id: AccountId,
        role: Role,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    /// Remove an account; returns whether a row was deleted.
    async fn delete(&self, id: AccountId) -> Result<bool, AccountRepositoryError>;
}
