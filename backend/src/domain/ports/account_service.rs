//! Driving port for account registration, login and administration.
//!
//! Inbound adapters call this port with the acting account id taken from a
//! verified claim. Implementations decide every "who may act on whose
//! account" question against freshly read store state.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create a `user` account.
    async fn register(&self, username: &str, password: &str) -> Result<Account, Error>;

    /// Verify credentials and return the matching account.
    async fn login(&self, username: &str, password: &str) -> Result<Account, Error>;

    /// The acting account's own record.
    async fn profile(&self, acting: AccountId) -> Result<Account, Error>;

    /// Another account's record, visible to itself and to admins.
    async fn account(&self, acting: AccountId, target: AccountId) -> Result<Account, Error>;

    /// Every account; admin only.
    async fn list_accounts(&self, acting: AccountId) -> Result<Vec<Account>, Error>;

    /// Change another account's role; admin only.
    async fn set_role(
        &self,
        acting: AccountId,
        target: AccountId,
        new_role: &str,
    ) -> Result<Account, Error>;

    /// Delete an account; admin only.
    async fn delete_account(&self, acting: AccountId, target: AccountId) -> Result<(), Error>;

    /// Resolve the acting account and require that it is currently an admin.
    async fn require_admin(&self, acting: AccountId) -> Result<Account, Error>;

    /// Make sure an admin named `username` exists, creating or promoting it.
    async fn ensure_admin(&self, username: &str, password: &str) -> Result<Account, Error>;
}
