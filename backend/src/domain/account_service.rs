//! Account service: registration, login and account administration.
//!
//! Every privileged operation re-reads the acting account from the store, so
//! a role change takes effect on the next call rather than the next token.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, AccountService, PasswordHasher, PasswordHasherError,
};
use crate::domain::{
    Account, AccountId, CREDENTIALS_REQUIRED_MESSAGE, Credentials, CredentialsValidationError,
    Error, NewAccount, Role,
};

/// Pause applied after a password mismatch before reporting failure.
pub const FAILED_LOGIN_DELAY: Duration = Duration::from_secs(2);

pub const ACCESS_DENIED_MESSAGE: &str = "access denied";
pub const ACCOUNT_NOT_FOUND_MESSAGE: &str = "account not found";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid credentials";
pub const OWN_ROLE_MESSAGE: &str = "cannot change own role";
pub const USERNAME_TAKEN_MESSAGE: &str = "username already exists";

fn map_repository_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::internal(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::DuplicateUsername { .. } => Error::conflict(USERNAME_TAKEN_MESSAGE),
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn map_credentials_error(error: CredentialsValidationError) -> Error {
    match error {
        CredentialsValidationError::EmptyUsername => {
            Error::invalid_request(CREDENTIALS_REQUIRED_MESSAGE)
                .with_details(json!({ "field": "username", "code": "empty_username" }))
        }
        CredentialsValidationError::EmptyPassword => {
            Error::invalid_request(CREDENTIALS_REQUIRED_MESSAGE)
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
        CredentialsValidationError::UsernameTooLong { max } => {
            Error::invalid_request(format!("invalid username: at most {max} characters"))
                .with_details(json!({ "field": "username", "code": "username_too_long" }))
        }
    }
}

/// Account service backed by an account repository and a password hasher.
#[derive(Clone)]
pub struct AccountServiceImpl<R, H> {
    accounts: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> AccountServiceImpl<R, H>
where
    R: AccountRepository,
    H: PasswordHasher,
{
    /// Create a new service with its collaborators.
    pub fn new(accounts: Arc<R>, hasher: Arc<H>) -> Self {
        Self { accounts, hasher }
    }

    async fn resolve(&self, id: AccountId) -> Result<Account, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .map(|stored| stored.into_account())
            .ok_or_else(|| Error::not_found(ACCOUNT_NOT_FOUND_MESSAGE))
    }

    async fn insert(&self, credentials: &Credentials, role: Role) -> Result<Account, Error> {
        let password_hash = self
            .hasher
            .hash(credentials.password())
            .await
            .map_err(map_hasher_error)?;
        let stored = self
            .accounts
            .create(&NewAccount {
                username: credentials.username().clone(),
                password_hash,
                role,
            })
            .await
            .map_err(map_repository_error)?;
        Ok(stored.into_account())
    }
}

#[async_trait]
impl<R, H> AccountService for AccountServiceImpl<R, H>
where
    R: AccountRepository,
    H: PasswordHasher,
{
    async fn register(&self, username: &str, password: &str) -> Result<Account, Error> {
        let credentials =
            Credentials::try_from_parts(username, password).map_err(map_credentials_error)?;
        let existing = self
            .accounts
            .find_by_username(credentials.username())
            .await
            .map_err(map_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict(USERNAME_TAKEN_MESSAGE));
        }
        // The store's unique constraint still arbitrates concurrent registrations.
        let account = self.insert(&credentials, Role::User).await?;
        info!(account_id = %account.id, username = %account.username, "account registered");
        Ok(account)
    }

    async fn login(&self, username: &str, password: &str) -> Result<Account, Error> {
        // Over-long names cannot belong to an account, so they fail like any
        // other unknown name.
        let credentials =
            Credentials::try_from_parts(username, password).map_err(|error| match error {
                CredentialsValidationError::UsernameTooLong { .. } => {
                    Error::unauthorized(INVALID_CREDENTIALS_MESSAGE)
                }
                other => map_credentials_error(other),
            })?;
        let Some(stored) = self
            .accounts
            .find_by_username(credentials.username())
            .await
            .map_err(map_repository_error)?
        else {
            warn!(username = %credentials.username(), "login for unknown account");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !verified {
            tokio::time::sleep(FAILED_LOGIN_DELAY).await;
            warn!(username = %credentials.username(), "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }
        Ok(stored.into_account())
    }

    async fn profile(&self, acting: AccountId) -> Result<Account, Error> {
        self.resolve(acting).await
    }

    async fn account(&self, acting: AccountId, target: AccountId) -> Result<Account, Error> {
        let actor = self.resolve(acting).await?;
        if !actor.can_view(target) {
            return Err(Error::forbidden(ACCESS_DENIED_MESSAGE));
        }
        if actor.id == target {
            return Ok(actor);
        }
        self.resolve(target).await
    }

    async fn list_accounts(&self, acting: AccountId) -> Result<Vec<Account>, Error> {
        self.require_admin(acting).await?;
        self.accounts.list().await.map_err(map_repository_error)
    }

    async fn set_role(
        &self,
        acting: AccountId,
        target: AccountId,
        new_role: &str,
    ) -> Result<Account, Error> {
        let role = new_role.parse::<Role>().map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "new_role", "value": err.value }))
        })?;
        if acting == target {
            return Err(Error::invalid_request(OWN_ROLE_MESSAGE));
        }
        self.require_admin(acting).await?;
        let updated = self
            .accounts
            .update_role(target, role)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(ACCOUNT_NOT_FOUND_MESSAGE))?;
        info!(acting = %acting, target = %target, role = %role, "account role changed");
        Ok(updated)
    }

    async fn delete_account(&self, acting: AccountId, target: AccountId) -> Result<(), Error> {
        self.require_admin(acting).await?;
        let deleted = self
            .accounts
            .delete(target)
            .await
            .map_err(map_repository_error)?;
        info!(acting = %acting, target = %target, deleted, "account deletion requested");
        Ok(())
    }

    async fn require_admin(&self, acting: AccountId) -> Result<Account, Error> {
        let actor = self.resolve(acting).await?;
        if !actor.role.is_admin() {
            return Err(Error::forbidden(ACCESS_DENIED_MESSAGE));
        }
        Ok(actor)
    }

    async fn ensure_admin(&self, username: &str, password: &str) -> Result<Account, Error> {
        let credentials =
            Credentials::try_from_parts(username, password).map_err(map_credentials_error)?;
        let existing = self
            .accounts
            .find_by_username(credentials.username())
            .await
            .map_err(map_repository_error)?;
        match existing {
            Some(stored) if stored.account.role.is_admin() => Ok(stored.into_account()),
            Some(stored) => {
                let promoted = self
                    .accounts
                    .update_role(stored.account.id, Role::Admin)
                    .await
                    .map_err(map_repository_error)?
                    .ok_or_else(|| Error::not_found(ACCOUNT_NOT_FOUND_MESSAGE))?;
                info!(account_id = %promoted.id, "existing account promoted to admin");
                Ok(promoted)
            }
            None => {
                let created = self.insert(&credentials, Role::Admin).await?;
                info!(account_id = %created.id, "bootstrap admin created");
                Ok(created)
            }
        }
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
