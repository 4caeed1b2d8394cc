//! Credentials and the per-request session claim.
//!
//! [`Credentials`] validates raw registration and login input before the
//! account service touches the store. [`SessionClaim`] is what a verified
//! bearer token resolves to; it is derived, never persisted.

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::{AccountId, Role, Username, UsernameValidationError};

/// Message returned when either credential part is missing.
pub const CREDENTIALS_REQUIRED_MESSAGE: &str = "username and password required";

/// Reasons raw credential input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Username exceeded the length limit.
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Allowed maximum.
        max: usize,
    },
}

/// Validated username/password pair.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty; whitespace is significant and preserved.
///
/// # Examples
/// ```
/// use bookshelf::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" alice ", "pw123456").expect("valid");
/// assert_eq!(creds.username().as_ref(), "alice");
/// assert_eq!(creds.password(), "pw123456");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: Username,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Validate raw username and password input.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let username = Username::new(username).map_err(|err| match err {
            UsernameValidationError::Empty => CredentialsValidationError::EmptyUsername,
            UsernameValidationError::TooLong { max } => {
                CredentialsValidationError::UsernameTooLong { max }
            }
        })?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalized account name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Plain-text password as supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Identity carried by a verified bearer token.
///
/// The role is informational: privileged operations re-read the current role
/// from the account store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaim {
    /// Authenticated account.
    pub account_id: AccountId,
    /// Account name at issuance time.
    pub username: Username,
    /// Role at issuance time.
    pub role: Role,
    /// Instant after which the claim is no longer honoured.
    pub expires_at: DateTime<Utc>,
}
