//! Account entities and the role model.
//!
//! [`Account`] is the outward-facing shape and never carries credential
//! material. Repositories exchange [`StoredAccount`], which pairs the account
//! with its [`PasswordHash`]; services strip the hash before returning.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AccountId;

/// Maximum accepted username length in characters.
pub const USERNAME_MAX_LEN: usize = 64;

/// Message returned when a role value is neither `user` nor `admin`.
pub const INVALID_ROLE_MESSAGE: &str = "invalid role, must be 'admin' or 'user'";

/// Authorization role attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account; may only see itself.
    #[default]
    User,
    /// Administrator; may see and manage every account and the catalogue.
    Admin,
}

impl Role {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Whether the role grants administrative privileges.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role, must be 'admin' or 'user'")]
pub struct RoleParseError {
    /// The rejected input.
    pub value: String,
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(RoleParseError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation failures for [`Username`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameValidationError {
    /// Blank once trimmed.
    #[error("username must not be empty")]
    Empty,
    /// Longer than [`USERNAME_MAX_LEN`] characters.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Allowed maximum.
        max: usize,
    },
}

/// Unique, trimmed account name.
///
/// # Examples
/// ```
/// use bookshelf::domain::Username;
///
/// let name = Username::new("  alice ").expect("valid name");
/// assert_eq!(name.as_ref(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Trim and validate a raw name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UsernameValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UsernameValidationError::Empty);
        }
        if trimmed.chars().count() > USERNAME_MAX_LEN {
            return Err(UsernameValidationError::TooLong {
                max: USERNAME_MAX_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// One-way credential digest in PHC string format.
///
/// Deliberately not serializable and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded digest produced by a password hasher.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded digest for storage and verification.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Registered account without credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned identifier.
    pub id: AccountId,
    /// Unique name.
    pub username: Username,
    /// Current role.
    pub role: Role,
}

impl Account {
    /// Whether this account may act on `target`'s record.
    ///
    /// Self-or-admin visibility is the central authorization rule.
    #[must_use]
    pub fn can_view(&self, target: AccountId) -> bool {
        self.id == target || self.role.is_admin()
    }
}

/// Account record as persisted, including its password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAccount {
    /// Public part of the record.
    pub account: Account,
    /// Stored digest.
    pub password_hash: PasswordHash,
}

impl StoredAccount {
    /// Drop the credential and keep the public record.
    pub fn into_account(self) -> Account {
        self.account
    }
}

/// Values needed to insert a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Unique name.
    pub username: Username,
    /// Digest of the chosen password.
    pub password_hash: PasswordHash,
    /// Initial role.
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn account(id: i64, role: Role) -> Account {
        Account {
            id: AccountId::new(id).expect("fixture id"),
            username: Username::new(format!("user{id}")).expect("fixture name"),
            role,
        }
    }

    #[rstest]
    #[case("user", Some(Role::User))]
    #[case("admin", Some(Role::Admin))]
    #[case("Admin", None)]
    #[case("superuser", None)]
    #[case("", None)]
    fn parses_roles(#[case] raw: &str, #[case] expected: Option<Role>) {
        assert_eq!(raw.parse::<Role>().ok(), expected);
    }

    #[rstest]
    fn role_parse_error_uses_contract_message() {
        let err = "owner".parse::<Role>().expect_err("unknown role");
        assert_eq!(err.to_string(), INVALID_ROLE_MESSAGE);
    }

    #[rstest]
    fn default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[rstest]
    #[case("", UsernameValidationError::Empty)]
    #[case("   ", UsernameValidationError::Empty)]
    fn rejects_blank_usernames(#[case] raw: &str, #[case] expected: UsernameValidationError) {
        assert_eq!(Username::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_long_usernames() {
        let raw = "x".repeat(USERNAME_MAX_LEN + 1);
        assert_eq!(
            Username::new(raw),
            Err(UsernameValidationError::TooLong {
                max: USERNAME_MAX_LEN
            })
        );
    }

    #[rstest]
    #[case(1, Role::User, 1, true)]
    #[case(1, Role::User, 2, false)]
    #[case(1, Role::Admin, 2, true)]
    #[case(3, Role::Admin, 3, true)]
    fn can_view_is_self_or_admin(
        #[case] acting: i64,
        #[case] role: Role,
        #[case] target: i64,
        #[case] expected: bool,
    ) {
        let target = AccountId::new(target).expect("fixture id");
        assert_eq!(account(acting, role).can_view(target), expected);
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$argon2id$v=19$secret");
        assert!(!format!("{hash:?}").contains("secret"));
    }

    #[rstest]
    fn account_serializes_without_credentials() {
        let value = serde_json::to_value(account(7, Role::Admin)).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({"id": 7, "username": "user7", "role": "admin"})
        );
    }
}
