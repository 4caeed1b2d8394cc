//! Surrogate identifiers assigned by the relational store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a raw value is not a valid surrogate identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The value was not a base-10 integer.
    #[error("identifier must be an integer")]
    NotANumber,
    /// The value was zero or negative.
    #[error("identifier must be positive")]
    NotPositive,
}

macro_rules! surrogate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Validate a raw store identifier.
            pub fn new(raw: i64) -> Result<Self, IdValidationError> {
                if raw < 1 {
                    return Err(IdValidationError::NotPositive);
                }
                Ok(Self(raw))
            }

            /// Raw value as stored.
            #[must_use]
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = IdValidationError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = IdValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .parse::<i64>()
                    .map_err(|_| IdValidationError::NotANumber)?;
                Self::new(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

surrogate_id! {
    /// Identifier of a registered account.
    AccountId
}

surrogate_id! {
    /// Identifier of a catalogue book.
    ///
    /// # Examples
    /// ```
    /// use bookshelf::domain::BookId;
    ///
    /// let id: BookId = "42".parse().expect("valid id");
    /// assert_eq!(id.get(), 42);
    /// assert!("0".parse::<BookId>().is_err());
    /// ```
    BookId
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Ok(1))]
    #[case("9000", Ok(9000))]
    #[case("0", Err(IdValidationError::NotPositive))]
    #[case("-7", Err(IdValidationError::NotPositive))]
    #[case("abc", Err(IdValidationError::NotANumber))]
    #[case("1.5", Err(IdValidationError::NotANumber))]
    #[case("", Err(IdValidationError::NotANumber))]
    fn parses_path_segments(#[case] raw: &str, #[case] expected: Result<i64, IdValidationError>) {
        assert_eq!(raw.parse::<AccountId>().map(AccountId::get), expected);
    }

    #[rstest]
    fn deserialization_rejects_non_positive_values() {
        assert!(serde_json::from_str::<BookId>("0").is_err());
        let id: BookId = serde_json::from_str("3").expect("positive id");
        assert_eq!(i64::from(id), 3);
    }
}
