//! Shared Diesel error classification for the repositories.
//!
//! Each repository owns its own port error enum; these helpers translate
//! pool and Diesel failures into the small set of cases the ports care about.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// What a failed Diesel operation means to a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(&'static str),
    /// A unique index rejected the write.
    UniqueViolation,
    /// A foreign key rejected the write.
    ForeignKeyViolation {
        /// Name of the violated constraint, when the driver reports it.
        constraint: Option<String>,
    },
    /// Anything else.
    Query(&'static str),
}

/// Classify a Diesel error, logging the driver detail at debug level.
pub(crate) fn classify(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DieselFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        _ => DieselFailure::Query("database error"),
    }
}

/// Map a pool failure through a repository's connection constructor.
pub(crate) fn map_pool_error<E>(error: &PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.message().to_owned())
}
