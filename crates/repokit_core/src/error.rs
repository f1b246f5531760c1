//! Error taxonomy for the repository layer.
//!
//! # Responsibility
//! - Define one semantic error type shared by every helper operation.
//! - Classify rusqlite transport errors into not-found and duplicate-key
//!   categories using typed error codes, never message text.
//!
//! # Invariants
//! - Precondition violations are raised before any SQL is issued.
//! - Duplicate-key detection matches SQLite extended result codes only.

use rusqlite::ffi;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Semantic error for repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Caller-side contract violation; no database access was attempted.
    Precondition(String),
    /// The record type declares no primary-key field.
    NoPrimaryKey { table: &'static str },
    /// No row matched where a row was required.
    NotFound { table: &'static str },
    Sqlite(rusqlite::Error),
}

impl RepoError {
    /// True when the underlying failure is a unique or primary-key
    /// constraint violation.
    pub fn is_duplicate(&self) -> bool {
        match self {
            Self::Sqlite(err) => is_duplicate_entry(err),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Precondition(message) => write!(f, "precondition violated: {message}"),
            Self::NoPrimaryKey { table } => {
                write!(f, "no primary key field found for table `{table}`")
            }
            Self::NotFound { table } => write!(f, "no matching row in table `{table}`"),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Classifies a rusqlite error as a duplicate-key conflict.
pub fn is_duplicate_entry(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// Classifies a rusqlite error as "no row returned".
pub fn is_not_found(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::QueryReturnedNoRows)
}

#[cfg(test)]
mod tests {
    use super::{is_duplicate_entry, is_not_found, RepoError};
    use rusqlite::ffi;

    fn sqlite_failure(extended_code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            ffi::Error::new(extended_code),
            Some("constraint failed".to_string()),
        )
    }

    #[test]
    fn unique_and_primary_key_codes_classify_as_duplicate() {
        assert!(is_duplicate_entry(&sqlite_failure(
            ffi::SQLITE_CONSTRAINT_UNIQUE
        )));
        assert!(is_duplicate_entry(&sqlite_failure(
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )));
        assert!(!is_duplicate_entry(&sqlite_failure(
            ffi::SQLITE_CONSTRAINT_NOTNULL
        )));
        assert!(!is_duplicate_entry(&rusqlite::Error::QueryReturnedNoRows));
    }

    #[test]
    fn no_rows_classifies_as_not_found() {
        assert!(is_not_found(&rusqlite::Error::QueryReturnedNoRows));
        assert!(!is_not_found(&sqlite_failure(ffi::SQLITE_CONSTRAINT_UNIQUE)));
    }

    #[test]
    fn repo_error_duplicate_check_wraps_classification() {
        let err = RepoError::from(sqlite_failure(ffi::SQLITE_CONSTRAINT_UNIQUE));
        assert!(err.is_duplicate());
        assert!(!RepoError::Precondition("x".to_string()).is_duplicate());
    }
}
