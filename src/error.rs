//! Error types and statement-error severity classification

use rusqlite::ErrorCode;
use rusqlite::ffi;
use thiserror::Error;

/// Main error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Caller contract violation, detected before any database interaction
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Severity of a failed statement execution.
///
/// Mutating operations split engine errors three ways: uniqueness
/// conflicts are expected and ignorable, most runtime failures are
/// recoverable, and errors that indicate a malformed statement or a
/// missing schema object are configuration bugs that must stop the
/// program rather than let it continue in a corrupted flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Uniqueness or primary-key conflict; insert-if-not-exists semantics
    Conflict,
    /// Runtime failure (other constraints, type mismatch, busy database)
    Recoverable,
    /// Malformed statement or missing table/column
    Fatal,
}

/// Classify an engine error into its severity tier
pub fn classify(err: &rusqlite::Error) -> Severity {
    match err {
        rusqlite::Error::SqliteFailure(cause, _) => match cause.code {
            ErrorCode::ConstraintViolation => match cause.extended_code {
                ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                | ffi::SQLITE_CONSTRAINT_UNIQUE
                | ffi::SQLITE_CONSTRAINT_ROWID => Severity::Conflict,
                _ => Severity::Recoverable,
            },
            // Generic SQLITE_ERROR: syntax errors and references to
            // tables or columns that do not exist
            ErrorCode::Unknown | ErrorCode::ApiMisuse => Severity::Fatal,
            _ => Severity::Recoverable,
        },
        // Statement text the engine could not parse at prepare time
        rusqlite::Error::SqlInputError { .. } => Severity::Fatal,
        rusqlite::Error::InvalidParameterCount(..) => Severity::Fatal,
        _ => Severity::Recoverable,
    }
}
