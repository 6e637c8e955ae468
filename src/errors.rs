//! Submodule defining the errors used across the crate.

use alloc::string::String;

use crate::SqlStatementType;

/// Errors that can occur while resolving, loading or executing statements.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No statement of the requested type carries the requested identifier.
    #[error("No {sql_type} statement with identifier '{identifier}' found")]
    StatementNotFound {
        /// The identifier that was looked up.
        identifier: String,
        /// The statement type whose list was searched.
        sql_type: SqlStatementType,
    },

    /// A statement type name did not match any known type.
    #[error("Unknown SQL statement type '{0}'")]
    UnknownStatementType(String),

    /// A substitution name did not match any known token.
    #[error("Unknown template substitution '{0}'")]
    UnknownSubstitution(String),

    /// The statements document could not be read or written.
    #[cfg(feature = "json")]
    #[error("Invalid statements document: {0}")]
    Json(String),

    /// The database driver reported an error.
    #[cfg(feature = "rusqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// A read statement was handed to an update helper.
    #[cfg(feature = "rusqlite")]
    #[error("Statement '{identifier}' is a READ statement and cannot be executed as an update")]
    NotAnUpdate {
        /// Identifier of the offending statement.
        identifier: String,
    },
}
