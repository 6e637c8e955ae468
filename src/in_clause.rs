//! Set-membership clauses bound as a single array parameter.
//!
//! Instead of expanding `IN (?, ?, ...)` to match the argument count, an
//! [`InClause`] binds the whole argument list as one array-valued parameter.
//! The default clause uses PostgreSQL's `= any ( ? )`; engines without array
//! parameters need another factory, such as [`json_each_where_clause`] for
//! SQLite.
//!
//! # Example
//!
//! ```
//! use sql_template_rs::{SqlArray, StringInClause};
//!
//! let clause = StringInClause::any(vec!["x".into(), "y".into()], "colname");
//! assert!(clause.has_arguments());
//! assert_eq!(clause.where_clause(), " where colname = any ( ? ) ");
//! assert_eq!(clause.to_array(), SqlArray::Text(vec!["x".into(), "y".into()]));
//!
//! let empty = StringInClause::any(Vec::new(), "colname");
//! assert!(!empty.has_arguments());
//! assert_eq!(empty.where_clause(), "");
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Driver-friendly array value carrying the arguments of an [`InClause`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlArray {
    /// Text arguments.
    Text(Vec<String>),
    /// 64-bit integer arguments.
    Integer(Vec<i64>),
}

impl SqlArray {
    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(values) => values.len(),
            Self::Integer(values) => values.len(),
        }
    }

    /// Whether the array has no element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Binds the array as JSON array text, which SQLite expands with `json_each`.
#[cfg(feature = "rusqlite")]
impl rusqlite::ToSql for SqlArray {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        use alloc::string::ToString;

        let json = match self {
            Self::Text(values) => serde_json::Value::from(values.as_slice()),
            Self::Integer(values) => serde_json::Value::from(values.as_slice()),
        };
        Ok(rusqlite::types::ToSqlOutput::from(json.to_string()))
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for alloc::string::String {}
    impl Sealed for i64 {}
}

/// Element types an [`InClause`] accepts, with their array conversion.
pub trait InClauseArgument: sealed::Sealed + Sized {
    /// Converts a list of arguments into the array bound to the statement.
    fn to_array(arguments: &[Self]) -> SqlArray;
}

impl InClauseArgument for String {
    fn to_array(arguments: &[Self]) -> SqlArray {
        SqlArray::Text(arguments.to_vec())
    }
}

impl InClauseArgument for i64 {
    fn to_array(arguments: &[Self]) -> SqlArray {
        SqlArray::Integer(arguments.to_vec())
    }
}

/// Returns `" where {column} = any ( ? ) "`, for engines with array parameters.
#[must_use]
pub fn any_where_clause(column: &str) -> String {
    format!(" where {column} = any ( ? ) ")
}

/// Returns a clause testing `column` against the elements of a JSON array
/// bound as parameter 1, for SQLite.
#[must_use]
pub fn json_each_where_clause(column: &str) -> String {
    format!(" where {column} in (select value from json_each(?1)) ")
}

/// A where clause testing membership in a list bound as parameter 1.
///
/// The clause text is computed once at construction: it is empty when there
/// are no arguments, so the clause can be appended to a larger query
/// unconditionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InClause<T> {
    arguments: Vec<T>,
    where_clause: String,
}

/// An [`InClause`] over text arguments.
pub type StringInClause = InClause<String>;

/// An [`InClause`] over 64-bit integer arguments.
pub type LongInClause = InClause<i64>;

impl<T: InClauseArgument> InClause<T> {
    /// Creates a clause, invoking `where_factory` only if `arguments` is not empty.
    #[must_use]
    pub fn new(arguments: Vec<T>, where_factory: impl FnOnce() -> String) -> Self {
        let where_clause = if arguments.is_empty() {
            String::new()
        } else {
            where_factory()
        };
        Self {
            arguments,
            where_clause,
        }
    }

    /// Creates a clause using [`any_where_clause`] on `column`.
    #[must_use]
    pub fn any(arguments: Vec<T>, column: &str) -> Self {
        Self::new(arguments, || any_where_clause(column))
    }

    /// Creates a clause using [`json_each_where_clause`] on `column`.
    #[must_use]
    pub fn json_each(arguments: Vec<T>, column: &str) -> Self {
        Self::new(arguments, || json_each_where_clause(column))
    }

    /// Whether any argument was supplied.
    #[must_use]
    pub fn has_arguments(&self) -> bool {
        !self.arguments.is_empty()
    }

    /// The clause text, empty when there are no arguments.
    #[must_use]
    pub fn where_clause(&self) -> &str {
        &self.where_clause
    }

    /// The arguments, in the order given.
    #[must_use]
    pub fn arguments(&self) -> &[T] {
        &self.arguments
    }

    /// Converts the arguments into their bindable array.
    #[must_use]
    pub fn to_array(&self) -> SqlArray {
        T::to_array(&self.arguments)
    }

    /// Binds the argument array as parameter 1 of `statement`.
    ///
    /// Nothing is bound when there are no arguments. The clause must hold the
    /// statement's first placeholder.
    ///
    /// # Errors
    ///
    /// * `Sqlite` - If the driver rejects the binding.
    #[cfg(feature = "rusqlite")]
    pub fn bind(&self, statement: &mut rusqlite::Statement<'_>) -> Result<(), crate::Error> {
        if self.has_arguments() {
            statement.raw_bind_parameter(1, self.to_array())?;
        }
        Ok(())
    }
}
