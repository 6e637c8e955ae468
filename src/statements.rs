//! Named collections of statements, grouped by [`SqlStatementType`].
//!
//! A collection is populated once through a [`SqlStatementsBuilder`] and then
//! frozen into an immutable [`SqlStatements`] that can be shared freely
//! between threads.
//!
//! # Example
//!
//! ```
//! use sql_template_rs::{SqlStatement, SqlStatementType, SqlStatements};
//!
//! let statements = SqlStatements::builder("inventory")
//!     .add_statement(SqlStatement::new(
//!         "allItems",
//!         SqlStatementType::Read,
//!         "select ##DISTINCT## name from items",
//!     ))
//!     .build();
//!
//! let statement = statements.get_read_statement("ALLITEMS").unwrap();
//! assert_eq!(statement.identifier(), "allItems");
//! assert!(statements.get_statement("allItems", SqlStatementType::Delete).is_err());
//! ```

use alloc::string::String;
#[cfg(feature = "json")]
use alloc::string::ToString;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};

use hashbrown::{Equivalent, HashMap};

use crate::errors::Error;
use crate::{IndexMap, SqlStatement, SqlStatementType};

/// Per-type statement lists, in registration order.
type StatementMap = IndexMap<SqlStatementType, Vec<SqlStatement>>;

/// Folds one character at a time, so the result never depends on neighbours
/// (unlike `str::to_lowercase`, which maps a final `Σ` to `ς`).
fn folded(identifier: &str) -> impl Iterator<Item = char> + '_ {
    identifier
        .chars()
        .flat_map(char::to_uppercase)
        .flat_map(char::to_lowercase)
}

fn hash_folded<H: Hasher>(sql_type: SqlStatementType, identifier: &str, state: &mut H) {
    sql_type.hash(state);
    for c in folded(identifier) {
        c.hash(state);
    }
    state.write_u8(0xff);
}

/// Index key: a statement type and an identifier compared without case.
#[derive(Debug, Clone)]
struct IndexKey {
    sql_type: SqlStatementType,
    identifier: String,
}

impl Hash for IndexKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_folded(self.sql_type, &self.identifier, state);
    }
}

impl PartialEq for IndexKey {
    fn eq(&self, other: &Self) -> bool {
        IndexQuery::from(self).equivalent(other)
    }
}

impl Eq for IndexKey {}

/// Borrowed form of [`IndexKey`], so lookups do not allocate.
struct IndexQuery<'a> {
    sql_type: SqlStatementType,
    identifier: &'a str,
}

impl<'a> From<&'a IndexKey> for IndexQuery<'a> {
    fn from(key: &'a IndexKey) -> Self {
        Self {
            sql_type: key.sql_type,
            identifier: &key.identifier,
        }
    }
}

impl Hash for IndexQuery<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_folded(self.sql_type, self.identifier, state);
    }
}

impl Equivalent<IndexKey> for IndexQuery<'_> {
    fn equivalent(&self, key: &IndexKey) -> bool {
        self.sql_type == key.sql_type && folded(self.identifier).eq(folded(&key.identifier))
    }
}

/// Mutable registration phase of a [`SqlStatements`] collection.
#[derive(Debug, Clone, Default)]
pub struct SqlStatementsBuilder {
    system_name: String,
    statements: StatementMap,
}

impl SqlStatementsBuilder {
    /// Appends a statement to the list of its own type.
    ///
    /// No uniqueness check is made; on lookup the first registered statement
    /// with a given identifier wins.
    #[must_use]
    pub fn add_statement(mut self, statement: SqlStatement) -> Self {
        self.push(statement);
        self
    }

    /// Number of statements registered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.values().map(Vec::len).sum()
    }

    /// Whether no statement has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.values().all(Vec::is_empty)
    }

    /// Freezes the collection.
    ///
    /// Types are ordered naturally, statements keep their registration order
    /// within a type.
    #[must_use]
    pub fn build(mut self) -> SqlStatements {
        self.statements.sort_keys();

        let mut index = HashMap::new();
        for (sql_type, statements) in &self.statements {
            for (position, statement) in statements.iter().enumerate() {
                let key = IndexKey {
                    sql_type: *sql_type,
                    identifier: statement.identifier().into(),
                };
                index.entry(key).or_insert(position);
            }
        }

        let statements = SqlStatements {
            system_name: self.system_name,
            statements: self.statements,
            index,
        };
        tracing::debug!(
            system_name = %statements.system_name,
            statements = statements.len(),
            "froze statement collection"
        );
        statements
    }

    fn push(&mut self, statement: SqlStatement) {
        self.statements
            .entry(statement.sql_type())
            .or_default()
            .push(statement);
    }
}

impl Extend<SqlStatement> for SqlStatementsBuilder {
    fn extend<I: IntoIterator<Item = SqlStatement>>(&mut self, iter: I) {
        for statement in iter {
            self.push(statement);
        }
    }
}

/// An immutable, named collection of statements.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "json",
    serde(from = "document::SqlStatementsDocument", into = "document::SqlStatementsDocument")
)]
pub struct SqlStatements {
    system_name: String,
    statements: StatementMap,
    /// `(type, case-folded identifier)` to position in the type's list.
    index: HashMap<IndexKey, usize>,
}

impl SqlStatements {
    /// Starts a new collection labelled `system_name`.
    #[must_use]
    pub fn builder(system_name: impl Into<String>) -> SqlStatementsBuilder {
        SqlStatementsBuilder {
            system_name: system_name.into(),
            statements: StatementMap::default(),
        }
    }

    /// The label of the system these statements belong to.
    #[must_use]
    pub fn system_name(&self) -> &str {
        &self.system_name
    }

    /// The statements of one type, in registration order.
    #[must_use]
    pub fn statements(&self, sql_type: SqlStatementType) -> &[SqlStatement] {
        self.statements
            .get(&sql_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates over every statement, by type and then registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SqlStatement> {
        self.statements.values().flatten()
    }

    /// Total number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.values().map(Vec::len).sum()
    }

    /// Whether the collection holds no statement.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.values().all(Vec::is_empty)
    }

    /// Finds the first statement of `sql_type` whose identifier matches,
    /// ignoring case.
    ///
    /// # Errors
    ///
    /// * `StatementNotFound` - If no statement of that type has the identifier.
    pub fn get_statement(
        &self,
        identifier: &str,
        sql_type: SqlStatementType,
    ) -> Result<&SqlStatement, Error> {
        self.index
            .get(&IndexQuery {
                sql_type,
                identifier,
            })
            .and_then(|position| self.statements(sql_type).get(*position))
            .ok_or_else(|| {
                tracing::trace!(
                    system_name = %self.system_name,
                    identifier,
                    %sql_type,
                    "statement lookup failed"
                );
                Error::StatementNotFound {
                    identifier: identifier.into(),
                    sql_type,
                }
            })
    }

    /// Finds a [`SqlStatementType::Read`] statement by identifier.
    ///
    /// # Errors
    ///
    /// * `StatementNotFound` - If no read statement has the identifier.
    pub fn get_read_statement(&self, identifier: &str) -> Result<&SqlStatement, Error> {
        self.get_statement(identifier, SqlStatementType::Read)
    }

    /// Loads a collection from its JSON document form.
    ///
    /// Each statement is filed under its own `sqlType`, regardless of the
    /// list it appears in.
    ///
    /// # Errors
    ///
    /// * `Json` - If the document is malformed.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|err| Error::Json(err.to_string()))
    }

    /// Writes the collection in its JSON document form.
    ///
    /// # Errors
    ///
    /// * `Json` - If serialization fails.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|err| Error::Json(err.to_string()))
    }
}

impl<'a> IntoIterator for &'a SqlStatements {
    type Item = &'a SqlStatement;
    type IntoIter = core::iter::Flatten<indexmap::map::Values<'a, SqlStatementType, Vec<SqlStatement>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.values().flatten()
    }
}

#[cfg(feature = "json")]
mod document {
    //! Wire shape of a statement collection.

    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    use serde::{Deserialize, Serialize};

    use super::SqlStatements;
    use crate::{SqlStatement, SqlStatementType};

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct SqlStatementsDocument {
        system_name: String,
        #[serde(default)]
        statements: BTreeMap<SqlStatementType, Vec<SqlStatement>>,
    }

    impl From<SqlStatementsDocument> for SqlStatements {
        fn from(document: SqlStatementsDocument) -> Self {
            let mut builder = SqlStatements::builder(document.system_name);
            builder.extend(document.statements.into_values().flatten());
            builder.build()
        }
    }

    impl From<SqlStatements> for SqlStatementsDocument {
        fn from(statements: SqlStatements) -> Self {
            Self {
                system_name: statements.system_name,
                statements: statements.statements.into_iter().collect(),
            }
        }
    }
}
