//! Thin helpers that run SQL against a `rusqlite` connection.
//!
//! This module is gated behind the `rusqlite` feature.
//!
//! # Provided helpers
//!
//! - [`query`] / [`query_first`]: run a query and convert rows with a caller-supplied closure
//! - [`update`]: run a statement and report the affected-row count
//! - [`insert`]: run an insert and report affected rows and the generated key
//! - [`query_in_clause`]: run a query whose only parameter is an [`InClause`]
//! - [`query_statement`] / [`execute_statement`]: tokenize an [`SqlStatement`] and run it

use alloc::vec::Vec;

use rusqlite::{Connection, Params, Row};

use crate::errors::Error;
use crate::in_clause::{InClause, InClauseArgument};
use crate::{SqlStatement, SqlStatementType, Substitutions};

/// Result of a data-modifying statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Number of rows changed.
    pub affected_rows: usize,
    /// Row id generated by an insert, if one happened.
    pub generated_key: Option<i64>,
}

/// Runs a query and converts every row.
///
/// # Errors
///
/// * `Sqlite` - If preparation, binding, execution or conversion fails.
pub fn query<T, P, F>(conn: &Connection, sql: &str, params: P, converter: F) -> Result<Vec<T>, Error>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    tracing::debug!(sql, "executing query");
    let mut statement = conn.prepare(sql)?;
    let rows = statement
        .query_map(params, converter)?
        .collect::<rusqlite::Result<Vec<T>>>()?;
    Ok(rows)
}

/// Runs a query and converts its first row, if any.
///
/// # Errors
///
/// * `Sqlite` - If preparation, binding, execution or conversion fails.
pub fn query_first<T, P, F>(
    conn: &Connection,
    sql: &str,
    params: P,
    mut converter: F,
) -> Result<Option<T>, Error>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    tracing::debug!(sql, "executing single-row query");
    let mut statement = conn.prepare(sql)?;
    let mut rows = statement.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(converter(row)?)),
        None => Ok(None),
    }
}

/// Runs a data-modifying statement and returns the affected-row count.
///
/// # Errors
///
/// * `Sqlite` - If preparation, binding or execution fails.
pub fn update<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<usize, Error> {
    tracing::debug!(sql, "executing update");
    let affected_rows = conn.execute(sql, params)?;
    tracing::debug!(affected_rows, "update done");
    Ok(affected_rows)
}

/// Runs an insert and reports the affected rows and the generated row id.
///
/// # Errors
///
/// * `Sqlite` - If preparation, binding or execution fails.
pub fn insert<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<UpdateOutcome, Error> {
    tracing::debug!(sql, "executing insert");
    let affected_rows = conn.execute(sql, params)?;
    let generated_key = (affected_rows > 0).then(|| conn.last_insert_rowid());
    tracing::debug!(affected_rows, ?generated_key, "insert done");
    Ok(UpdateOutcome {
        affected_rows,
        generated_key,
    })
}

/// Runs a query whose only parameter is the array bound by `in_clause`.
///
/// # Errors
///
/// * `Sqlite` - If preparation, binding, execution or conversion fails.
pub fn query_in_clause<T, A, F>(
    conn: &Connection,
    sql: &str,
    in_clause: &InClause<A>,
    mut converter: F,
) -> Result<Vec<T>, Error>
where
    A: InClauseArgument,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    tracing::debug!(sql, arguments = in_clause.arguments().len(), "executing in-clause query");
    let mut statement = conn.prepare(sql)?;
    in_clause.bind(&mut statement)?;

    let mut results = Vec::new();
    let mut rows = statement.raw_query();
    while let Some(row) = rows.next()? {
        results.push(converter(row)?);
    }
    Ok(results)
}

/// Tokenizes `statement` and runs it as a query.
///
/// # Errors
///
/// * `Sqlite` - If the tokenized SQL fails to prepare, bind, run or convert.
pub fn query_statement<T, P, F>(
    conn: &Connection,
    statement: &SqlStatement,
    substitutions: Option<&Substitutions>,
    params: P,
    converter: F,
) -> Result<Vec<T>, Error>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let sql = statement.tokenize(substitutions);
    tracing::debug!(identifier = statement.identifier(), "tokenized statement");
    query(conn, &sql, params, converter)
}

/// Tokenizes a data-modifying `statement` and runs it.
///
/// `CREATE` statements report the generated key; `UPDATE` and `DELETE`
/// statements only report affected rows.
///
/// # Errors
///
/// * `NotAnUpdate` - If `statement` is a `READ` statement.
/// * `Sqlite` - If the tokenized SQL fails to prepare, bind or run.
pub fn execute_statement<P: Params>(
    conn: &Connection,
    statement: &SqlStatement,
    substitutions: Option<&Substitutions>,
    params: P,
) -> Result<UpdateOutcome, Error> {
    let sql = statement.tokenize(substitutions);
    tracing::debug!(identifier = statement.identifier(), "tokenized statement");
    match statement.sql_type() {
        SqlStatementType::Create => insert(conn, &sql, params),
        SqlStatementType::Update | SqlStatementType::Delete => Ok(UpdateOutcome {
            affected_rows: update(conn, &sql, params)?,
            generated_key: None,
        }),
        SqlStatementType::Read => Err(Error::NotAnUpdate {
            identifier: statement.identifier().into(),
        }),
    }
}
