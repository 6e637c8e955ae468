#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

pub mod errors;
#[cfg(feature = "rusqlite")]
pub mod execute;
pub mod in_clause;
pub mod statement;
pub mod statement_type;
pub mod statements;
pub mod substitution;

// Re-export main types
pub use in_clause::{
    InClause, InClauseArgument, LongInClause, SqlArray, StringInClause, any_where_clause,
    json_each_where_clause,
};
pub use statement::{DEFAULT_ARGUMENT_TOKEN, SqlStatement};
pub use statement_type::SqlStatementType;
pub use statements::{SqlStatements, SqlStatementsBuilder};
pub use substitution::{SqlTemplateSubstitution, Substitutions, SubstitutionsBuilder};

// Re-export errors
pub use errors::Error;

/// `IndexMap` alias using hashbrown's default hasher for `no_std` compatibility.
pub(crate) type IndexMap<K, V> = indexmap::IndexMap<K, V, hashbrown::DefaultHashBuilder>;
