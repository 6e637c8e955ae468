//! Named `##TOKEN##` placeholders and the maps that fill them.
//!
//! A template mentions tokens such as `##DISTINCT##` or `##WHERE##`; at
//! tokenize time each one is replaced with the text held for it in a
//! [`Substitutions`] map. The `PARAMS` and `ARGUMENTS` tokens are synthetic:
//! a statement computes them from its own parameter list when the map does
//! not carry them.
//!
//! # Example
//!
//! ```
//! use sql_template_rs::SqlTemplateSubstitution;
//!
//! let substitutions = SqlTemplateSubstitution::builder()
//!     .distinct()
//!     .r#where("apa = any (?)")
//!     .build();
//!
//! assert_eq!(substitutions.get(SqlTemplateSubstitution::Distinct), Some("distinct"));
//! assert_eq!(substitutions.get(SqlTemplateSubstitution::Table), None);
//! ```

use alloc::string::{String, ToString};
use core::fmt::{self, Display};
use core::str::FromStr;

use crate::IndexMap;
use crate::errors::Error;

/// A named placeholder that may appear inside a statement template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "UPPERCASE"))]
pub enum SqlTemplateSubstitution {
    /// `##DISTINCT##`, usually replaced by `distinct` or nothing.
    Distinct,
    /// `##TABLE##`, the table a statement targets.
    Table,
    /// `##WHERE##`, a where clause or nothing.
    Where,
    /// `##PARAMS##`, the statement's parameter names.
    Params,
    /// `##ARGUMENTS##`, one argument token per parameter.
    Arguments,
}

impl SqlTemplateSubstitution {
    /// Every substitution, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Distinct,
        Self::Table,
        Self::Where,
        Self::Params,
        Self::Arguments,
    ];

    /// Returns the upper-case name of the substitution.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Distinct => "DISTINCT",
            Self::Table => "TABLE",
            Self::Where => "WHERE",
            Self::Params => "PARAMS",
            Self::Arguments => "ARGUMENTS",
        }
    }

    /// Returns the token as written in templates, e.g. `##WHERE##`.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Distinct => "##DISTINCT##",
            Self::Table => "##TABLE##",
            Self::Where => "##WHERE##",
            Self::Params => "##PARAMS##",
            Self::Arguments => "##ARGUMENTS##",
        }
    }

    /// Whether the value is derived from the statement itself when absent.
    #[must_use]
    pub const fn is_synthetic(self) -> bool {
        matches!(self, Self::Params | Self::Arguments)
    }

    /// Starts a new, empty [`SubstitutionsBuilder`].
    #[must_use]
    pub fn builder() -> SubstitutionsBuilder {
        SubstitutionsBuilder::default()
    }
}

impl Display for SqlTemplateSubstitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SqlTemplateSubstitution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|substitution| substitution.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::UnknownSubstitution(s.to_string()))
    }
}

/// Immutable mapping from substitution to replacement text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    values: IndexMap<SqlTemplateSubstitution, String>,
}

impl Substitutions {
    /// Returns the replacement held for `substitution`, if any.
    #[must_use]
    pub fn get(&self, substitution: SqlTemplateSubstitution) -> Option<&str> {
        self.values.get(&substitution).map(String::as_str)
    }

    /// Iterates over the entries in the order they were first set.
    pub fn iter(&self) -> impl Iterator<Item = (SqlTemplateSubstitution, &str)> {
        self.values
            .iter()
            .map(|(substitution, value)| (*substitution, value.as_str()))
    }

    /// Number of substitutions held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no substitution is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(SqlTemplateSubstitution, String)> for Substitutions {
    fn from_iter<I: IntoIterator<Item = (SqlTemplateSubstitution, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Accumulates replacement values before freezing them into [`Substitutions`].
///
/// Setting the same substitution twice keeps the latest value.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionsBuilder {
    values: IndexMap<SqlTemplateSubstitution, String>,
}

impl SubstitutionsBuilder {
    /// Sets an arbitrary substitution.
    #[must_use]
    pub fn with(mut self, substitution: SqlTemplateSubstitution, value: impl Into<String>) -> Self {
        self.values.insert(substitution, value.into());
        self
    }

    /// Replaces `##DISTINCT##` with `distinct`.
    #[must_use]
    pub fn distinct(self) -> Self {
        self.with(SqlTemplateSubstitution::Distinct, "distinct")
    }

    /// Replaces `##TABLE##` with the given table name.
    #[must_use]
    pub fn table(self, table: impl Into<String>) -> Self {
        self.with(SqlTemplateSubstitution::Table, table)
    }

    /// Replaces `##WHERE##` with the given clause.
    #[must_use]
    pub fn r#where(self, clause: impl Into<String>) -> Self {
        self.with(SqlTemplateSubstitution::Where, clause)
    }

    /// Overrides the parameter list a statement would otherwise supply.
    #[must_use]
    pub fn params(self, params: impl Into<String>) -> Self {
        self.with(SqlTemplateSubstitution::Params, params)
    }

    /// Overrides the argument placeholders a statement would otherwise supply.
    #[must_use]
    pub fn arguments(self, arguments: impl Into<String>) -> Self {
        self.with(SqlTemplateSubstitution::Arguments, arguments)
    }

    /// Freezes the accumulated values.
    #[must_use]
    pub fn build(self) -> Substitutions {
        Substitutions {
            values: self.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_wrap_names() {
        for substitution in SqlTemplateSubstitution::ALL {
            assert_eq!(
                substitution.token(),
                alloc::format!("##{}##", substitution.name())
            );
        }
    }

    #[test]
    fn test_only_params_and_arguments_are_synthetic() {
        let synthetic: alloc::vec::Vec<_> = SqlTemplateSubstitution::ALL
            .into_iter()
            .filter(|substitution| substitution.is_synthetic())
            .collect();
        assert_eq!(
            synthetic,
            [SqlTemplateSubstitution::Params, SqlTemplateSubstitution::Arguments]
        );
    }

    #[test]
    fn test_builder_keeps_latest_value() {
        let substitutions = SqlTemplateSubstitution::builder()
            .table("first")
            .distinct()
            .table("second")
            .build();

        assert_eq!(substitutions.len(), 2);
        assert_eq!(substitutions.get(SqlTemplateSubstitution::Table), Some("second"));
        let order: alloc::vec::Vec<_> = substitutions.iter().map(|(key, _)| key).collect();
        assert_eq!(
            order,
            [SqlTemplateSubstitution::Table, SqlTemplateSubstitution::Distinct]
        );
    }

    #[test]
    fn test_empty_builder() {
        let substitutions = SqlTemplateSubstitution::builder().build();
        assert!(substitutions.is_empty());
        assert_eq!(substitutions, Substitutions::default());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "where".parse::<SqlTemplateSubstitution>().unwrap(),
            SqlTemplateSubstitution::Where
        );
        assert!(matches!(
            "ORDER".parse::<SqlTemplateSubstitution>(),
            Err(Error::UnknownSubstitution(name)) if name == "ORDER"
        ));
    }
}
