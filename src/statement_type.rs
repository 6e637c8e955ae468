//! Classification of statements into create, read, update and delete.

use alloc::string::ToString;
use core::fmt::{self, Display};
use core::str::FromStr;

use crate::errors::Error;

/// The kind of work a statement performs.
///
/// Ordering follows declaration order, so collections keyed by type list
/// `CREATE` statements first and `DELETE` statements last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "UPPERCASE"))]
pub enum SqlStatementType {
    /// Inserts rows or creates objects.
    Create,
    /// Reads rows. This is the type assumed when a lookup names none.
    #[default]
    Read,
    /// Modifies existing rows.
    Update,
    /// Removes rows.
    Delete,
}

impl SqlStatementType {
    /// Every statement type, in natural order.
    pub const ALL: [Self; 4] = [Self::Create, Self::Read, Self::Update, Self::Delete];

    /// Returns the upper-case name of the type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl Display for SqlStatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SqlStatementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|sql_type| sql_type.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::UnknownStatementType(s.to_string()))
    }
}
