//! A single named SQL template and the metadata needed to fill it in.

use alloc::borrow::Cow;
use alloc::string::String;
use core::cmp::Ordering;
use core::fmt::{self, Display};

use crate::{SqlStatementType, SqlTemplateSubstitution, Substitutions};

/// Default placeholder emitted once per parameter by `##ARGUMENTS##`.
pub const DEFAULT_ARGUMENT_TOKEN: char = '?';

const TOKEN_MARKER: &str = "##";

/// A templated SQL statement.
///
/// The template may contain any of the `##TOKEN##` placeholders listed by
/// [`SqlTemplateSubstitution`]. The optional `params` field is a
/// comma-separated list of parameter names, which doubles as the source of
/// the synthetic `##PARAMS##` and `##ARGUMENTS##` values.
///
/// # Example
///
/// ```
/// use sql_template_rs::{SqlStatement, SqlStatementType};
///
/// let statement = SqlStatement::new(
///     "insertPerson",
///     SqlStatementType::Create,
///     "insert into person (##PARAMS##) values (##ARGUMENTS##)",
/// )
/// .with_params("a, b, c");
///
/// assert_eq!(statement.num_parameters(), 3);
/// assert_eq!(
///     statement.tokenize(None),
///     "insert into person (a, b, c) values (?, ?, ?)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
pub struct SqlStatement {
    identifier: String,
    sql_type: SqlStatementType,
    template: String,
    #[cfg_attr(feature = "json", serde(default, skip_serializing_if = "Option::is_none"))]
    params: Option<String>,
    #[cfg_attr(feature = "json", serde(default = "default_argument_token"))]
    argument_token: char,
}

#[cfg(feature = "json")]
fn default_argument_token() -> char {
    DEFAULT_ARGUMENT_TOKEN
}

impl SqlStatement {
    /// Creates a statement without parameters, using `?` as argument token.
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        sql_type: SqlStatementType,
        template: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            sql_type,
            template: template.into(),
            params: None,
            argument_token: DEFAULT_ARGUMENT_TOKEN,
        }
    }

    /// Sets the comma-separated parameter list.
    #[must_use]
    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = Some(params.into());
        self
    }

    /// Sets the placeholder character emitted by `##ARGUMENTS##`.
    #[must_use]
    pub fn with_argument_token(mut self, argument_token: char) -> Self {
        self.argument_token = argument_token;
        self
    }

    /// The key under which the statement is looked up.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The statement's classification.
    #[must_use]
    pub fn sql_type(&self) -> SqlStatementType {
        self.sql_type
    }

    /// The raw, untokenized template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The comma-separated parameter list, if one was given.
    #[must_use]
    pub fn params(&self) -> Option<&str> {
        self.params.as_deref()
    }

    /// The placeholder character emitted once per parameter.
    #[must_use]
    pub fn argument_token(&self) -> char {
        self.argument_token
    }

    /// Number of parameters: commas in `params` plus one, or zero when blank.
    #[must_use]
    pub fn num_parameters(&self) -> usize {
        match self.non_blank_params() {
            Some(params) => params.matches(',').count() + 1,
            None => 0,
        }
    }

    /// Iterates over the trimmed parameter names.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.non_blank_params()
            .into_iter()
            .flat_map(|params| params.split(','))
            .map(str::trim)
    }

    /// The default `##ARGUMENTS##` value, e.g. `?, ?, ?` for three parameters.
    #[must_use]
    pub fn arguments(&self) -> String {
        let mut arguments = String::new();
        for index in 0..self.num_parameters() {
            if index > 0 {
                arguments.push_str(", ");
            }
            arguments.push(self.argument_token);
        }
        arguments
    }

    /// Produces executable SQL by replacing every known token in the template.
    ///
    /// Values in `substitutions` take precedence. Missing synthetic tokens
    /// fall back to [`params`](Self::params) and
    /// [`arguments`](Self::arguments), every other missing token becomes the
    /// empty string. The template is scanned once from left to right:
    /// replacement text is never scanned again, and `##...##` sequences that
    /// do not name a known token are copied unchanged.
    #[must_use]
    pub fn tokenize(&self, substitutions: Option<&Substitutions>) -> String {
        let mut sql = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(position) = rest.find(TOKEN_MARKER) {
            sql.push_str(&rest[..position]);
            rest = &rest[position..];

            let matched = SqlTemplateSubstitution::ALL
                .into_iter()
                .find(|substitution| rest.starts_with(substitution.token()));

            match matched {
                Some(substitution) => {
                    sql.push_str(&self.resolve(substitution, substitutions));
                    rest = &rest[substitution.token().len()..];
                }
                None => {
                    // Advance a single '#' so "###WHERE##" still matches at offset 1.
                    sql.push('#');
                    rest = &rest[1..];
                }
            }
        }

        sql.push_str(rest);
        sql
    }

    fn resolve<'a>(
        &'a self,
        substitution: SqlTemplateSubstitution,
        substitutions: Option<&'a Substitutions>,
    ) -> Cow<'a, str> {
        if let Some(value) = substitutions.and_then(|map| map.get(substitution)) {
            return Cow::Borrowed(value);
        }
        match substitution {
            SqlTemplateSubstitution::Params => Cow::Borrowed(self.params.as_deref().unwrap_or("")),
            SqlTemplateSubstitution::Arguments => Cow::Owned(self.arguments()),
            SqlTemplateSubstitution::Distinct
            | SqlTemplateSubstitution::Table
            | SqlTemplateSubstitution::Where => Cow::Borrowed(""),
        }
    }

    fn non_blank_params(&self) -> Option<&str> {
        self.params
            .as_deref()
            .filter(|params| !params.trim().is_empty())
    }
}

impl PartialOrd for SqlStatement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SqlStatement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sql_type
            .cmp(&other.sql_type)
            .then_with(|| self.identifier.cmp(&other.identifier))
            .then_with(|| self.template.cmp(&other.template))
            .then_with(|| self.params.cmp(&other.params))
            .then_with(|| self.argument_token.cmp(&other.argument_token))
    }
}

impl Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.sql_type, self.identifier, self.template)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn read(template: &str) -> SqlStatement {
        SqlStatement::new("test", SqlStatementType::Read, template)
    }

    #[test]
    fn test_num_parameters() {
        assert_eq!(read("select 1").num_parameters(), 0);
        assert_eq!(read("select 1").with_params("").num_parameters(), 0);
        assert_eq!(read("select 1").with_params("   ").num_parameters(), 0);
        assert_eq!(read("select 1").with_params("a").num_parameters(), 1);
        assert_eq!(read("select 1").with_params("a, b,c").num_parameters(), 3);
    }

    #[test]
    fn test_param_names_are_trimmed() {
        let statement = read("select 1").with_params(" id ,name,  email");
        let names: Vec<&str> = statement.param_names().collect();
        assert_eq!(names, ["id", "name", "email"]);
        assert_eq!(read("select 1").param_names().count(), 0);
    }

    #[test]
    fn test_arguments_use_custom_token() {
        let statement = read("select 1")
            .with_params("a, b")
            .with_argument_token('%');
        assert_eq!(statement.arguments(), "%, %");
        assert_eq!(read("select 1").arguments(), "");
    }

    #[test]
    fn test_tokenize_without_params_empties_arguments() {
        let statement = SqlStatement::new(
            "insert",
            SqlStatementType::Create,
            "insert into t values (##ARGUMENTS##)",
        );
        assert_eq!(statement.tokenize(None), "insert into t values ()");
    }

    #[test]
    fn test_tokenize_defaults_non_synthetic_to_empty() {
        let statement = read("select ##DISTINCT## * from ##TABLE## ##WHERE##");
        assert_eq!(statement.tokenize(None), "select  * from  ");
    }

    #[test]
    fn test_tokenize_caller_overrides_synthetic() {
        let statement = SqlStatement::new(
            "insert",
            SqlStatementType::Create,
            "insert into t (##PARAMS##) values (##ARGUMENTS##)",
        )
        .with_params("a, b");
        let substitutions = SqlTemplateSubstitution::builder()
            .arguments("$1, $2")
            .build();
        assert_eq!(
            statement.tokenize(Some(&substitutions)),
            "insert into t (a, b) values ($1, $2)"
        );
    }

    #[test]
    fn test_tokenize_does_not_rescan_replacements() {
        let statement = read("select * from ##TABLE## ##WHERE##");
        let substitutions = SqlTemplateSubstitution::builder()
            .table("##WHERE##")
            .r#where("where id = 1")
            .build();
        assert_eq!(
            statement.tokenize(Some(&substitutions)),
            "select * from ##WHERE## where id = 1"
        );
    }

    #[test]
    fn test_tokenize_keeps_unknown_tokens() {
        let statement = read("select ##COLUMNS## from t ###WHERE## # ##");
        let substitutions = SqlTemplateSubstitution::builder().r#where("w").build();
        assert_eq!(
            statement.tokenize(Some(&substitutions)),
            "select ##COLUMNS## from t #w # ##"
        );
    }

    #[test]
    fn test_tokenize_replaces_repeated_tokens() {
        let statement = read("##TABLE##.a, ##TABLE##.b");
        let substitutions = SqlTemplateSubstitution::builder().table("t").build();
        assert_eq!(statement.tokenize(Some(&substitutions)), "t.a, t.b");
    }

    #[test]
    fn test_ordering_by_type_then_identifier() {
        let mut statements = [
            SqlStatement::new("b", SqlStatementType::Read, ""),
            SqlStatement::new("z", SqlStatementType::Create, ""),
            SqlStatement::new("a", SqlStatementType::Read, ""),
            SqlStatement::new("a", SqlStatementType::Delete, ""),
        ];
        statements.sort();
        let keys: Vec<(SqlStatementType, &str)> = statements
            .iter()
            .map(|statement| (statement.sql_type(), statement.identifier()))
            .collect();
        assert_eq!(
            keys,
            [
                (SqlStatementType::Create, "z"),
                (SqlStatementType::Read, "a"),
                (SqlStatementType::Read, "b"),
                (SqlStatementType::Delete, "a"),
            ]
        );
    }

    #[test]
    fn test_display() {
        let statement = SqlStatement::new("getAll", SqlStatementType::Read, "select * from t");
        assert_eq!(
            alloc::format!("{statement}"),
            "[READ] getAll: select * from t"
        );
    }
}
