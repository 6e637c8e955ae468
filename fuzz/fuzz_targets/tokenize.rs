//! Tokenization fuzzer.
//!
//! Feeds arbitrary templates, parameter lists and substitution values through
//! `SqlStatement::tokenize` and checks the invariants that hold for any input:
//! templates without `#` come back unchanged, and the default argument list
//! is exactly one token per parameter joined by `, `.

use arbitrary::Arbitrary;
use honggfuzz::fuzz;
use sql_template_rs::{SqlStatement, SqlStatementType, SqlTemplateSubstitution};

#[derive(Debug, Arbitrary)]
struct TokenizeInput {
    template: String,
    params: Option<String>,
    argument_token: char,
    table: Option<String>,
    r#where: Option<String>,
    distinct: bool,
}

fn check(input: TokenizeInput) {
    let mut statement = SqlStatement::new("fuzz", SqlStatementType::Read, input.template.clone())
        .with_argument_token(input.argument_token);
    if let Some(params) = input.params {
        statement = statement.with_params(params);
    }

    let mut builder = SqlTemplateSubstitution::builder();
    if let Some(table) = input.table {
        builder = builder.table(table);
    }
    if let Some(clause) = input.r#where {
        builder = builder.r#where(clause);
    }
    if input.distinct {
        builder = builder.distinct();
    }
    let substitutions = builder.build();

    let sql = statement.tokenize(Some(&substitutions));
    if !input.template.contains('#') {
        assert_eq!(sql, input.template);
    }

    let expected = vec![input.argument_token.to_string(); statement.num_parameters()].join(", ");
    assert_eq!(statement.arguments(), expected);

    let arguments_only = SqlStatement::new("fuzz", SqlStatementType::Create, "##ARGUMENTS##")
        .with_argument_token(input.argument_token);
    let arguments_only = match statement.params() {
        Some(params) => arguments_only.with_params(params),
        None => arguments_only,
    };
    assert_eq!(arguments_only.tokenize(None), expected);
}

fn main() {
    loop {
        fuzz!(|input: TokenizeInput| {
            check(input);
        });
    }
}
