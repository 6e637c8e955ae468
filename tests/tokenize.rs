//! Integration tests for statement tokenization.
//!
//! These tests cover:
//! - Synthetic `##PARAMS##` and `##ARGUMENTS##` defaults
//! - Caller-supplied substitutions built with `SqlTemplateSubstitution::builder`
//! - Templates looked up from a frozen `SqlStatements` collection

use sql_template_rs::{
    SqlStatement, SqlStatementType, SqlStatements, SqlTemplateSubstitution, Substitutions,
};

/// Returns true if any known `##TOKEN##` remains in `sql`.
fn has_known_token(sql: &str) -> bool {
    SqlTemplateSubstitution::ALL
        .iter()
        .any(|substitution| sql.contains(substitution.token()))
}

// =============================================================================
// Synthetic substitutions
// =============================================================================

#[test]
fn test_insert_template_expands_params_and_arguments() {
    let statement = SqlStatement::new(
        "insertT",
        SqlStatementType::Create,
        "insert into t (##PARAMS##) values (##ARGUMENTS##)",
    )
    .with_params("a, b, c");

    assert_eq!(
        statement.tokenize(None),
        "insert into t (a, b, c) values (?, ?, ?)"
    );
}

#[test]
fn test_argument_count_follows_comma_count() {
    for n in 1..=8 {
        let params: Vec<String> = (0..n).map(|i| format!("p{i}")).collect();
        let statement = SqlStatement::new("s", SqlStatementType::Create, "##ARGUMENTS##")
            .with_params(params.join(","));

        assert_eq!(statement.num_parameters(), n);
        let sql = statement.tokenize(None);
        assert_eq!(sql.matches('?').count(), n);
        assert_eq!(sql, vec!["?"; n].join(", "));
    }
}

#[test]
fn test_blank_params_yield_no_arguments() {
    for statement in [
        SqlStatement::new("s", SqlStatementType::Create, "values (##ARGUMENTS##)"),
        SqlStatement::new("s", SqlStatementType::Create, "values (##ARGUMENTS##)").with_params(""),
    ] {
        assert_eq!(statement.num_parameters(), 0);
        assert_eq!(statement.tokenize(None), "values ()");
    }
}

#[test]
fn test_custom_argument_token() {
    let statement = SqlStatement::new(
        "insertT",
        SqlStatementType::Create,
        "insert into t (##PARAMS##) values (##ARGUMENTS##)",
    )
    .with_params("a,b")
    .with_argument_token('@');

    assert_eq!(statement.tokenize(None), "insert into t (a,b) values (@, @)");
}

// =============================================================================
// Caller-supplied substitutions
// =============================================================================

#[test]
fn test_distinct_and_where_substitutions() {
    let statement = SqlStatement::new(
        "tagged",
        SqlStatementType::Read,
        "select ##DISTINCT## name from items ##WHERE##",
    );
    let substitutions = SqlTemplateSubstitution::builder()
        .distinct()
        .r#where("apa = any (?)")
        .build();

    let sql = statement.tokenize(Some(&substitutions));
    assert!(sql.contains("distinct"));
    assert!(sql.contains("apa = any (?)"));
    assert!(!has_known_token(&sql));
}

#[test]
fn test_table_substitution_from_iterator() {
    let statement = SqlStatement::new(
        "count",
        SqlStatementType::Read,
        "select count(*) from ##TABLE##",
    );
    let substitutions: Substitutions =
        [(SqlTemplateSubstitution::Table, "orders".to_string())]
            .into_iter()
            .collect();

    assert_eq!(
        statement.tokenize(Some(&substitutions)),
        "select count(*) from orders"
    );
}

#[test]
fn test_empty_substitutions_behave_like_none() {
    let statement = SqlStatement::new(
        "s",
        SqlStatementType::Read,
        "select ##DISTINCT## ##PARAMS## from t ##WHERE##",
    )
    .with_params("a, b");
    let empty = SqlTemplateSubstitution::builder().build();

    assert_eq!(statement.tokenize(Some(&empty)), statement.tokenize(None));
    assert_eq!(statement.tokenize(None), "select  a, b from t ");
}

#[test]
fn test_unknown_tokens_pass_through() {
    let statement = SqlStatement::new(
        "s",
        SqlStatementType::Read,
        "select * from t ##ORDER## ##WHERE##",
    );

    assert_eq!(statement.tokenize(None), "select * from t ##ORDER## ");
}

// =============================================================================
// Lookup then tokenize
// =============================================================================

#[test]
fn test_lookup_then_tokenize() {
    let statements = SqlStatements::builder("orders")
        .add_statement(SqlStatement::new(
            "byCustomer",
            SqlStatementType::Read,
            "select * from ##TABLE## ##WHERE##",
        ))
        .add_statement(
            SqlStatement::new(
                "addOrder",
                SqlStatementType::Create,
                "insert into ##TABLE## (##PARAMS##) values (##ARGUMENTS##)",
            )
            .with_params("customer, total"),
        )
        .build();
    let substitutions = SqlTemplateSubstitution::builder()
        .table("orders")
        .r#where("where customer = ?")
        .build();

    let read = statements.get_read_statement("bycustomer").unwrap();
    assert_eq!(
        read.tokenize(Some(&substitutions)),
        "select * from orders where customer = ?"
    );

    let create = statements
        .get_statement("ADDORDER", SqlStatementType::Create)
        .unwrap();
    assert_eq!(
        create.tokenize(Some(&substitutions)),
        "insert into orders (customer, total) values (?, ?)"
    );
}

#[test]
fn test_missing_statement_error() {
    let statements = SqlStatements::builder("orders").build();
    let err = statements
        .get_statement("missingId", SqlStatementType::Update)
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("missingId"));
    assert!(message.contains("UPDATE"));
}
