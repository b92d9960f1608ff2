//! End-to-end type checking at the warnings and strict levels.

use cypher_lint::{
    validate, DbSchema, PropertyDef, PropertyType, TypeCheckLevel, TypeIssue, TypeIssueSeverity,
    ValidationOptions,
};

fn people_schema() -> DbSchema {
    let mut schema = DbSchema::new();
    schema
        .add_node(
            "Person",
            vec![
                PropertyDef::new("name", PropertyType::String),
                PropertyDef::new("age", PropertyType::Integer),
                PropertyDef::new("active", PropertyType::Boolean),
                PropertyDef::new("joined", PropertyType::DateTime),
            ],
        )
        .add_relationship(
            "Person",
            "WORKS_FOR",
            "Person",
            vec![PropertyDef::new("salary", PropertyType::Float)],
        );
    schema
}

fn run(query: &str, level: TypeCheckLevel) -> (Vec<String>, Vec<TypeIssue>) {
    crate::init_test_logging();
    let options = ValidationOptions {
        type_checking: level,
    };
    validate(query, &people_schema(), options).unwrap()
}

#[test]
fn test_string_against_integer_is_a_warning_not_an_error() {
    let (errors, issues) = run(
        "MATCH (p:Person) WHERE p.age = 'twenty-five' RETURN p",
        TypeCheckLevel::Warnings,
    );
    assert!(errors.is_empty(), "schema errors: {:?}", errors);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, TypeIssueSeverity::Warning);
    let message = issues[0].message.to_lowercase();
    assert!(message.contains("age"), "got: {}", issues[0].message);
    assert!(message.contains("integer"), "got: {}", issues[0].message);
    assert!(message.contains("string"), "got: {}", issues[0].message);
}

#[test]
fn test_strict_reports_each_mismatch_as_an_error() {
    let (errors, issues) = run(
        "MATCH (p:Person) WHERE p.age = 'thirty' AND p.active = 1 RETURN p",
        TypeCheckLevel::Strict,
    );
    assert!(errors.is_empty());
    assert_eq!(issues.len(), 2, "got: {:?}", issues);
    assert!(issues
        .iter()
        .all(|i| i.severity == TypeIssueSeverity::Error));
}

#[test]
fn test_warnings_and_strict_detect_the_same_issues() {
    let query = "MATCH (p:Person) WHERE p.age = 'thirty' AND p.active = 1 RETURN p";
    let (_, warnings) = run(query, TypeCheckLevel::Warnings);
    let (_, errors) = run(query, TypeCheckLevel::Strict);
    let warning_messages: Vec<&str> = warnings.iter().map(|i| i.message.as_str()).collect();
    let error_messages: Vec<&str> = errors.iter().map(|i| i.message.as_str()).collect();
    assert_eq!(warning_messages, error_messages);
}

#[test]
fn test_integer_against_boolean_suggests_boolean_literals() {
    let (_, issues) = run(
        "MATCH (p:Person) WHERE p.active = 0 RETURN p",
        TypeCheckLevel::Warnings,
    );
    assert_eq!(issues.len(), 1);
    let suggestion = issues[0].suggestion.as_deref().expect("suggestion");
    assert!(suggestion.contains("true") && suggestion.contains("false"));
}

#[test]
fn test_integer_against_float_relationship_property() {
    let (_, issues) = run(
        "MATCH (a:Person)-[w:WORKS_FOR]->(b:Person) WHERE w.salary = 50000 RETURN w",
        TypeCheckLevel::Warnings,
    );
    assert_eq!(issues.len(), 1);
    let message = issues[0].message.to_lowercase();
    assert!(message.contains("salary"));
    assert!(message.contains("float"));
    assert!(message.contains("integer"));
}

#[test]
fn test_integer_to_float_mismatch_is_not_coerced() {
    // exact match only: an integer literal never satisfies a FLOAT property
    let (_, issues) = run(
        "MATCH (a:Person)-[w:WORKS_FOR]->(b:Person) WHERE w.salary > 100 RETURN w",
        TypeCheckLevel::Strict,
    );
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, TypeIssueSeverity::Error);
}

#[test]
fn test_datetime_property_against_string_suggests_constructor() {
    let (_, issues) = run(
        "MATCH (p:Person) WHERE p.joined > '2024-01-01' RETURN p",
        TypeCheckLevel::Warnings,
    );
    assert_eq!(issues.len(), 1);
    assert!(issues[0]
        .suggestion
        .as_deref()
        .expect("suggestion")
        .contains("date("));
}

#[test]
fn test_matching_types_raise_no_issues_even_at_strict() {
    let (_, issues) = run(
        "MATCH (p:Person) WHERE p.age >= 21 AND p.active = true AND p.name <> 'Bob' RETURN p",
        TypeCheckLevel::Strict,
    );
    assert!(issues.is_empty(), "unexpected: {:?}", issues);
}

#[test]
fn test_off_level_short_circuits() {
    let (_, issues) = run(
        "MATCH (p:Person) WHERE p.age = 'twenty-five' RETURN p",
        TypeCheckLevel::Off,
    );
    assert!(issues.is_empty());
}
