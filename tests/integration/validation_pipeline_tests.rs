//! End-to-end schema validation through [`cypher_lint::validate`].

use cypher_lint::{
    validate, DbSchema, PropertyDef, PropertyType, TypeCheckLevel, ValidationOptions,
};

fn company_schema() -> DbSchema {
    let mut schema = DbSchema::new();
    schema
        .add_node(
            "Person",
            vec![
                PropertyDef::new("name", PropertyType::String),
                PropertyDef::new("age", PropertyType::Integer),
            ],
        )
        .add_node(
            "Company",
            vec![
                PropertyDef::new("name", PropertyType::String),
                PropertyDef::new("founded", PropertyType::Integer),
            ],
        )
        .add_relationship(
            "Person",
            "WORKS_AT",
            "Company",
            vec![PropertyDef::new("salary", PropertyType::Float)],
        )
        .add_relationship("Person", "KNOWS", "Person", vec![]);
    schema
}

fn errors_for(query: &str) -> Vec<String> {
    crate::init_test_logging();
    let (errors, _) = validate(query, &company_schema(), ValidationOptions::default()).unwrap();
    errors
}

#[test]
fn test_clean_query_produces_no_errors() {
    let errors = errors_for(
        "MATCH (p:Person)-[w:WORKS_AT]->(c:Company) \
         WHERE p.age > 30 AND w.salary >= 50000.0 \
         RETURN p.name, c.name ORDER BY p.name LIMIT 10",
    );
    assert!(errors.is_empty(), "unexpected: {:?}", errors);
}

#[test]
fn test_unknown_label_names_the_label() {
    let errors = errors_for("MATCH (m:Movie) RETURN m");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Movie"), "got: {}", errors[0]);
}

#[test]
fn test_unknown_relationship_type_names_the_type() {
    let errors = errors_for("MATCH (p:Person)-[:DIRECTED]->(c:Company) RETURN p");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("DIRECTED"), "got: {}", errors[0]);
}

#[test]
fn test_relationship_in_wrong_direction_is_rejected() {
    let errors = errors_for("MATCH (c:Company)-[:WORKS_AT]->(p:Person) RETURN c");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("WORKS_AT"), "got: {}", errors[0]);
}

#[test]
fn test_undirected_pattern_matches_declared_orientation() {
    let errors = errors_for("MATCH (c:Company)-[:WORKS_AT]-(p:Person) RETURN c");
    assert!(errors.is_empty(), "unexpected: {:?}", errors);
}

#[test]
fn test_unknown_property_names_the_property() {
    let errors = errors_for("MATCH (p:Person) WHERE p.height > 180 RETURN p");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("height"), "got: {}", errors[0]);
}

#[test]
fn test_relationship_chain_is_validated_hop_by_hop() {
    let errors = errors_for(
        "MATCH (a:Person)-[:KNOWS]->(b:Person)-[:WORKS_AT]->(c:Company) RETURN a, b, c",
    );
    assert!(errors.is_empty(), "unexpected: {:?}", errors);
}

#[test]
fn test_undefined_variable_in_return_is_reported() {
    let errors = errors_for("MATCH (p:Person) RETURN q.name");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("q"), "got: {}", errors[0]);
}

#[test]
fn test_multiple_problems_are_all_reported() {
    let errors = errors_for("MATCH (m:Movie)-[:DIRECTED]->(p:Person) WHERE p.height > 1 RETURN m");
    assert_eq!(errors.len(), 3, "got: {:?}", errors);
    assert!(errors[0].contains("Movie"));
    assert!(errors[1].contains("DIRECTED"));
    assert!(errors[2].contains("height"));
}

#[test]
fn test_repeated_runs_give_identical_output() {
    // diagnostics are order-stable across calls with the same inputs
    let schema = company_schema();
    let query = "MATCH (m:Movie)-[:DIRECTED]->(p:Person) \
                 WHERE p.age = 'old' AND p.height > 1 RETURN m";
    let options = ValidationOptions {
        type_checking: TypeCheckLevel::Warnings,
    };
    let first = validate(query, &schema, options).unwrap();
    let second = validate(query, &schema, options).unwrap();
    assert_eq!(first, second);
    assert!(!first.0.is_empty());
}

#[test]
fn test_malformed_query_is_a_parse_error() {
    let result = validate(
        "MATCH (p:Person RETURN p",
        &company_schema(),
        ValidationOptions::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_trailing_garbage_is_a_parse_error() {
    let result = validate(
        "MATCH (p:Person) RETURN p ???",
        &company_schema(),
        ValidationOptions::default(),
    );
    assert!(result.is_err());
}
