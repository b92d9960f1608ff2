//! Loading a schema from its JSON wire form and validating against it.

use cypher_lint::{validate, DbSchema, PropertyType, TypeCheckLevel, ValidationOptions};

const SCHEMA_JSON: &str = r#"{
    "node_props": {
        "Person": [
            {"name": "name", "type": "STRING"},
            {"name": "age", "type": "INTEGER"},
            {"name": "active", "type": "BOOLEAN"},
            {"name": "joined", "type": "DATE_TIME"}
        ],
        "Company": [
            {"name": "name", "type": "STRING"}
        ]
    },
    "rel_props": {
        "WORKS_AT": [
            {"name": "salary", "type": "FLOAT"}
        ]
    },
    "relationships": [
        {"start": "Person", "rel_type": "WORKS_AT", "end": "Company"}
    ],
    "metadata": {
        "constraints": ["Person.name IS UNIQUE"],
        "indexes": ["Person.age"]
    }
}"#;

fn load_schema() -> DbSchema {
    serde_json::from_str(SCHEMA_JSON).expect("schema JSON should deserialize")
}

#[test]
fn test_json_schema_round_trips_property_types() {
    let schema = load_schema();
    assert_eq!(
        schema.node_property("Person", "joined").map(|p| p.property_type),
        Some(PropertyType::DateTime)
    );
    assert_eq!(
        schema.relationship_property("WORKS_AT", "salary").map(|p| p.property_type),
        Some(PropertyType::Float)
    );
}

#[test]
fn test_metadata_is_advisory_only() {
    let schema = load_schema();
    assert_eq!(schema.metadata.constraints.len(), 1);
    // a query ignoring the uniqueness constraint still validates
    let (errors, _) = validate(
        "MATCH (p:Person) WHERE p.name = 'Alice' RETURN p",
        &schema,
        ValidationOptions::default(),
    )
    .unwrap();
    assert!(errors.is_empty());
}

#[test]
fn test_validation_against_loaded_schema() {
    let schema = load_schema();
    let (errors, issues) = validate(
        "MATCH (p:Person)-[w:WORKS_AT]->(c:Company) WHERE w.salary > 100.0 RETURN p.name",
        &schema,
        ValidationOptions {
            type_checking: TypeCheckLevel::Strict,
        },
    )
    .unwrap();
    assert!(errors.is_empty(), "unexpected: {:?}", errors);
    assert!(issues.is_empty(), "unexpected: {:?}", issues);
}

#[test]
fn test_missing_sections_default_to_empty() {
    let schema: DbSchema = serde_json::from_str(r#"{"node_props": {"Person": []}}"#).unwrap();
    assert!(schema.has_node_label("Person"));
    assert!(!schema.has_relationship_type("WORKS_AT"));
    assert!(schema.metadata.constraints.is_empty());
}
