//! cypher-lint - Offline Cypher query validation against a graph schema
//!
//! This crate checks read-only Cypher queries without touching a database:
//! - Parsing of the MATCH/WHERE/RETURN/ORDER BY subset
//! - Schema validation of labels, relationship types and properties
//! - Optional type checking of WHERE comparisons
//!
//! The entry point is [`validate`]; schemas are described by
//! [`DbSchema`], either built programmatically or deserialized from JSON.

pub mod graph_catalog;
pub mod open_cypher_parser;
pub mod query_validator;

pub use graph_catalog::graph_schema::{
    DbSchema, PropertyDef, PropertyType, SchemaMetadata, SchemaRelationship,
};
pub use query_validator::{
    validate, TypeCheckLevel, TypeIssue, TypeIssueSeverity, ValidationError, ValidationOptions,
};
