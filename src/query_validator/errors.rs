//! # Validation Error Types
//!
//! Two layers of failure: `ValidationError` for conditions that abort
//! validation entirely (the query did not parse), and `SchemaViolation` for
//! schema check findings that are collected and reported together.

use thiserror::Error;

/// Hard failure: validation could not run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Failed to parse query at offset {offset}: {message}")]
    Parse { offset: usize, message: String },
}

/// A single schema check finding. Rendered to a plain string for callers;
/// every message carries the offending identifier verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq, Hash)]
pub enum SchemaViolation {
    #[error("Node label `{label}` not found in schema")]
    UnknownNodeLabel { label: String },

    #[error("Relationship type `{rel_type}` not found in schema")]
    UnknownRelationshipType { rel_type: String },

    #[error("No `{rel_type}` relationship is declared between `{start}` and `{end}` in this direction")]
    InvalidRelationship {
        start: String,
        rel_type: String,
        end: String,
    },

    #[error("Property `{property}` not found on node label `{label}`")]
    UnknownNodeProperty { label: String, property: String },

    #[error("Property `{property}` not found on relationship type `{rel_type}`")]
    UnknownRelationshipProperty { rel_type: String, property: String },

    #[error("Property `{property}` not found anywhere in schema")]
    UnknownProperty { property: String },

    #[error("Variable `{variable}` is not defined in any MATCH pattern")]
    UndefinedVariable { variable: String },
}
