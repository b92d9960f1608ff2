//! # Graph Schema Model
//!
//! The declared shape of a graph: which node labels and relationship types
//! exist, which properties they carry (with declared types), and which
//! (start, type, end) triples are allowed.
//!
//! The model is a plain data structure. It is deserialized from a schema
//! document by the caller; validation passes only read it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Declared type of a node or relationship property.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyType::String => "String",
            PropertyType::Integer => "Integer",
            PropertyType::Float => "Float",
            PropertyType::Boolean => "Boolean",
            PropertyType::DateTime => "DateTime",
        };
        write!(f, "{}", name)
    }
}

/// A property declaration: name plus declared type.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        PropertyDef {
            name: name.into(),
            property_type,
        }
    }
}

/// An allowed relationship triple: `(:start)-[:rel_type]->(:end)`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SchemaRelationship {
    pub start: String,
    pub rel_type: String,
    pub end: String,
}

impl SchemaRelationship {
    pub fn new(
        start: impl Into<String>,
        rel_type: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        SchemaRelationship {
            start: start.into(),
            rel_type: rel_type.into(),
            end: end.into(),
        }
    }
}

/// Advisory schema metadata. Carried through deserialization for callers
/// that want it; validation never consults it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct SchemaMetadata {
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub indexes: Vec<String>,
}

/// A complete graph schema. Maps are ordered so diagnostics derived from
/// iteration are stable across runs.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct DbSchema {
    #[serde(default)]
    pub node_props: BTreeMap<String, Vec<PropertyDef>>,
    #[serde(default)]
    pub rel_props: BTreeMap<String, Vec<PropertyDef>>,
    #[serde(default)]
    pub relationships: Vec<SchemaRelationship>,
    #[serde(default)]
    pub metadata: SchemaMetadata,
}

impl DbSchema {
    pub fn new() -> Self {
        DbSchema::default()
    }

    /// Register a node label with its property declarations.
    pub fn add_node(&mut self, label: impl Into<String>, props: Vec<PropertyDef>) -> &mut Self {
        self.node_props.insert(label.into(), props);
        self
    }

    /// Register a relationship type with its property declarations and one
    /// allowed (start, type, end) triple.
    pub fn add_relationship(
        &mut self,
        start: impl Into<String>,
        rel_type: impl Into<String>,
        end: impl Into<String>,
        props: Vec<PropertyDef>,
    ) -> &mut Self {
        let rel_type = rel_type.into();
        self.rel_props.insert(rel_type.clone(), props);
        self.relationships
            .push(SchemaRelationship::new(start, rel_type, end));
        self
    }

    pub fn has_node_label(&self, label: &str) -> bool {
        self.node_props.contains_key(label)
    }

    pub fn has_relationship_type(&self, rel_type: &str) -> bool {
        self.rel_props.contains_key(rel_type)
    }

    pub fn node_property(&self, label: &str, prop: &str) -> Option<&PropertyDef> {
        self.node_props
            .get(label)
            .and_then(|props| props.iter().find(|p| p.name == prop))
    }

    pub fn relationship_property(&self, rel_type: &str, prop: &str) -> Option<&PropertyDef> {
        self.rel_props
            .get(rel_type)
            .and_then(|props| props.iter().find(|p| p.name == prop))
    }

    /// Whether a directed triple `(start)-[rel_type]->(end)` is declared.
    pub fn has_relationship_triple(&self, start: &str, rel_type: &str, end: &str) -> bool {
        self.relationships
            .iter()
            .any(|r| r.start == start && r.rel_type == rel_type && r.end == end)
    }

    /// Whether a property name exists anywhere in the schema, on any node
    /// label or relationship type. Used when a variable has no usable
    /// binding and per-label resolution is impossible.
    pub fn property_exists_anywhere(&self, prop: &str) -> bool {
        self.node_props
            .values()
            .chain(self.rel_props.values())
            .any(|props| props.iter().any(|p| p.name == prop))
    }

    /// Declared types a property name carries across a set of node labels.
    pub fn node_property_types(&self, labels: &[String], prop: &str) -> BTreeSet<PropertyType> {
        labels
            .iter()
            .filter_map(|label| self.node_property(label, prop))
            .map(|p| p.property_type)
            .collect()
    }

    /// Declared types a property name carries across a set of relationship types.
    pub fn relationship_property_types(
        &self,
        rel_types: &[String],
        prop: &str,
    ) -> BTreeSet<PropertyType> {
        rel_types
            .iter()
            .filter_map(|rel_type| self.relationship_property(rel_type, prop))
            .map(|p| p.property_type)
            .collect()
    }
}
