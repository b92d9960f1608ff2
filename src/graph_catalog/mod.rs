pub mod graph_schema;

pub use graph_schema::{DbSchema, PropertyDef, PropertyType, SchemaMetadata, SchemaRelationship};
