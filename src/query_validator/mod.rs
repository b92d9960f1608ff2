//! # Query Validator
//!
//! The validation pipeline: parse the query, resolve variable bindings
//! from its MATCH patterns, run the schema check, and optionally run the
//! type check. Schema findings come back as rendered strings, type
//! findings as structured [`TypeIssue`]s.

pub mod bindings;
pub mod errors;
pub mod schema_check;
pub mod type_check;

pub use bindings::{BindingTable, VariableBinding};
pub use errors::{SchemaViolation, ValidationError};
pub use type_check::{TypeCheckLevel, TypeIssue, TypeIssueSeverity};

use crate::graph_catalog::graph_schema::DbSchema;
use crate::open_cypher_parser::parse_query;

/// Knobs for a validation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    pub type_checking: TypeCheckLevel,
}

/// Validates `query` against `schema`.
///
/// Returns `Err` only when the query does not parse. Otherwise the result
/// carries the schema errors (empty for a clean query) and the type issues
/// (always empty when type checking is [`TypeCheckLevel::Off`]).
pub fn validate(
    query: &str,
    schema: &DbSchema,
    options: ValidationOptions,
) -> Result<(Vec<String>, Vec<TypeIssue>), ValidationError> {
    let ast = parse_query(query).map_err(|e| {
        // value checks (SKIP/LIMIT) record synthetic message strings as
        // their failure input; only a genuine slice of the query gives a
        // usable offset
        let offset = e
            .failure_input()
            .and_then(|rem| {
                let start = query.as_ptr() as usize;
                let pos = rem.as_ptr() as usize;
                (pos >= start && pos + rem.len() <= start + query.len()).then(|| pos - start)
            })
            .unwrap_or(0);
        ValidationError::Parse {
            offset,
            message: e.to_string(),
        }
    })?;
    log::debug!("parsed query with {} MATCH clause(s)", ast.match_clauses.len());

    let bindings = BindingTable::from_query(&ast);
    let violations = schema_check::check_schema(&ast, schema, &bindings);
    log::debug!("schema check found {} violation(s)", violations.len());
    let errors: Vec<String> = violations.iter().map(|v| v.to_string()).collect();

    let issues = type_check::check_types(&ast, schema, &bindings, options.type_checking);
    log::debug!("type check found {} issue(s)", issues.len());

    Ok((errors, issues))
}
