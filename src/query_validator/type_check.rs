//! Type checking pass: comparisons in WHERE between a property access and
//! a literal are checked against the property's declared type. Detection
//! is identical at both active levels; the level only decides whether an
//! issue is reported as a warning or an error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph_catalog::graph_schema::{DbSchema, PropertyType};
use crate::open_cypher_parser::ast::{
    CypherQueryAst, Expression, Literal, OperatorApplication,
};
use crate::query_validator::bindings::{BindingTable, VariableBinding};

/// How strict the type checking pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCheckLevel {
    /// Skip the pass entirely.
    #[default]
    Off,
    /// Report mismatches as warnings.
    Warnings,
    /// Report mismatches as errors.
    Strict,
}

impl fmt::Display for TypeCheckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCheckLevel::Off => write!(f, "off"),
            TypeCheckLevel::Warnings => write!(f, "warnings"),
            TypeCheckLevel::Strict => write!(f, "strict"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeIssueSeverity {
    Warning,
    Error,
}

impl fmt::Display for TypeIssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeIssueSeverity::Warning => write!(f, "warning"),
            TypeIssueSeverity::Error => write!(f, "error"),
        }
    }
}

/// One reported type mismatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeIssue {
    pub severity: TypeIssueSeverity,
    pub message: String,
    /// A concrete rewrite of the offending comparison, when one exists.
    pub suggestion: Option<String>,
}

pub fn check_types(
    ast: &CypherQueryAst<'_>,
    schema: &DbSchema,
    bindings: &BindingTable,
    level: TypeCheckLevel,
) -> Vec<TypeIssue> {
    if level == TypeCheckLevel::Off {
        return Vec::new();
    }
    let severity = match level {
        TypeCheckLevel::Strict => TypeIssueSeverity::Error,
        _ => TypeIssueSeverity::Warning,
    };

    let mut issues = Vec::new();

    let mut check_conditions = |expression: &Expression<'_>| {
        walk_comparisons(expression, &mut |application| {
            if let Some(issue) = check_comparison(application, schema, bindings, severity) {
                issues.push(issue);
            }
        });
    };

    for match_clause in &ast.match_clauses {
        if let Some(where_clause) = &match_clause.where_clause {
            check_conditions(&where_clause.conditions);
        }
    }
    if let Some(where_clause) = &ast.where_clause {
        check_conditions(&where_clause.conditions);
    }

    issues
}

fn walk_comparisons<'q>(
    expression: &Expression<'q>,
    visit: &mut impl FnMut(&OperatorApplication<'q>),
) {
    if let Expression::OperatorApplicationExp(application) = expression {
        if application.operator.is_comparison() {
            visit(application);
        }
        for operand in &application.operands {
            walk_comparisons(operand, visit);
        }
    }
}

/// Checks one comparison. Returns an issue only when one side is a
/// property access with exactly one declared type and the other side has
/// an inferable type that differs from it. Nothing is inferred across
/// variables or parameters, and NULL comparisons are left alone.
fn check_comparison(
    application: &OperatorApplication<'_>,
    schema: &DbSchema,
    bindings: &BindingTable,
    severity: TypeIssueSeverity,
) -> Option<TypeIssue> {
    let [lhs, rhs] = application.operands.as_slice() else {
        return None;
    };
    let (access, value) = match (lhs, rhs) {
        (Expression::PropertyAccessExp(access), value) => (access, value),
        (value, Expression::PropertyAccessExp(access)) => (access, value),
        _ => return None,
    };

    let declared = declared_type(access.base, access.key, schema, bindings)?;
    let actual = value_type(value)?;
    if declared == actual {
        return None;
    }

    let message = format!(
        "Type mismatch: {}.{} is {}, compared with {}",
        access.base, access.key, declared, actual
    );
    let suggestion = suggest_rewrite(access.base, access.key, declared, value);

    Some(TypeIssue {
        severity,
        message,
        suggestion,
    })
}

/// Resolves the declared type of `base.key`, but only when the schema is
/// unambiguous about it: a multi-label binding whose labels disagree on
/// the property's type yields nothing.
fn declared_type(
    base: &str,
    key: &str,
    schema: &DbSchema,
    bindings: &BindingTable,
) -> Option<PropertyType> {
    let candidates = match bindings.get(base)? {
        VariableBinding::Node { labels } => schema.node_property_types(labels, key),
        VariableBinding::Relationship { types, .. } => {
            schema.relationship_property_types(types, key)
        }
    };
    if candidates.len() == 1 {
        candidates.into_iter().next()
    } else {
        None
    }
}

fn value_type(expression: &Expression<'_>) -> Option<PropertyType> {
    match expression {
        Expression::Literal(Literal::Integer(_)) => Some(PropertyType::Integer),
        Expression::Literal(Literal::Float(_)) => Some(PropertyType::Float),
        Expression::Literal(Literal::Boolean(_)) => Some(PropertyType::Boolean),
        Expression::Literal(Literal::String(_)) => Some(PropertyType::String),
        Expression::Literal(Literal::Null) => None,
        Expression::FunctionCallExp(call)
            if call.name.eq_ignore_ascii_case("date")
                || call.name.eq_ignore_ascii_case("datetime") =>
        {
            Some(PropertyType::DateTime)
        }
        _ => None,
    }
}

fn suggest_rewrite(
    base: &str,
    key: &str,
    declared: PropertyType,
    value: &Expression<'_>,
) -> Option<String> {
    match (declared, value) {
        (PropertyType::Boolean, Expression::Literal(Literal::Integer(i))) => {
            let replacement = if *i == 0 { "false" } else { "true" };
            Some(format!(
                "Booleans are written as true/false, e.g. `{}.{} = {}`",
                base, key, replacement
            ))
        }
        (PropertyType::Float, Expression::Literal(Literal::Integer(i))) => Some(format!(
            "Use a float literal, e.g. `{}.{} = {}.0`",
            base, key, i
        )),
        (PropertyType::DateTime, Expression::Literal(Literal::String(s))) => Some(format!(
            "Wrap the value in a temporal constructor, e.g. `{}.{} = date('{}')`",
            base, key, s
        )),
        _ => None,
    }
}
