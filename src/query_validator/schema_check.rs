//! Schema validation pass: every label, relationship type, relationship
//! triple and property mentioned by the query is checked against the
//! declared schema. Violations come out in source order, deduplicated.

use std::collections::HashSet;

use crate::graph_catalog::graph_schema::DbSchema;
use crate::open_cypher_parser::ast::{
    CypherQueryAst, Expression, NodePattern, PathPattern, Property, RelationshipPattern,
};
use crate::query_validator::bindings::{BindingTable, VariableBinding};
use crate::query_validator::errors::SchemaViolation;

/// Collects violations keeping first-occurrence order.
struct ViolationSink {
    violations: Vec<SchemaViolation>,
    seen: HashSet<SchemaViolation>,
}

impl ViolationSink {
    fn new() -> Self {
        ViolationSink {
            violations: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn push(&mut self, violation: SchemaViolation) {
        if self.seen.insert(violation.clone()) {
            self.violations.push(violation);
        }
    }
}

pub fn check_schema(
    ast: &CypherQueryAst<'_>,
    schema: &DbSchema,
    bindings: &BindingTable,
) -> Vec<SchemaViolation> {
    let mut sink = ViolationSink::new();

    check_labels(ast, schema, &mut sink);
    check_relationship_types(ast, schema, &mut sink);
    check_relationship_triples(ast, schema, &mut sink);
    check_properties(ast, schema, bindings, &mut sink);

    sink.violations
}

fn for_each_node<'a, 'q>(
    ast: &'a CypherQueryAst<'q>,
    mut f: impl FnMut(&NodePattern<'q>),
) {
    for match_clause in &ast.match_clauses {
        for path_pattern in &match_clause.path_patterns {
            match path_pattern {
                PathPattern::Node(node) => f(node),
                PathPattern::ConnectedPattern(hops) => {
                    for (i, hop) in hops.iter().enumerate() {
                        // hops share endpoints; only the first hop owns its start
                        if i == 0 {
                            f(&hop.start_node.borrow());
                        }
                        f(&hop.end_node.borrow());
                    }
                }
            }
        }
    }
}

fn for_each_relationship<'a, 'q>(
    ast: &'a CypherQueryAst<'q>,
    mut f: impl FnMut(&RelationshipPattern<'q>),
) {
    for match_clause in &ast.match_clauses {
        for path_pattern in &match_clause.path_patterns {
            if let PathPattern::ConnectedPattern(hops) = path_pattern {
                for hop in hops {
                    f(&hop.relationship);
                }
            }
        }
    }
}

fn check_labels(ast: &CypherQueryAst<'_>, schema: &DbSchema, sink: &mut ViolationSink) {
    for_each_node(ast, |node| {
        for label in node.labels.iter().flatten() {
            if !schema.has_node_label(label) {
                sink.push(SchemaViolation::UnknownNodeLabel {
                    label: label.to_string(),
                });
            }
        }
    });
}

fn check_relationship_types(
    ast: &CypherQueryAst<'_>,
    schema: &DbSchema,
    sink: &mut ViolationSink,
) {
    for_each_relationship(ast, |rel| {
        for rel_type in rel.types.iter().flatten() {
            if !schema.has_relationship_type(rel_type) {
                sink.push(SchemaViolation::UnknownRelationshipType {
                    rel_type: rel_type.to_string(),
                });
            }
        }
    });
}

/// The triple check only fires when the relationship carries at least one
/// schema-known type and both endpoints carry at least one schema-known
/// label; anything unknown was already reported by the earlier passes, and
/// unlabeled endpoints leave nothing to verify. An alternation passes as a
/// whole if any label/type combination is declared in the travelled
/// direction.
fn check_relationship_triples(
    ast: &CypherQueryAst<'_>,
    schema: &DbSchema,
    sink: &mut ViolationSink,
) {
    use crate::open_cypher_parser::ast::Direction;

    for match_clause in &ast.match_clauses {
        for path_pattern in &match_clause.path_patterns {
            let PathPattern::ConnectedPattern(hops) = path_pattern else {
                continue;
            };
            for hop in hops {
                let start = hop.start_node.borrow();
                let end = hop.end_node.borrow();
                let rel = &hop.relationship;

                let known = |labels: &Option<Vec<&str>>| -> Vec<String> {
                    labels
                        .iter()
                        .flatten()
                        .filter(|l| schema.has_node_label(l))
                        .map(|l| l.to_string())
                        .collect()
                };
                let start_labels = known(&start.labels);
                let end_labels = known(&end.labels);
                let rel_types: Vec<String> = rel
                    .types
                    .iter()
                    .flatten()
                    .filter(|t| schema.has_relationship_type(t))
                    .map(|t| t.to_string())
                    .collect();

                if start_labels.is_empty() || end_labels.is_empty() || rel_types.is_empty() {
                    continue;
                }

                let declared = |s: &str, t: &str, e: &str| match rel.direction {
                    Direction::Outgoing => schema.has_relationship_triple(s, t, e),
                    Direction::Incoming => schema.has_relationship_triple(e, t, s),
                    Direction::Either => {
                        schema.has_relationship_triple(s, t, e)
                            || schema.has_relationship_triple(e, t, s)
                    }
                };

                let any_valid = rel_types.iter().any(|t| {
                    start_labels
                        .iter()
                        .any(|s| end_labels.iter().any(|e| declared(s, t, e)))
                });

                if !any_valid {
                    let (from, to) = match rel.direction {
                        Direction::Incoming => (end_labels.join("|"), start_labels.join("|")),
                        _ => (start_labels.join("|"), end_labels.join("|")),
                    };
                    sink.push(SchemaViolation::InvalidRelationship {
                        start: from,
                        rel_type: rel_types.join("|"),
                        end: to,
                    });
                }
            }
        }
    }
}

fn check_properties(
    ast: &CypherQueryAst<'_>,
    schema: &DbSchema,
    bindings: &BindingTable,
    sink: &mut ViolationSink,
) {
    // inline maps first: they sit in the patterns, ahead of any expression
    for_each_node(ast, |node| {
        let labels: Vec<String> = node
            .labels
            .iter()
            .flatten()
            .map(|l| l.to_string())
            .collect();
        for property in node.properties.iter().flatten() {
            if let Property::PropertyKV(kv) = property {
                check_node_property(&labels, kv.key, schema, sink);
            }
        }
    });
    for_each_relationship(ast, |rel| {
        let types: Vec<String> = rel
            .types
            .iter()
            .flatten()
            .map(|t| t.to_string())
            .collect();
        for property in rel.properties.iter().flatten() {
            if let Property::PropertyKV(kv) = property {
                check_relationship_property(&types, kv.key, schema, sink);
            }
        }
    });

    let mut check_expr = |expression: &Expression<'_>| {
        walk_expression(expression, &mut |expr| match expr {
            Expression::PropertyAccessExp(access) => {
                match bindings.get(access.base) {
                    None => sink.push(SchemaViolation::UndefinedVariable {
                        variable: access.base.to_string(),
                    }),
                    Some(VariableBinding::Node { labels }) => {
                        check_node_property(labels, access.key, schema, sink);
                    }
                    Some(VariableBinding::Relationship { types, .. }) => {
                        check_relationship_property(types, access.key, schema, sink);
                    }
                }
            }
            Expression::Variable(name) => {
                if !bindings.contains(name) {
                    sink.push(SchemaViolation::UndefinedVariable {
                        variable: name.to_string(),
                    });
                }
            }
            _ => {}
        });
    };

    for match_clause in &ast.match_clauses {
        if let Some(where_clause) = &match_clause.where_clause {
            check_expr(&where_clause.conditions);
        }
    }
    if let Some(where_clause) = &ast.where_clause {
        check_expr(&where_clause.conditions);
    }
    if let Some(return_clause) = &ast.return_clause {
        for item in &return_clause.return_items {
            check_expr(&item.expression);
        }
    }
    if let Some(order_by) = &ast.order_by_clause {
        for item in &order_by.order_by_items {
            check_expr(&item.expression);
        }
    }
}

/// A property on a labeled element passes if any candidate label declares
/// it. An unlabeled element falls back to a schema-wide lookup.
fn check_node_property(
    labels: &[String],
    property: &str,
    schema: &DbSchema,
    sink: &mut ViolationSink,
) {
    if labels.is_empty() {
        if !schema.property_exists_anywhere(property) {
            sink.push(SchemaViolation::UnknownProperty {
                property: property.to_string(),
            });
        }
        return;
    }
    let known: Vec<&String> = labels
        .iter()
        .filter(|l| schema.has_node_label(l))
        .collect();
    if known.is_empty() {
        // label itself already reported as unknown
        return;
    }
    if !known
        .iter()
        .any(|label| schema.node_property(label, property).is_some())
    {
        sink.push(SchemaViolation::UnknownNodeProperty {
            label: known
                .iter()
                .map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join("|"),
            property: property.to_string(),
        });
    }
}

fn check_relationship_property(
    types: &[String],
    property: &str,
    schema: &DbSchema,
    sink: &mut ViolationSink,
) {
    if types.is_empty() {
        if !schema.property_exists_anywhere(property) {
            sink.push(SchemaViolation::UnknownProperty {
                property: property.to_string(),
            });
        }
        return;
    }
    let known: Vec<&String> = types
        .iter()
        .filter(|t| schema.has_relationship_type(t))
        .collect();
    if known.is_empty() {
        return;
    }
    if !known
        .iter()
        .any(|rel_type| schema.relationship_property(rel_type, property).is_some())
    {
        sink.push(SchemaViolation::UnknownRelationshipProperty {
            rel_type: known
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join("|"),
            property: property.to_string(),
        });
    }
}

/// Depth-first, left-to-right walk over an expression tree.
pub fn walk_expression<'q>(
    expression: &Expression<'q>,
    visit: &mut impl FnMut(&Expression<'q>),
) {
    visit(expression);
    match expression {
        Expression::OperatorApplicationExp(application) => {
            for operand in &application.operands {
                walk_expression(operand, visit);
            }
        }
        Expression::FunctionCallExp(call) => {
            for arg in &call.args {
                walk_expression(arg, visit);
            }
        }
        Expression::List(items) => {
            for item in items {
                walk_expression(item, visit);
            }
        }
        Expression::Literal(_)
        | Expression::Variable(_)
        | Expression::Parameter(_)
        | Expression::PropertyAccessExp(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_catalog::graph_schema::{DbSchema, PropertyDef, PropertyType};
    use crate::open_cypher_parser::parse_query;

    fn sample_schema() -> DbSchema {
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
                vec![PropertyDef::new("name", PropertyType::String)],
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

    fn violations_for(query: &str) -> Vec<SchemaViolation> {
        let schema = sample_schema();
        let ast = parse_query(query).unwrap();
        let bindings = BindingTable::from_query(&ast);
        check_schema(&ast, &schema, &bindings)
    }

    #[test]
    fn test_valid_query_has_no_violations() {
        let violations =
            violations_for("MATCH (p:Person)-[w:WORKS_AT]->(c:Company) WHERE p.age > 30 RETURN p.name, w.salary");
        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn test_unknown_label_is_reported() {
        let violations = violations_for("MATCH (m:Movie) RETURN m");
        assert_eq!(
            violations,
            vec![SchemaViolation::UnknownNodeLabel {
                label: "Movie".to_string()
            }]
        );
    }

    #[test]
    fn test_unknown_relationship_type_is_reported() {
        let violations = violations_for("MATCH (p:Person)-[:DIRECTED]->(c:Company) RETURN p");
        assert_eq!(
            violations,
            vec![SchemaViolation::UnknownRelationshipType {
                rel_type: "DIRECTED".to_string()
            }]
        );
    }

    #[test]
    fn test_wrong_direction_is_reported() {
        let violations = violations_for("MATCH (c:Company)-[:WORKS_AT]->(p:Person) RETURN c");
        assert_eq!(
            violations,
            vec![SchemaViolation::InvalidRelationship {
                start: "Company".to_string(),
                rel_type: "WORKS_AT".to_string(),
                end: "Person".to_string(),
            }]
        );
    }

    #[test]
    fn test_incoming_arrow_honors_direction() {
        let violations = violations_for("MATCH (c:Company)<-[:WORKS_AT]-(p:Person) RETURN c");
        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn test_undirected_matches_either_orientation() {
        let violations = violations_for("MATCH (c:Company)-[:WORKS_AT]-(p:Person) RETURN c");
        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn test_label_alternation_passes_when_any_combination_declared() {
        let violations =
            violations_for("MATCH (p:Person|Company)-[:KNOWS]->(q:Person) RETURN p");
        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn test_unknown_node_property_is_reported() {
        let violations = violations_for("MATCH (p:Person) WHERE p.height > 180 RETURN p");
        assert_eq!(
            violations,
            vec![SchemaViolation::UnknownNodeProperty {
                label: "Person".to_string(),
                property: "height".to_string(),
            }]
        );
    }

    #[test]
    fn test_unknown_relationship_property_is_reported() {
        let violations = violations_for(
            "MATCH (p:Person)-[w:WORKS_AT]->(c:Company) WHERE w.bonus > 0 RETURN p",
        );
        assert_eq!(
            violations,
            vec![SchemaViolation::UnknownRelationshipProperty {
                rel_type: "WORKS_AT".to_string(),
                property: "bonus".to_string(),
            }]
        );
    }

    #[test]
    fn test_inline_property_map_is_checked() {
        let violations = violations_for("MATCH (p:Person {nickname: 'Al'}) RETURN p");
        assert_eq!(
            violations,
            vec![SchemaViolation::UnknownNodeProperty {
                label: "Person".to_string(),
                property: "nickname".to_string(),
            }]
        );
    }

    #[test]
    fn test_unlabeled_node_property_checked_schema_wide() {
        assert!(violations_for("MATCH (n) WHERE n.age > 30 RETURN n").is_empty());
        let violations = violations_for("MATCH (n) WHERE n.height > 180 RETURN n");
        assert_eq!(
            violations,
            vec![SchemaViolation::UnknownProperty {
                property: "height".to_string()
            }]
        );
    }

    #[test]
    fn test_float_literal_does_not_look_like_a_variable() {
        let violations = violations_for("MATCH (p:Person) WHERE p.age > 4.5 RETURN p");
        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn test_undefined_variable_is_reported() {
        let violations = violations_for("MATCH (p:Person) RETURN q.name");
        assert_eq!(
            violations,
            vec![SchemaViolation::UndefinedVariable {
                variable: "q".to_string()
            }]
        );
    }

    #[test]
    fn test_duplicate_violations_collapse() {
        let violations =
            violations_for("MATCH (m:Movie), (n:Movie) WHERE m.x = 1 RETURN m, n");
        let label_count = violations
            .iter()
            .filter(|v| matches!(v, SchemaViolation::UnknownNodeLabel { .. }))
            .count();
        assert_eq!(label_count, 1);
    }

    #[test]
    fn test_unknown_label_suppresses_property_check() {
        // the bogus label is the root cause; piling on a property error
        // for the same access would be noise
        let violations = violations_for("MATCH (m:Movie) WHERE m.title = 'x' RETURN m");
        assert_eq!(
            violations,
            vec![SchemaViolation::UnknownNodeLabel {
                label: "Movie".to_string()
            }]
        );
    }
}
