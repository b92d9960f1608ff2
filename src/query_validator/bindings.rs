//! Variable resolution over MATCH patterns.
//!
//! Walks every pattern and records, per variable, whether it names a node
//! or a relationship and which labels/types it could carry. Anonymous
//! pattern elements get synthesized names so the relationship triple check
//! can refer to their endpoints.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::open_cypher_parser::ast::{
    CypherQueryAst, Direction, NodePattern, PathPattern,
};

/// What a variable is bound to. Empty label/type lists mean the pattern
/// gave no constraint (e.g. `(n)` or `-[r]->`).
#[derive(Debug, Clone, PartialEq)]
pub enum VariableBinding {
    Node {
        labels: Vec<String>,
    },
    Relationship {
        types: Vec<String>,
        direction: Direction,
        from: String,
        to: String,
    },
}

impl VariableBinding {
    pub fn is_node(&self) -> bool {
        matches!(self, VariableBinding::Node { .. })
    }
}

/// Variable table for one query. Ordered map keeps diagnostics stable.
#[derive(Debug, Default)]
pub struct BindingTable {
    bindings: BTreeMap<String, VariableBinding>,
    anon_counter: usize,
}

impl BindingTable {
    pub fn from_query(ast: &CypherQueryAst<'_>) -> Self {
        let mut table = BindingTable::default();

        for match_clause in &ast.match_clauses {
            for path_pattern in &match_clause.path_patterns {
                match path_pattern {
                    PathPattern::Node(node) => {
                        table.bind_node_pattern(node);
                    }
                    PathPattern::ConnectedPattern(hops) => {
                        let mut prev_end: Option<(Rc<RefCell<NodePattern>>, String)> = None;

                        for hop in hops {
                            // consecutive hops share their middle node; reuse
                            // its name instead of binding it twice
                            let start_name = match &prev_end {
                                Some((node, name)) if Rc::ptr_eq(node, &hop.start_node) => {
                                    name.clone()
                                }
                                _ => table.bind_node_pattern(&hop.start_node.borrow()),
                            };
                            let end_name = table.bind_node_pattern(&hop.end_node.borrow());

                            let rel = &hop.relationship;
                            let rel_name = match rel.name {
                                Some(name) => name.to_string(),
                                None => table.next_anon_name(),
                            };
                            let types = rel
                                .types
                                .iter()
                                .flatten()
                                .map(|t| t.to_string())
                                .collect();
                            table.bind_relationship(
                                rel_name,
                                types,
                                rel.direction,
                                start_name,
                                end_name.clone(),
                            );

                            prev_end = Some((hop.end_node.clone(), end_name));
                        }
                    }
                }
            }
        }

        table
    }

    pub fn get(&self, variable: &str) -> Option<&VariableBinding> {
        self.bindings.get(variable)
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.bindings.contains_key(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &VariableBinding)> {
        self.bindings.iter()
    }

    fn next_anon_name(&mut self) -> String {
        let name = format!("__anon{}", self.anon_counter);
        self.anon_counter += 1;
        name
    }

    /// Bind a node pattern and return the name it is registered under.
    fn bind_node_pattern(&mut self, node: &NodePattern<'_>) -> String {
        let name = match node.name {
            Some(name) => name.to_string(),
            None => self.next_anon_name(),
        };
        let labels: Vec<String> = node
            .labels
            .iter()
            .flatten()
            .map(|l| l.to_string())
            .collect();
        self.bind_node(name.clone(), labels);
        name
    }

    fn bind_node(&mut self, name: String, new_labels: Vec<String>) {
        match self.bindings.get_mut(&name) {
            Some(VariableBinding::Node { labels }) => {
                // the same variable mentioned twice unions its candidates
                for label in new_labels {
                    if !labels.contains(&label) {
                        labels.push(label);
                    }
                }
            }
            Some(VariableBinding::Relationship { .. }) => {
                // kind conflict: keep the first binding
            }
            None => {
                self.bindings
                    .insert(name, VariableBinding::Node { labels: new_labels });
            }
        }
    }

    fn bind_relationship(
        &mut self,
        name: String,
        new_types: Vec<String>,
        direction: Direction,
        from: String,
        to: String,
    ) {
        match self.bindings.get_mut(&name) {
            Some(VariableBinding::Relationship { types, .. }) => {
                for rel_type in new_types {
                    if !types.contains(&rel_type) {
                        types.push(rel_type);
                    }
                }
            }
            Some(VariableBinding::Node { .. }) => {
                // kind conflict: keep the first binding
            }
            None => {
                self.bindings.insert(
                    name,
                    VariableBinding::Relationship {
                        types: new_types,
                        direction,
                        from,
                        to,
                    },
                );
            }
        }
    }
}
