use std::cell::RefCell;
use std::rc::Rc;

use nom::character::complete::char;
use nom::combinator::peek;
use nom::error::ErrorKind;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{multispace0, space0},
    combinator::{map, opt},
    error::Error,
    multi::separated_list0,
    sequence::{delimited, separated_pair},
    IResult, Parser,
};

use super::ast::{
    ConnectedPattern, Direction, Expression, NodePattern, PathPattern, Property, PropertyKVPair,
    RelationshipPattern,
};
use super::common::{parse_identifier, ws};
use super::expression::{self, parse_parameter};

/// Type alias for node label/property parsing result
type NodeLabelPropertyResult<'a> = (Option<Vec<&'a str>>, Option<Vec<Property<'a>>>);

/// Type alias for relationship internals parsing result
type RelInternalsResult<'a> = (
    Option<&'a str>,
    Option<Vec<&'a str>>,
    Option<Vec<Property<'a>>>,
);

/// Maximum depth for parsing consecutive relationships in a single path
/// pattern. Protects the stack on inputs like (a)-[]->(b)-[]->... repeated
/// hundreds of times; real queries rarely exceed 10 hops.
const MAX_RELATIONSHIP_CHAIN_DEPTH: usize = 50;

pub fn parse_path_pattern(input: &'_ str) -> IResult<&'_ str, PathPattern<'_>> {
    let (input, start_node_pattern) = parse_node_pattern.parse(input)?;

    let (_, is_start_of_relation) = is_start_of_a_relationship.parse(input)?;

    if is_start_of_relation {
        let (input, relationship_end_node_pair) =
            parse_relationship_and_connected_node.parse(input)?;

        match relationship_end_node_pair {
            Some((first_relationship, end_node_pattern)) => {
                let first_connected_pattern = ConnectedPattern {
                    start_node: Rc::new(RefCell::new(start_node_pattern)),
                    relationship: first_relationship,
                    end_node: Rc::new(RefCell::new(end_node_pattern)),
                };

                let mut connected_nodes_pattern = vec![first_connected_pattern];

                let (input, consecutive_relations_end_nodes_vec) =
                    parse_consecutive_relationships_with_depth(input, 1)?;

                for (consecutive_relationship, consecutive_end_node_pattern) in
                    consecutive_relations_end_nodes_vec
                {
                    // connected_nodes_pattern holds at least the first hop here
                    let last_pushed = connected_nodes_pattern
                        .last()
                        .expect("connected_nodes_pattern must not be empty at this point");
                    let connected_pattern = ConnectedPattern {
                        start_node: last_pushed.end_node.clone(),
                        relationship: consecutive_relationship,
                        end_node: Rc::new(RefCell::new(consecutive_end_node_pattern)),
                    };
                    connected_nodes_pattern.push(connected_pattern);
                }

                Ok((
                    input,
                    PathPattern::ConnectedPattern(connected_nodes_pattern),
                ))
            }
            None => Err(nom::Err::Failure(Error::new(input, ErrorKind::Satisfy))),
        }
    } else {
        Ok((input, PathPattern::Node(start_node_pattern)))
    }
}

fn parse_relationship_and_connected_node(
    input: &'_ str,
) -> IResult<&'_ str, Option<(RelationshipPattern<'_>, NodePattern<'_>)>> {
    let (input, relationship_pattern) = parse_relationship_pattern(input)?;

    match relationship_pattern {
        Some(rel_pattern) => {
            let (input, end_node_pattern) = parse_node_pattern.parse(input)?;
            Ok((input, Some((rel_pattern, end_node_pattern))))
        }
        None => Ok((input, None)),
    }
}

// `-` followed by `[`, for bracketed relationships like `-[r:TYPE]->`
fn parse_single_dash(input: &str) -> IResult<&str, bool> {
    map((char('-'), multispace0, char('[')), |_| true).parse(input)
}

// `--` (undirected relationship with no brackets)
fn parse_double_dash(input: &str) -> IResult<&str, bool> {
    map((char('-'), multispace0, char('-')), |_| true).parse(input)
}

// `<-` or `<--`, with spaces allowed in between
fn parse_incoming(input: &str) -> IResult<&str, bool> {
    alt((
        map(
            (char('<'), multispace0, char('-'), multispace0, char('-')),
            |_| true,
        ),
        map((char('<'), multispace0, char('-')), |_| true),
    ))
    .parse(input)
}

// `->` or `-->`, with spaces allowed in between
fn parse_outgoing(input: &str) -> IResult<&str, bool> {
    alt((
        map(
            (char('-'), multispace0, char('-'), multispace0, char('>')),
            |_| true,
        ),
        map((char('-'), multispace0, char('>')), |_| true),
    ))
    .parse(input)
}

// Checks for `<-`, `<--`, `->`, `-->`, `--`, or `-[` without consuming input.
fn is_start_of_a_relationship(input: &str) -> IResult<&str, bool> {
    let (input, _) = multispace0(input)?;

    let (_, found_relationship_start) = opt(peek(alt((
        parse_incoming,
        parse_outgoing,
        parse_double_dash, // must come before parse_single_dash to avoid false match
        parse_single_dash,
    ))))
    .parse(input)?;
    let is_start = found_relationship_start.is_some();
    Ok((input, is_start))
}

fn get_relation_node(
    input: &'_ str,
) -> IResult<&'_ str, Option<(RelationshipPattern<'_>, NodePattern<'_>)>> {
    let (_, is_start_of_relation) = is_start_of_a_relationship(input)?;
    if is_start_of_relation {
        parse_relationship_and_connected_node(input)
    } else {
        Ok((input, None))
    }
}

fn parse_consecutive_relationships_with_depth(
    input: &'_ str,
    depth: usize,
) -> IResult<&'_ str, Vec<(RelationshipPattern<'_>, NodePattern<'_>)>> {
    if depth > MAX_RELATIONSHIP_CHAIN_DEPTH {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }

    let (input, maybe_relation_node) = get_relation_node(input)?;

    if let Some(relation_node) = maybe_relation_node {
        let mut result = vec![relation_node];
        let (input, mut rest) = parse_consecutive_relationships_with_depth(input, depth + 1)?;
        result.append(&mut rest);
        Ok((input, result))
    } else {
        Ok((input, Vec::new()))
    }
}

// {name: 'Oliver Stone', age: 52, active: true}
pub fn parse_properties(input: &'_ str) -> IResult<&'_ str, Vec<Property<'_>>> {
    alt((
        // Property map: curly braces and key-value pairs.
        delimited(
            delimited(space0, char('{'), space0),
            separated_list0(
                delimited(space0, char(','), space0),
                map(
                    separated_pair(
                        delimited(space0, parse_identifier, space0),
                        delimited(space0, char(':'), space0),
                        expression::parse_expression,
                    ),
                    |(key, value_expression)| {
                        Property::PropertyKV(PropertyKVPair {
                            key,
                            value: value_expression,
                        })
                    },
                ),
            ),
            delimited(space0, char('}'), space0),
        ),
        // Parameter variant: `{props: $x}` shorthand `($x)` has no braces.
        map(ws(parse_parameter), |expr| match expr {
            Expression::Parameter(s) => vec![Property::Param(s)],
            _ => unreachable!("parse_parameter returned unexpected expression type"),
        }),
    ))
    .parse(input)
}

fn parse_name_with_properties(
    input: &'_ str,
) -> IResult<&'_ str, (Option<&'_ str>, Option<Vec<Property<'_>>>)> {
    let (remainder, node_name) = ws(opt(parse_identifier)).parse(input)?;
    let (remainder, node_properties) = opt(parse_properties).parse(remainder)?;
    Ok((remainder, (node_name, node_properties)))
}

fn parse_labels_with_properties(input: &'_ str) -> IResult<&'_ str, NodeLabelPropertyResult<'_>> {
    let (remainder, node_labels) = parse_multi_labels_or_types(input)?;
    let (remainder, node_properties) = opt(parse_properties).parse(remainder)?;
    Ok((remainder, (node_labels, node_properties)))
}

/// Parse label/type alternatives separated by `|`, e.g. `User|Person` or
/// `FOLLOWS|LIKES`. Node labels and relationship types share this syntax.
fn parse_multi_labels_or_types(input: &'_ str) -> IResult<&'_ str, Option<Vec<&'_ str>>> {
    let (remainder, first_label) = ws(opt(parse_identifier)).parse(input)?;

    let Some(first_label) = first_label else {
        return Ok((remainder, None));
    };

    let mut labels = vec![first_label];

    let mut current_input = remainder;
    loop {
        let (new_input, pipe) = opt(ws(char('|'))).parse(current_input)?;
        if pipe.is_none() {
            break;
        }

        let (new_input, additional_label) = ws(parse_identifier).parse(new_input)?;
        labels.push(additional_label);
        current_input = new_input;
    }

    Ok((current_input, Some(labels)))
}

type NameWithProperties<'a> = (Option<&'a str>, Option<Vec<Property<'a>>>);
type LabelsWithProperties<'a> = (Option<Vec<&'a str>>, Option<Vec<Property<'a>>>);

// Node internals: optional name, then optional `:Label|...` with properties
// attachable to either part.
fn parse_name_labels(
    input: &'_ str,
) -> IResult<&'_ str, (NameWithProperties<'_>, LabelsWithProperties<'_>)> {
    let (input, _) = multispace0(input)?;

    separated_pair(
        parse_name_with_properties,
        opt(char(':')),
        parse_labels_with_properties,
    )
    .parse(input)
}

fn parse_node_pattern(input: &'_ str) -> IResult<&'_ str, NodePattern<'_>> {
    let (input, _) = multispace0(input)?;

    let empty_node_parser = map(delimited(ws(char('(')), space0, ws(char(')'))), |_| {
        NodePattern {
            name: None,
            labels: None,
            properties: None,
        }
    });

    let node_parser = map(
        delimited(ws(char('(')), parse_name_labels, ws(char(')'))),
        |((node_name, properties_with_node_name), (node_labels, properties_with_node_label))| {
            NodePattern {
                name: node_name,
                labels: node_labels,
                properties: properties_with_node_name.map_or(properties_with_node_label, Some),
            }
        },
    );

    alt((empty_node_parser, node_parser)).parse(input)
}

fn parse_relationship_internals(input: &'_ str) -> IResult<&'_ str, RelInternalsResult<'_>> {
    let (input, _) = ws(char('[')).parse(input)?;
    let (input, _) = multispace0(input)?;

    let (input, rel_name) = ws(opt(parse_identifier)).parse(input)?;

    let (input, _) = opt(ws(char(':'))).parse(input)?;

    let (input, rel_types) = parse_multi_labels_or_types(input)?;

    let (input, rel_properties) = opt(parse_properties).parse(input)?;

    let (input, _) = ws(char(']')).parse(input)?;
    Ok((input, (rel_name, rel_types, rel_properties)))
}

// Parse relationships, e.g.
//  `<-[ name:KIND ]-`, `-[ name:KIND ]->`, `-[ name:KIND ]-`,
//  `<-[name]-`, `-[name]->`, `-[name]-`,
//  `<--`, `-->`, `--`
fn parse_relationship_pattern(input: &'_ str) -> IResult<&'_ str, Option<RelationshipPattern<'_>>> {
    let empty_incoming_relationship_parser =
        map(delimited(ws(tag("<-")), space0, ws(tag("-"))), |_| {
            RelationshipPattern {
                direction: Direction::Incoming,
                name: None,
                types: None,
                properties: None,
            }
        });

    let incoming_relationship_with_props_parser = map(
        delimited(tag("<-"), parse_relationship_internals, tag("-")),
        |(rel_name, rel_types, rel_properties)| RelationshipPattern {
            direction: Direction::Incoming,
            name: rel_name,
            types: rel_types,
            properties: rel_properties,
        },
    );

    let empty_outgoing_relationship_parser =
        map(delimited(ws(tag("-")), space0, ws(tag("->"))), |_| {
            RelationshipPattern {
                direction: Direction::Outgoing,
                name: None,
                types: None,
                properties: None,
            }
        });

    let outgoing_relationship_with_props_parser = map(
        delimited(tag("-"), parse_relationship_internals, tag("->")),
        |(rel_name, rel_types, rel_properties)| RelationshipPattern {
            direction: Direction::Outgoing,
            name: rel_name,
            types: rel_types,
            properties: rel_properties,
        },
    );

    let empty_either_relationship_parser =
        map(delimited(ws(tag("-")), space0, ws(tag("-"))), |_| {
            RelationshipPattern {
                direction: Direction::Either,
                name: None,
                types: None,
                properties: None,
            }
        });

    let either_relationship_with_props_parser = map(
        delimited(tag("-"), parse_relationship_internals, tag("-")),
        |(rel_name, rel_types, rel_properties)| RelationshipPattern {
            direction: Direction::Either,
            name: rel_name,
            types: rel_types,
            properties: rel_properties,
        },
    );

    opt(alt((
        empty_incoming_relationship_parser,
        empty_outgoing_relationship_parser,
        empty_either_relationship_parser,
        incoming_relationship_with_props_parser,
        outgoing_relationship_with_props_parser,
        either_relationship_with_props_parser,
    )))
    .parse(input)
}
