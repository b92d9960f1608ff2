use ast::CypherQueryAst;
use common::ws;
use errors::CypherParsingError;
use nom::bytes::complete::tag;
use nom::character::complete::multispace0;
use nom::combinator::opt;
use nom::multi::many0;
use nom::{IResult, Parser};

pub mod ast;
mod common;
pub mod errors;
mod expression;
mod limit_clause;
mod match_clause;
mod order_by_and_page_clause;
mod order_by_clause;
mod path_pattern;
mod return_clause;
mod skip_clause;
mod where_clause;

pub fn parse_query_with_nom(
    input: &'_ str,
) -> IResult<&'_ str, CypherQueryAst<'_>, CypherParsingError<'_>> {
    let (input, _) = multispace0.parse(input)?;

    let (input, match_clauses) = many0(match_clause::parse_match_clause).parse(input)?;

    // query-level WHERE, following the last MATCH
    let (input, where_clause) = opt(where_clause::parse_where_clause).parse(input)?;

    let (input, return_clause) = opt(return_clause::parse_return_clause).parse(input)?;

    let (input, tail) =
        opt(order_by_and_page_clause::parse_order_by_and_page_clause).parse(input)?;

    let (order_by_clause, skip_clause, limit_clause) = match tail {
        Some(tail) => (tail.order_by, tail.skip, tail.limit),
        None => (None, None, None),
    };

    if match_clauses.is_empty() && where_clause.is_none() && return_clause.is_none() {
        return Err(nom::Err::Error(CypherParsingError {
            errors: vec![(input, "Expected at least one clause")],
        }));
    }

    Ok((
        input,
        CypherQueryAst {
            match_clauses,
            where_clause,
            return_clause,
            order_by_clause,
            skip_clause,
            limit_clause,
        },
    ))
}

fn parse_statement(
    input: &'_ str,
) -> IResult<&'_ str, CypherQueryAst<'_>, CypherParsingError<'_>> {
    let (input, query) = parse_query_with_nom.parse(input)?;
    // trailing semicolon is tolerated
    let (input, _) = opt(ws(tag(";"))).parse(input)?;
    Ok((input, query))
}

/// Parse a complete query, requiring that the whole input is consumed.
pub fn parse_query(input: &'_ str) -> Result<CypherQueryAst<'_>, CypherParsingError<'_>> {
    match parse_statement(input) {
        Ok((remainder, query_ast)) => {
            let trimmed = remainder.trim();
            if !trimmed.is_empty() {
                return Err(CypherParsingError {
                    errors: vec![
                        (remainder, "Unexpected tokens after query"),
                        (trimmed, "Unparsed input"),
                    ],
                });
            }
            Ok(query_ast)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e),
        Err(nom::Err::Incomplete(_)) => Err(CypherParsingError {
            errors: vec![("", "Incomplete input")],
        }),
    }
}
