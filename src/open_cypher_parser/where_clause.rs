use nom::{bytes::complete::tag_no_case, combinator::cut, error::context, IResult, Parser};

use super::{
    ast::WhereClause, common::ws, errors::CypherParsingError, expression::parse_expression,
};

pub fn parse_where_clause(
    input: &'_ str,
) -> IResult<&'_ str, WhereClause<'_>, CypherParsingError<'_>> {
    let (input, _) = ws(tag_no_case("WHERE")).parse(input)?;

    let (input, expression) = context("Error in where clause", cut(parse_expression))
        .parse(input)
        .map_err(|e| match e {
            nom::Err::Incomplete(needed) => nom::Err::Incomplete(needed),
            nom::Err::Error(err) => nom::Err::Failure(CypherParsingError::from(err)),
            nom::Err::Failure(err) => nom::Err::Failure(CypherParsingError::from(err)),
        })?;

    let where_clause = WhereClause {
        conditions: expression,
    };
    Ok((input, where_clause))
}
