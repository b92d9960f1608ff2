use nom::{bytes::complete::tag_no_case, combinator::cut, error::context, IResult, Parser};

use super::{
    ast::{Expression, Literal, SkipClause},
    common::ws,
    errors::CypherParsingError,
    expression::parse_expression,
};

pub fn parse_skip_clause(input: &'_ str) -> IResult<&'_ str, SkipClause, CypherParsingError<'_>> {
    let (input, _) = ws(tag_no_case("SKIP")).parse(input)?;

    let (input, expression) = context("Error in skip clause", cut(parse_expression))
        .parse(input)
        .map_err(|e| match e {
            nom::Err::Incomplete(needed) => nom::Err::Incomplete(needed),
            nom::Err::Error(err) => nom::Err::Failure(CypherParsingError::from(err)),
            nom::Err::Failure(err) => nom::Err::Failure(CypherParsingError::from(err)),
        })?;

    if let Expression::Literal(Literal::Integer(skip_by)) = expression {
        Ok((input, SkipClause { skip_item: skip_by }))
    } else {
        Err(nom::Err::Failure(CypherParsingError {
            errors: vec![(
                "Value of skip clause should be integer",
                "Error in skip clause",
            )],
        }))
    }
}
