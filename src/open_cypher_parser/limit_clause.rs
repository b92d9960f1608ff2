use nom::{bytes::complete::tag_no_case, combinator::cut, error::context, IResult, Parser};

use super::{
    ast::{Expression, LimitClause, Literal},
    common::ws,
    errors::CypherParsingError,
    expression::parse_expression,
};

pub fn parse_limit_clause(input: &'_ str) -> IResult<&'_ str, LimitClause, CypherParsingError<'_>> {
    let (input, _) = ws(tag_no_case("LIMIT")).parse(input)?;

    let (input, expression) = context("Error in limit clause", cut(parse_expression))
        .parse(input)
        .map_err(|e| match e {
            nom::Err::Incomplete(needed) => nom::Err::Incomplete(needed),
            nom::Err::Error(err) => nom::Err::Failure(CypherParsingError::from(err)),
            nom::Err::Failure(err) => nom::Err::Failure(CypherParsingError::from(err)),
        })?;

    if let Expression::Literal(Literal::Integer(limit_by)) = expression {
        Ok((
            input,
            LimitClause {
                limit_item: limit_by,
            },
        ))
    } else {
        Err(nom::Err::Failure(CypherParsingError {
            errors: vec![(
                "Value of limit clause should be integer",
                "Error in limit clause",
            )],
        }))
    }
}
