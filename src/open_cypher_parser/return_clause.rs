use nom::{
    bytes::complete::tag_no_case,
    character::complete::{char, multispace0},
    combinator::{cut, opt},
    error::context,
    multi::separated_list1,
    sequence::{delimited, preceded},
    IResult, Parser,
};

use super::{
    ast::{ReturnClause, ReturnItem},
    common::{parse_identifier, ws},
    errors::CypherParsingError,
    expression::parse_expression,
};

fn parse_return_item(input: &'_ str) -> IResult<&'_ str, ReturnItem<'_>> {
    let (input, expression) = parse_expression(input)?;

    let (input, alias) = opt(preceded(ws(tag_no_case("AS")), ws(parse_identifier))).parse(input)?;

    Ok((input, ReturnItem { expression, alias }))
}

pub fn parse_return_clause(
    input: &'_ str,
) -> IResult<&'_ str, ReturnClause<'_>, CypherParsingError<'_>> {
    let (input, _) = ws(tag_no_case("RETURN")).parse(input)?;

    let (input, distinct) = opt(ws(tag_no_case("DISTINCT"))).parse(input)?;
    let distinct = distinct.is_some();

    let (input, return_items) = context(
        "Error in return clause",
        separated_list1(
            delimited(multispace0, char(','), multispace0),
            cut(return_item_parser),
        ),
    )
    .parse(input)?;

    let return_clause = ReturnClause {
        distinct,
        return_items,
    };

    Ok((input, return_clause))
}

fn return_item_parser(input: &str) -> IResult<&str, ReturnItem<'_>, CypherParsingError<'_>> {
    parse_return_item(input).map_err(|e| match e {
        nom::Err::Incomplete(needed) => nom::Err::Incomplete(needed),
        nom::Err::Error(err) => nom::Err::Failure(CypherParsingError::from(err)),
        nom::Err::Failure(err) => nom::Err::Failure(CypherParsingError::from(err)),
    })
}
