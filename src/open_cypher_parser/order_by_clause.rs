use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, multispace0},
    combinator::{cut, map, opt},
    error::context,
    multi::separated_list1,
    sequence::delimited,
    IResult, Parser,
};

use super::{
    ast::{OrderByClause, OrderByItem, SortOrder},
    common::ws,
    errors::CypherParsingError,
    expression::parse_expression,
};

pub fn parse_order_by_item(input: &'_ str) -> IResult<&'_ str, OrderByItem<'_>> {
    let (input, expression) = parse_expression(input)?;

    let (input, order_opt) = opt(ws(alt((
        map(tag_no_case("ASC"), |_| SortOrder::Asc),
        map(tag_no_case("DESC"), |_| SortOrder::Desc),
    ))))
    .parse(input)?;

    // ascending when no order keyword is given
    let order = order_opt.unwrap_or(SortOrder::Asc);
    Ok((input, OrderByItem { expression, order }))
}

pub fn parse_order_by_clause(
    input: &'_ str,
) -> IResult<&'_ str, OrderByClause<'_>, CypherParsingError<'_>> {
    let (input, _) = ws(tag_no_case("ORDER BY")).parse(input)?;

    let (input, order_by_items) = context(
        "Error in order by clause",
        separated_list1(
            delimited(multispace0, char(','), multispace0),
            cut(order_by_item_parser),
        ),
    )
    .parse(input)?;

    let order_by_clause = OrderByClause { order_by_items };

    Ok((input, order_by_clause))
}

fn order_by_item_parser(input: &str) -> IResult<&str, OrderByItem<'_>, CypherParsingError<'_>> {
    parse_order_by_item(input).map_err(|e| match e {
        nom::Err::Incomplete(needed) => nom::Err::Incomplete(needed),
        nom::Err::Error(err) => nom::Err::Failure(CypherParsingError::from(err)),
        nom::Err::Failure(err) => nom::Err::Failure(CypherParsingError::from(err)),
    })
}
