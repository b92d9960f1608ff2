use nom::{branch::alt, combinator::opt, IResult, Parser};

use super::{
    ast::{LimitClause, OrderByClause, SkipClause},
    errors::CypherParsingError,
    limit_clause::parse_limit_clause,
    order_by_clause::parse_order_by_clause,
    skip_clause::parse_skip_clause,
};

/// ORDER BY and pagination components of a query tail.
#[derive(Debug, Clone)]
pub struct OrderByAndPageClause<'a> {
    pub order_by: Option<OrderByClause<'a>>,
    pub skip: Option<SkipClause>,
    pub limit: Option<LimitClause>,
}

/// Parse the ordering/pagination tail:
///     <order by clause> [ <skip clause> ] [ <limit clause> ]
///   | <skip clause> [ <limit clause> ]
///   | <limit clause>
///
/// SKIP must come before LIMIT; LIMIT-before-SKIP stops after LIMIT and
/// leaves the rest unparsed, which the caller rejects as trailing input.
pub fn parse_order_by_and_page_clause<'a>(
    input: &'a str,
) -> IResult<&'a str, OrderByAndPageClause<'a>, CypherParsingError<'a>> {
    let order_skip_limit = |input: &'a str| {
        let (input, order_by) = parse_order_by_clause.parse(input)?;
        let (input, skip) = opt(parse_skip_clause).parse(input)?;
        let (input, limit) = opt(parse_limit_clause).parse(input)?;
        Ok((
            input,
            OrderByAndPageClause {
                order_by: Some(order_by),
                skip,
                limit,
            },
        ))
    };

    let skip_limit = |input: &'a str| {
        let (input, skip) = parse_skip_clause.parse(input)?;
        let (input, limit) = opt(parse_limit_clause).parse(input)?;
        Ok((
            input,
            OrderByAndPageClause {
                order_by: None,
                skip: Some(skip),
                limit,
            },
        ))
    };

    let limit_only = |input: &'a str| {
        let (input, limit) = parse_limit_clause.parse(input)?;
        Ok((
            input,
            OrderByAndPageClause {
                order_by: None,
                skip: None,
                limit: Some(limit),
            },
        ))
    };

    alt((order_skip_limit, skip_limit, limit_only)).parse(input)
}
