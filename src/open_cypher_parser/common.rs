use nom::{
    bytes::complete::take_while1,
    character::complete::{alphanumeric1, multispace0},
    combinator::recognize,
    error::ParseError,
    multi::many0,
    sequence::{delimited, pair},
    IResult, Parser,
};

/// Wraps a parser so it tolerates surrounding whitespace.
pub fn ws<'a, O, E: ParseError<&'a str>, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
{
    delimited(multispace0, inner, multispace0)
}

fn underscore1(input: &str) -> IResult<&str, &str> {
    take_while1(|c| c == '_')(input)
}

/// Identifier: one or more alphanumerics with embedded underscores,
/// e.g. "account", "foo_bar", "A1B2". A leading underscore is rejected.
pub fn parse_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(alphanumeric1, many0(pair(underscore1, alphanumeric1)))).parse(input)
}
