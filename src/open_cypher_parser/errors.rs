use nom::error::{ContextError, ParseError};
use std::fmt;

/// Parsing error that accumulates `(remaining input, context)` pairs as it
/// bubbles up through clause parsers.
#[derive(Debug, PartialEq)]
pub struct CypherParsingError<'a> {
    pub errors: Vec<(&'a str, &'static str)>,
}

impl<'a> CypherParsingError<'a> {
    /// The innermost remaining input at the failure point, if any was recorded.
    pub fn failure_input(&self) -> Option<&'a str> {
        self.errors.first().map(|(input, _)| *input)
    }
}

impl<'a> ParseError<&'a str> for CypherParsingError<'a> {
    fn from_error_kind(input: &'a str, _kind: nom::error::ErrorKind) -> Self {
        CypherParsingError {
            errors: vec![(input, "unknown error")],
        }
    }

    fn append(input: &'a str, _kind: nom::error::ErrorKind, mut other: Self) -> Self {
        other.errors.push((input, "unknown error (appended)"));
        other
    }
}

impl<'a> ContextError<&'a str> for CypherParsingError<'a> {
    fn add_context(input: &'a str, ctx: &'static str, mut other: Self) -> Self {
        other.errors.push((input, ctx));
        other
    }
}

impl fmt::Display for CypherParsingError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (input, ctx) in &self.errors {
            writeln!(f, "{}: {}", ctx, input)?;
        }
        Ok(())
    }
}

impl<'a> From<nom::error::Error<&'a str>> for CypherParsingError<'a> {
    fn from(err: nom::error::Error<&'a str>) -> Self {
        CypherParsingError {
            errors: vec![(err.input, "Unable to parse")],
        }
    }
}
