use nom::character::complete::char;
use nom::combinator::{cut, opt};
use nom::error::context;
use nom::{
    bytes::complete::tag_no_case, character::complete::multispace0, multi::separated_list1,
    sequence::delimited, IResult, Parser,
};

use super::ast::{MatchClause, PathPattern};
use super::errors::CypherParsingError;
use super::path_pattern;
use super::where_clause::parse_where_clause;

pub fn parse_match_clause(
    input: &'_ str,
) -> IResult<&'_ str, MatchClause<'_>, CypherParsingError<'_>> {
    let (input, _) = tag_no_case("MATCH").parse(input)?;
    let (input, _) = multispace0(input)?;

    let (input, path_patterns) = context(
        "Error in match clause",
        separated_list1(
            delimited(multispace0, char(','), multispace0),
            cut(path_parser),
        ),
    )
    .parse(input)?;

    // WHERE can attach to an individual MATCH, per the OpenCypher grammar
    let (input, where_clause) = opt(parse_where_clause).parse(input)?;

    let match_clause = MatchClause {
        path_patterns,
        where_clause,
    };

    Ok((input, match_clause))
}

fn path_parser(input: &str) -> IResult<&str, PathPattern<'_>, CypherParsingError<'_>> {
    path_pattern::parse_path_pattern(input).map_err(|e| match e {
        nom::Err::Incomplete(needed) => nom::Err::Incomplete(needed),
        nom::Err::Error(err) => nom::Err::Failure(CypherParsingError::from(err)),
        nom::Err::Failure(err) => nom::Err::Failure(CypherParsingError::from(err)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_cypher_parser::ast::{Direction, NodePattern};
    use nom::Err;

    #[test]
    fn test_parse_match_clause_single_pattern() {
        let input = "MATCH ()";
        let result = parse_match_clause(input);
        match result {
            Ok((remaining, match_clause)) => {
                assert_eq!(remaining, "");
                assert_eq!(match_clause.path_patterns.len(), 1);
                match &match_clause.path_patterns[0] {
                    PathPattern::Node(node) => {
                        assert_eq!(
                            node,
                            &NodePattern {
                                name: None,
                                labels: None,
                                properties: None,
                            }
                        );
                    }
                    other => panic!("Expected node pattern, got {:?}", other),
                }
            }
            Err(e) => panic!("Expected successful parse, got error: {:?}", e),
        }
    }

    #[test]
    fn test_parse_match_clause_multiple_patterns() {
        let input = "MATCH (a:Person), (b:Company)";
        let (remaining, match_clause) = parse_match_clause(input).unwrap();
        assert_eq!(remaining, "");
        assert_eq!(match_clause.path_patterns.len(), 2);
        assert!(match_clause.where_clause.is_none());
    }

    #[test]
    fn test_parse_match_clause_with_relationship() {
        let input = "MATCH (a:Person)-[r:WORKS_AT]->(c:Company)";
        let (remaining, match_clause) = parse_match_clause(input).unwrap();
        assert_eq!(remaining, "");
        match &match_clause.path_patterns[0] {
            PathPattern::ConnectedPattern(hops) => {
                assert_eq!(hops.len(), 1);
                assert_eq!(hops[0].relationship.direction, Direction::Outgoing);
            }
            other => panic!("Expected connected pattern, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_match_clause_with_attached_where() {
        let input = "MATCH (a:Person) WHERE a.age > 30";
        let (remaining, match_clause) = parse_match_clause(input).unwrap();
        assert_eq!(remaining, "");
        assert!(match_clause.where_clause.is_some());
    }

    #[test]
    fn test_parse_match_clause_lowercase_keyword() {
        let input = "match (a)";
        let result = parse_match_clause(input);
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_match_clause_missing_pattern() {
        let input = "MATCH ";
        let result = parse_match_clause(input);
        match result {
            Err(Err::Failure(_)) | Err(Err::Error(_)) => {}
            Ok((remaining, clause)) => panic!(
                "Expected failure for missing pattern, got remaining: {:?}, clause: {:?}",
                remaining, clause
            ),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }
}
