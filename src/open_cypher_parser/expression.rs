use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_until, take_while1},
    character::complete::{alphanumeric1, char, digit1, multispace0},
    combinator::{map, not, opt, peek, recognize},
    error::{Error, ErrorKind},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, terminated},
    IResult, Parser,
};

use crate::open_cypher_parser::common::{parse_identifier, ws};

use super::ast::{
    Expression, FunctionCall, Literal, Operator, OperatorApplication, PropertyAccess,
};

pub fn parse_expression(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    let (input, expression) = parse_logical_or.parse(input)?;
    Ok((input, expression))
}

fn parse_logical_or(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    let (input, lhs) = parse_logical_and(input)?;

    let mut remaining_input = input;
    let mut final_expression = lhs;

    loop {
        let res = preceded(
            // parse only "OR" and not "ORDER"
            ws(terminated(tag_no_case("OR"), not(peek(alphanumeric1)))),
            parse_logical_and,
        )
        .parse(remaining_input);

        match res {
            Ok((new_input, rhs)) => {
                final_expression = Expression::OperatorApplicationExp(OperatorApplication {
                    operator: Operator::Or,
                    operands: vec![final_expression, rhs],
                });
                remaining_input = new_input;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }

    Ok((remaining_input, final_expression))
}

fn parse_logical_and(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    let (input, lhs) = parse_not_expression(input)?;

    let mut remaining_input = input;
    let mut final_expression = lhs;

    loop {
        let res = preceded(ws(tag_no_case("AND")), parse_not_expression).parse(remaining_input);
        match res {
            Ok((new_input, rhs)) => {
                final_expression = Expression::OperatorApplicationExp(OperatorApplication {
                    operator: Operator::And,
                    operands: vec![final_expression, rhs],
                });
                remaining_input = new_input;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }
    Ok((remaining_input, final_expression))
}

// NOT binds looser than comparison, so "NOT a = b" parses as "NOT (a = b)"
// rather than "(NOT a) = b".
fn parse_not_expression(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    alt((
        map(
            preceded(ws(tag_no_case("NOT")), parse_not_expression),
            |expr| {
                Expression::OperatorApplicationExp(OperatorApplication {
                    operator: Operator::Not,
                    operands: vec![expr],
                })
            },
        ),
        parse_comparison_expression,
    ))
    .parse(input)
}

// Comparison and string operators: = <> < > <= >= IN NOT IN STARTS WITH ENDS WITH CONTAINS
fn parse_comparison_expression(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    let (input, lhs) = parse_additive_expression(input)?;

    let mut remaining_input = input;
    let mut final_expression = lhs;

    loop {
        let op_result = ws(alt((
            map(tag_no_case(">="), |_| Operator::GreaterThanEqual),
            map(tag_no_case("<="), |_| Operator::LessThanEqual),
            map(tag_no_case("<>"), |_| Operator::NotEqual),
            map(tag_no_case("!="), |_| Operator::NotEqual),
            map(tag_no_case(">"), |_| Operator::GreaterThan),
            map(tag_no_case("<"), |_| Operator::LessThan),
            map(tag_no_case("="), |_| Operator::Equal),
            map(
                preceded(ws(tag_no_case("STARTS")), ws(tag_no_case("WITH"))),
                |_| Operator::StartsWith,
            ),
            map(
                preceded(ws(tag_no_case("ENDS")), ws(tag_no_case("WITH"))),
                |_| Operator::EndsWith,
            ),
            map(tag_no_case("CONTAINS"), |_| Operator::Contains),
            map(
                preceded(ws(tag_no_case("NOT")), ws(tag_no_case("IN"))),
                |_| Operator::NotIn,
            ),
            map(tag_no_case("IN"), |_| Operator::In),
        )))
        .parse(remaining_input);

        match op_result {
            Ok((new_input, op)) => {
                let (new_input, rhs) = parse_additive_expression(new_input)?;
                final_expression = Expression::OperatorApplicationExp(OperatorApplication {
                    operator: op,
                    operands: vec![final_expression, rhs],
                });
                remaining_input = new_input;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }
    Ok((remaining_input, final_expression))
}

// Additive operators: + -
fn parse_additive_expression(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    let (input, lhs) = parse_multiplicative_expression(input)?;

    let mut remaining_input = input;
    let mut final_expression = lhs;

    loop {
        let op_result = ws(alt((
            map(tag("+"), |_| Operator::Addition),
            map(tag("-"), |_| Operator::Subtraction),
        )))
        .parse(remaining_input);

        match op_result {
            Ok((new_input, op)) => {
                let (new_input, rhs) = parse_multiplicative_expression(new_input)?;
                final_expression = Expression::OperatorApplicationExp(OperatorApplication {
                    operator: op,
                    operands: vec![final_expression, rhs],
                });
                remaining_input = new_input;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }
    Ok((remaining_input, final_expression))
}

// Multiplicative operators: * / %
fn parse_multiplicative_expression(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    let (input, lhs) = parse_unary_expression(input)?;

    let mut remaining_input = input;
    let mut final_expression = lhs;

    loop {
        let op_result = ws(alt((
            map(tag("*"), |_| Operator::Multiplication),
            map(tag("/"), |_| Operator::Division),
            map(tag("%"), |_| Operator::ModuloDivision),
        )))
        .parse(remaining_input);

        match op_result {
            Ok((new_input, op)) => {
                let (new_input, rhs) = parse_unary_expression(new_input)?;
                final_expression = Expression::OperatorApplicationExp(OperatorApplication {
                    operator: op,
                    operands: vec![final_expression, rhs],
                });
                remaining_input = new_input;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }
    Ok((remaining_input, final_expression))
}

fn parse_unary_expression(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    alt((
        // unary minus (negation)
        map(preceded(ws(tag("-")), parse_unary_expression), |expr| {
            Expression::OperatorApplicationExp(OperatorApplication {
                operator: Operator::Subtraction,
                operands: vec![Expression::Literal(Literal::Integer(0)), expr],
            })
        }),
        parse_postfix_expression,
    ))
    .parse(input)
}

// A primary expression followed by an optional "IS NULL" / "IS NOT NULL".
fn parse_postfix_expression(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    let (input, expr) = parse_primary(input)?;

    let (input, opt_op) = opt(preceded(
        ws(tag_no_case("IS")),
        alt((
            map(
                preceded(ws(tag_no_case("NOT")), ws(tag_no_case("NULL"))),
                |_| Operator::IsNotNull,
            ),
            map(ws(tag_no_case("NULL")), |_| Operator::IsNull),
        )),
    ))
    .parse(input)?;

    if let Some(op) = opt_op {
        Ok((
            input,
            Expression::OperatorApplicationExp(OperatorApplication {
                operator: op,
                operands: vec![expr],
            }),
        ))
    } else {
        Ok((input, expr))
    }
}

fn parse_primary(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    alt((
        parse_function_call, // before variables so "date(" is not read as a variable
        parse_property_access,
        parse_list_literal,
        parse_parameter,
        parse_literal_or_variable_expression,
        delimited(ws(char('(')), parse_expression, ws(char(')'))),
    ))
    .parse(input)
}

pub fn parse_function_call(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    let (input, name) = ws(parse_identifier).parse(input)?;

    let (input, args) = delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), parse_expression),
        ws(char(')')),
    )
    .parse(input)?;

    Ok((input, Expression::FunctionCallExp(FunctionCall { name, args })))
}

pub fn parse_list_literal(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    let (input, exprs) = delimited(
        delimited(multispace0, char('['), multispace0),
        separated_list0(
            delimited(multispace0, char(','), multispace0),
            parse_expression,
        ),
        delimited(multispace0, char(']'), multispace0),
    )
    .parse(input)?;

    Ok((input, Expression::List(exprs)))
}

pub fn parse_property_access(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    let (input, base) = ws(parse_identifier).parse(input)?;

    // the base must be a variable; a digit-only base is the integer part
    // of a float literal like "4.5", not a property access
    let (_, base_expression) = parse_literal_or_variable_expression(base)?;
    if !matches!(base_expression, Expression::Variable(_)) {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Verify)));
    }

    let (input, _) = char('.')(input)?;
    let (input, key) = parse_identifier(input)?;

    Ok((
        input,
        Expression::PropertyAccessExp(PropertyAccess { base, key }),
    ))
}

fn is_param_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn parse_parameter(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    let (input, param) = preceded(tag("$"), take_while1(is_param_char)).parse(input)?;
    Ok((input, Expression::Parameter(param)))
}

/// Binary operator keywords that require a left operand and therefore can
/// never stand alone as a variable. Catches inputs like "WHERE AND ...".
fn is_binary_operator_keyword(s: &str) -> bool {
    let upper = s.to_uppercase();
    matches!(upper.as_str(), "AND" | "OR" | "XOR")
}

fn parse_numeric_token(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        opt(char('-')),
        alt((
            // float with both parts: 3.14
            recognize((digit1, char('.'), digit1)),
            // float without integer part: .5
            recognize(pair(char('.'), digit1)),
            digit1,
        )),
    ))
    .parse(input)
}

pub fn parse_literal_or_variable_expression(input: &'_ str) -> IResult<&'_ str, Expression<'_>> {
    alt((
        map(ws(parse_string_literal), Expression::Literal),
        map(ws(parse_double_quoted_string_literal), Expression::Literal),
        |input| {
            let (remaining, s) = ws(alt((parse_numeric_token, parse_identifier))).parse(input)?;

            if s.eq_ignore_ascii_case("null") {
                Ok((remaining, Expression::Literal(Literal::Null)))
            } else if s.eq_ignore_ascii_case("true") {
                Ok((remaining, Expression::Literal(Literal::Boolean(true))))
            } else if s.eq_ignore_ascii_case("false") {
                Ok((remaining, Expression::Literal(Literal::Boolean(false))))
            } else if let Ok(i) = s.parse::<i64>() {
                Ok((remaining, Expression::Literal(Literal::Integer(i))))
            } else if let Ok(f) = s.parse::<f64>() {
                Ok((remaining, Expression::Literal(Literal::Float(f))))
            } else if is_binary_operator_keyword(s) {
                Err(nom::Err::Error(Error::new(input, ErrorKind::Tag)))
            } else {
                // quoted strings are covered above, anything else is a variable
                Ok((remaining, Expression::Variable(s)))
            }
        },
    ))
    .parse(input)
}

pub fn parse_string_literal(input: &'_ str) -> IResult<&'_ str, Literal<'_>> {
    let (input, s) = delimited(char('\''), take_until("'"), char('\'')).parse(input)?;

    Ok((input, Literal::String(s)))
}

pub fn parse_double_quoted_string_literal(input: &'_ str) -> IResult<&'_ str, Literal<'_>> {
    let (input, s) = delimited(char('"'), take_until("\""), char('"')).parse(input)?;

    Ok((input, Literal::String(s)))
}
