//! Grammar of `if`/`when` boolean tests.
//!
//! Supports: `||`/`or`, `&&`/`and`, `!`/`not`, `== != < <= > >=`, `in (...)`,
//! `+ - * / %`, unary minus, parentheses, literals, parameter paths and
//! function calls into the predicate registry.

use super::common::{identifier, keyword, param_path, ws};
use crate::types::{DynSqlError, Value};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Param(String),
    Call { name: String, args: Vec<Expr> },
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    In(Box<Expr>, Vec<Expr>),
}

impl Expr {
    /// Visits every function call name, depth first.
    pub fn for_each_call<F: FnMut(&str)>(&self, f: &mut F) {
        match self {
            Self::Literal(_) | Self::Param(_) => {}
            Self::Call { name, args } => {
                f(name);
                args.iter().for_each(|a| a.for_each_call(f));
            }
            Self::Unary(_, inner) => inner.for_each_call(f),
            Self::Binary(_, left, right) => {
                left.for_each_call(f);
                right.for_each_call(f);
            }
            Self::In(needle, haystack) => {
                needle.for_each_call(f);
                haystack.iter().for_each(|a| a.for_each_call(f));
            }
        }
    }
}

fn fold_binary(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    rest.into_iter().fold(first, |left, (op, right)| {
        Expr::Binary(op, Box::new(left), Box::new(right))
    })
}

fn number(input: &str) -> IResult<&str, Value> {
    map_res(
        recognize(pair(digit1, opt(pair(char('.'), digit1)))),
        |s: &str| -> Result<Value, String> {
            if s.contains('.') {
                Ok(Value::Real(s.parse().map_err(|e| format!("{e:?}"))?))
            } else {
                Ok(Value::Integer(s.parse().map_err(|e| format!("{e:?}"))?))
            }
        },
    )(input)
}

fn string_literal(input: &str) -> IResult<&str, Value> {
    map(
        alt((
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        )),
        |s: &str| Value::Text(s.to_string()),
    )(input)
}

fn literal(input: &str) -> IResult<&str, Expr> {
    map(
        alt((
            number,
            string_literal,
            map(keyword("true"), |_| Value::Boolean(true)),
            map(keyword("false"), |_| Value::Boolean(false)),
            map(alt((keyword("nil"), keyword("null"))), |_| Value::Null),
        )),
        Expr::Literal,
    )(input)
}

fn arguments(input: &str) -> IResult<&str, Vec<Expr>> {
    delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), expression),
        ws(char(')')),
    )(input)
}

fn call(input: &str) -> IResult<&str, Expr> {
    map(pair(identifier, arguments), |(name, args)| Expr::Call { name, args })(input)
}

fn primary(input: &str) -> IResult<&str, Expr> {
    ws(alt((
        delimited(char('('), expression, char(')')),
        literal,
        call,
        map(param_path, Expr::Param),
    )))(input)
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(
            preceded(ws(alt((tag("!"), keyword("not")))), unary),
            |e| Expr::Unary(UnaryOp::Not, Box::new(e)),
        ),
        map(preceded(ws(char('-')), unary), |e| {
            Expr::Unary(UnaryOp::Neg, Box::new(e))
        }),
        primary,
    ))(input)
}

fn multiplicative(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(pair(
        ws(alt((
            map(char('*'), |_| BinaryOp::Mul),
            map(char('/'), |_| BinaryOp::Div),
            map(char('%'), |_| BinaryOp::Mod),
        ))),
        unary,
    ))(input)?;
    Ok((input, fold_binary(first, rest)))
}

fn additive(input: &str) -> IResult<&str, Expr> {
    let (input, first) = multiplicative(input)?;
    let (input, rest) = many0(pair(
        ws(alt((
            map(char('+'), |_| BinaryOp::Add),
            map(char('-'), |_| BinaryOp::Sub),
        ))),
        multiplicative,
    ))(input)?;
    Ok((input, fold_binary(first, rest)))
}

fn comparison_op(input: &str) -> IResult<&str, BinaryOp> {
    ws(alt((
        map(tag("=="), |_| BinaryOp::Eq),
        map(tag("!="), |_| BinaryOp::NotEq),
        map(tag("<="), |_| BinaryOp::LtEq),
        map(tag(">="), |_| BinaryOp::GtEq),
        map(tag("<"), |_| BinaryOp::Lt),
        map(tag(">"), |_| BinaryOp::Gt),
    )))(input)
}

fn comparison(input: &str) -> IResult<&str, Expr> {
    let (input, left) = additive(input)?;
    if let Ok((rest, values)) = preceded(ws(keyword("in")), arguments)(input) {
        return Ok((rest, Expr::In(Box::new(left), values)));
    }
    let (input, right) = opt(tuple((comparison_op, additive)))(input)?;
    match right {
        Some((op, right)) => Ok((input, Expr::Binary(op, Box::new(left), Box::new(right)))),
        None => Ok((input, left)),
    }
}

// AND binds tighter than OR
fn conjunction(input: &str) -> IResult<&str, Expr> {
    let (input, first) = comparison(input)?;
    let (input, rest) = many0(preceded(
        ws(alt((tag("&&"), keyword("and")))),
        comparison,
    ))(input)?;
    let rest = rest.into_iter().map(|e| (BinaryOp::And, e)).collect();
    Ok((input, fold_binary(first, rest)))
}

pub fn expression(input: &str) -> IResult<&str, Expr> {
    let (input, first) = conjunction(input)?;
    let (input, rest) = many0(preceded(
        ws(alt((tag("||"), keyword("or")))),
        conjunction,
    ))(input)?;
    let rest = rest.into_iter().map(|e| (BinaryOp::Or, e)).collect();
    Ok((input, fold_binary(first, rest)))
}

/// Parses a complete boolean test; trailing input is a syntax error.
pub fn parse_condition(test: &str) -> Result<Expr, DynSqlError> {
    match all_consuming(ws(expression))(test) {
        Ok((_, expr)) => Ok(expr),
        Err(e) => Err(DynSqlError::ConditionSyntax {
            test: test.to_string(),
            message: format!("{e:?}"),
        }),
    }
}
