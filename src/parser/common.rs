use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while},
    character::complete::{alpha1, multispace0, satisfy},
    combinator::{map, not, peek, recognize, verify},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};

pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

pub const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            take_while(|c: char| c.is_alphanumeric() || c == '_'),
        )),
        |s: &str| s.to_string(),
    )(input)
}

/// Case-insensitive keyword that must not run into a following identifier character,
/// so `or` does not match the start of `order`.
pub fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag_no_case(kw), not(peek(satisfy(is_ident_char))))
}

const RESERVED: &[&str] = &["AND", "OR", "NOT", "IN", "TRUE", "FALSE", "NIL", "NULL"];

// Identifier that is not a reserved word of the test grammar
pub fn non_keyword_identifier(input: &str) -> IResult<&str, String> {
    verify(identifier, |s: &String| {
        let upper = s.to_uppercase();
        !RESERVED.contains(&upper.as_str())
    })(input)
}

/// Dotted parameter path such as `user.address.city` or `ids.0`.
pub fn param_path(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            non_keyword_identifier,
            many0(preceded(tag("."), take_while1_ident)),
        )),
        |s: &str| s.to_string(),
    )(input)
}

fn take_while1_ident(input: &str) -> IResult<&str, &str> {
    nom::bytes::complete::take_while1(is_ident_char)(input)
}
