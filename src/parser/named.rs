use crate::types::DynSqlError;
use nom::{
    bytes::complete::{tag, take_until},
    character::complete::char,
    combinator::{cut, map},
    sequence::{preceded, terminated},
    IResult,
};

/// Reference to a named parameter inside a raw SQL fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindParam {
    pub name: String,
    /// Byte offset of the `#{` marker in the source text.
    pub position: usize,
}

// #{name} with the opening marker already found
fn marker_body(input: &str) -> IResult<&str, &str> {
    preceded(
        tag("#{"),
        cut(terminated(take_until("}"), char('}'))),
    )(input)
}

fn marker(input: &str) -> IResult<&str, String> {
    map(marker_body, |name: &str| name.trim().to_string())(input)
}

/// Splits `sql` at `#{name}` markers.
///
/// Returns `binds.len() + 1` literal fragments; fragment `i` precedes bind `i`.
pub fn compile_named_query(sql: &str) -> Result<(Vec<String>, Vec<BindParam>), DynSqlError> {
    let mut fragments = Vec::new();
    let mut binds = Vec::new();
    let mut rest = sql;

    while let Some(idx) = rest.find("#{") {
        let position = sql.len() - rest.len() + idx;
        fragments.push(rest[..idx].to_string());

        let (remaining, name) = marker(&rest[idx..]).map_err(|_| {
            DynSqlError::NamedQuery(format!(
                "unterminated parameter marker at {position} in '{sql}'"
            ))
        })?;
        if name.is_empty() {
            return Err(DynSqlError::NamedQuery(format!(
                "empty parameter name at {position} in '{sql}'"
            )));
        }
        binds.push(BindParam { name, position });
        rest = remaining;
    }

    fragments.push(rest.to_string());
    Ok((fragments, binds))
}
