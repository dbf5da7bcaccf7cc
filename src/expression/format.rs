//! printf-style rendering of a single value for `print` nodes.
//!
//! Verbs: `%v %s %d %f %F %x %X %q %t`, `%%` for a literal percent sign.
//! Flags `-` (left align), `0` (zero pad numbers), `+` (always sign),
//! followed by an optional width and `.precision`.

use crate::types::{DynSqlError, Value};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    left: bool,
    zero: bool,
    plus: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Upper bound for width and precision.
const MAX_WIDTH: usize = 4096;

fn digits(fmt: &str, chars: &mut Peekable<Chars<'_>>) -> Result<Option<usize>, DynSqlError> {
    let mut n: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        n = n
            .unwrap_or(0)
            .checked_mul(10)
            .and_then(|v| v.checked_add(d as usize))
            .filter(|v| *v <= MAX_WIDTH)
            .map(Some)
            .ok_or_else(|| format_error(fmt, &format!("width or precision over {MAX_WIDTH}")))?;
        chars.next();
    }
    Ok(n)
}

fn format_error(fmt: &str, message: &str) -> DynSqlError {
    DynSqlError::Format(format!("{message} in '{fmt}'"))
}

/// Substitutes `value` into `fmt`. The format must consume exactly one operand.
pub fn sprintf(fmt: &str, value: &Value) -> Result<String, DynSqlError> {
    let value = value.resolved();
    let mut out = String::new();
    let mut chars = fmt.chars().peekable();
    let mut consumed = false;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.left = true,
                '0' => spec.zero = true,
                '+' => spec.plus = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = digits(fmt, &mut chars)?;
        if chars.peek() == Some(&'.') {
            chars.next();
            spec.precision = Some(digits(fmt, &mut chars)?.unwrap_or(0));
        }

        let verb = chars
            .next()
            .ok_or_else(|| format_error(fmt, "missing verb"))?;
        if consumed {
            return Err(format_error(fmt, "more verbs than operands"));
        }
        consumed = true;

        let text = render_verb(fmt, verb, spec, value)?;
        pad(&mut out, &text, spec, matches!(verb, 'd' | 'f' | 'F' | 'x' | 'X'));
    }

    if !consumed {
        return Err(format_error(fmt, "no verb for the operand"));
    }
    Ok(out)
}

fn render_verb(fmt: &str, verb: char, spec: Spec, value: &Value) -> Result<String, DynSqlError> {
    let signed = |s: String, negative: bool| {
        if spec.plus && !negative { format!("+{s}") } else { s }
    };

    match (verb, value) {
        ('v', _) => Ok(value.to_string()),
        ('s', _) => {
            let s = value.to_string();
            Ok(match spec.precision {
                Some(p) => s.chars().take(p).collect(),
                None => s,
            })
        }
        ('d', Value::Integer(i)) => Ok(signed(i.to_string(), *i < 0)),
        ('f' | 'F', _) => {
            let x = value
                .as_f64()
                .ok_or_else(|| format_error(fmt, &format!("%{verb} applied to {}", value.type_name())))?;
            let precision = spec.precision.unwrap_or(6);
            Ok(signed(format!("{x:.precision$}"), x < 0.0))
        }
        ('x', Value::Integer(i)) => Ok(signed(signed_hex(*i, false), *i < 0)),
        ('X', Value::Integer(i)) => Ok(signed(signed_hex(*i, true), *i < 0)),
        ('x', Value::Text(s)) => Ok(hex::encode(s.as_bytes())),
        ('X', Value::Text(s)) => Ok(hex::encode_upper(s.as_bytes())),
        ('x', Value::Bytea(b)) => Ok(hex::encode(b)),
        ('X', Value::Bytea(b)) => Ok(hex::encode_upper(b)),
        ('q', Value::Text(s)) => Ok(format!("{s:?}")),
        ('q', _) => Ok(format!("{:?}", value.to_string())),
        ('t', Value::Boolean(b)) => Ok(b.to_string()),
        ('d' | 'x' | 'X' | 't', _) => Err(format_error(
            fmt,
            &format!("%{verb} applied to {}", value.type_name()),
        )),
        _ => Err(format_error(fmt, &format!("unknown verb %{verb}"))),
    }
}

// sign and magnitude, not two's complement: -255 is "-ff"
fn signed_hex(i: i64, upper: bool) -> String {
    let sign = if i < 0 { "-" } else { "" };
    let magnitude = i.unsigned_abs();
    if upper {
        format!("{sign}{magnitude:X}")
    } else {
        format!("{sign}{magnitude:x}")
    }
}

fn pad(out: &mut String, text: &str, spec: Spec, numeric: bool) {
    let len = text.chars().count();
    let width = spec.width.unwrap_or(0);
    if len >= width {
        out.push_str(text);
        return;
    }
    let fill = width - len;
    if spec.left {
        out.push_str(text);
        out.extend(std::iter::repeat_n(' ', fill));
    } else if spec.zero && numeric {
        let (sign, digits) = match text.chars().next() {
            Some(c @ ('-' | '+')) => (Some(c), &text[1..]),
            _ => (None, text),
        };
        out.extend(sign);
        out.extend(std::iter::repeat_n('0', fill));
        out.push_str(digits);
    } else {
        out.extend(std::iter::repeat_n(' ', fill));
        out.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_verbs() {
        assert_eq!(sprintf("%v", &Value::Integer(5)).unwrap(), "5");
        assert_eq!(sprintf("t_%s", &Value::from("users")).unwrap(), "t_users");
        assert_eq!(sprintf("%d%%", &Value::Integer(30)).unwrap(), "30%");
        assert_eq!(sprintf("%q", &Value::from("a\"b")).unwrap(), "\"a\\\"b\"");
        assert_eq!(sprintf("%t", &Value::Boolean(true)).unwrap(), "true");
    }

    #[test]
    fn test_width_precision_flags() {
        assert_eq!(sprintf("%05d", &Value::Integer(-42)).unwrap(), "-0042");
        assert_eq!(sprintf("%+d", &Value::Integer(7)).unwrap(), "+7");
        assert_eq!(sprintf("%-4s|", &Value::from("ab")).unwrap(), "ab  |");
        assert_eq!(sprintf("%4s", &Value::from("ab")).unwrap(), "  ab");
        assert_eq!(sprintf("%.2f", &Value::Real(1.23456)).unwrap(), "1.23");
        assert_eq!(sprintf("%.3s", &Value::from("abcdef")).unwrap(), "abc");
        assert_eq!(sprintf("%x", &Value::Integer(255)).unwrap(), "ff");
        assert_eq!(sprintf("%x", &Value::Integer(-255)).unwrap(), "-ff");
        assert_eq!(sprintf("%X", &Value::Integer(i64::MIN)).unwrap(), "-8000000000000000");
        assert_eq!(sprintf("%05x", &Value::Integer(-255)).unwrap(), "-00ff");
        assert_eq!(sprintf("%X", &Value::from("hi")).unwrap(), "6869");
    }

    #[test]
    fn test_nullable_is_looked_through() {
        assert_eq!(sprintf("%d", &Value::from(Some(3))).unwrap(), "3");
    }

    #[test]
    fn test_format_errors() {
        assert!(matches!(
            sprintf("%d", &Value::from("x")),
            Err(DynSqlError::Format(_))
        ));
        assert!(sprintf("%s %s", &Value::from("x")).is_err());
        assert!(sprintf("abc %", &Value::Integer(1)).is_err());
        assert!(sprintf("%y", &Value::Integer(1)).is_err());
        assert!(sprintf("100%%", &Value::Integer(1)).is_err());
        assert!(matches!(
            sprintf("%999999999999999999999d", &Value::Integer(1)),
            Err(DynSqlError::Format(_))
        ));
        assert!(sprintf("%.99999f", &Value::Real(1.0)).is_err());
        assert_eq!(sprintf("%4096d", &Value::Integer(1)).unwrap().len(), 4096);
    }
}
