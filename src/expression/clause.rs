/// `<where>` and `<set>` clause wrappers
///
/// Both emit their keyword only when the body renders something, then repair
/// the connectors that conditional fragments tend to leave behind: a leading or
/// trailing `AND`/`OR` for WHERE, a trailing comma for SET.

use super::printer::SqlPrinter;
use super::ExpressionList;

#[derive(Debug, Clone)]
pub struct WhereExpression {
    pub(crate) expressions: ExpressionList,
}

/// Width of a leading `OR `/`AND ` connector, 0 if none. `s` has at least 4 bytes.
fn leading_connector(s: &[u8]) -> usize {
    if s[0].eq_ignore_ascii_case(&b'o')
        && s[1].eq_ignore_ascii_case(&b'r')
        && s[2].is_ascii_whitespace()
    {
        2
    } else if s[0].eq_ignore_ascii_case(&b'a')
        && s[1].eq_ignore_ascii_case(&b'n')
        && s[2].eq_ignore_ascii_case(&b'd')
        && s[3].is_ascii_whitespace()
    {
        3
    } else {
        0
    }
}

/// Width of a trailing ` OR`/` AND` connector, 0 if none. `s` has at least 4 bytes.
fn trailing_connector(s: &[u8]) -> usize {
    let n = s.len();
    if s[n - 1].eq_ignore_ascii_case(&b'd')
        && s[n - 2].eq_ignore_ascii_case(&b'n')
        && s[n - 3].eq_ignore_ascii_case(&b'a')
        && s[n - 4].is_ascii_whitespace()
    {
        3
    } else if s[n - 1].eq_ignore_ascii_case(&b'r')
        && s[n - 2].eq_ignore_ascii_case(&b'o')
        && s[n - 3].is_ascii_whitespace()
    {
        2
    } else {
        0
    }
}

impl WhereExpression {
    pub fn write_to(&self, printer: &mut SqlPrinter<'_>) {
        let old_len = printer.len();
        printer.write_str(" WHERE ");
        let where_start = printer.len();
        self.expressions.write_to(printer);
        if printer.is_failed() {
            return;
        }

        if printer.len() == where_start {
            printer.truncate(old_len);
            return;
        }

        let body = printer.tail(where_start).trim();
        if body.len() < 4 {
            if body.eq_ignore_ascii_case("or") || body.eq_ignore_ascii_case("and") {
                printer.truncate(old_len);
            }
            return;
        }

        let start = leading_connector(body.as_bytes());
        let end = trailing_connector(body.as_bytes());
        if start == 0 && end == 0 {
            return;
        }

        // only the connector token goes; the whitespace around it stays
        let stripped = body
            .get(start..body.len() - end)
            .unwrap_or_default()
            .to_string();
        tracing::trace!(body, stripped = %stripped, "trim where connectors");
        printer.replace_tail(where_start, &stripped);
    }
}

impl std::fmt::Display for WhereExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<where>{}</where>", self.expressions)
    }
}

#[derive(Debug, Clone)]
pub struct SetExpression {
    pub(crate) expressions: ExpressionList,
}

impl SetExpression {
    pub fn write_to(&self, printer: &mut SqlPrinter<'_>) {
        let old_len = printer.len();
        printer.write_str(" SET ");
        let set_start = printer.len();
        self.expressions.write_to(printer);
        if printer.is_failed() {
            return;
        }

        if printer.len() == set_start {
            printer.truncate(old_len);
            return;
        }

        let body = printer.tail(set_start).trim();
        if let Some(stripped) = body.strip_suffix(',') {
            let stripped = stripped.to_string();
            tracing::trace!(stripped = %stripped, "trim trailing set comma");
            printer.replace_tail(set_start, &stripped);
        }
    }
}

impl std::fmt::Display for SetExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<set>{}</set>", self.expressions)
    }
}
