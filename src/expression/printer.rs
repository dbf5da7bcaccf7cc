use crate::types::{Context, DynSqlError, ParamSource, Value};

/// Mutable state of one render pass: SQL text, bound values and the first error.
///
/// Once an error is recorded the printer is failed; nodes check `is_failed`
/// after each child and stop writing.
#[derive(Debug)]
pub struct SqlPrinter<'a> {
    ctx: Context<'a>,
    sql: String,
    params: Vec<Value>,
    /// Values bound by enclosing printers before this one was scoped.
    param_base: usize,
    err: Option<DynSqlError>,
}

impl<'a> SqlPrinter<'a> {
    #[must_use]
    pub fn new(ctx: Context<'a>) -> Self {
        Self {
            ctx,
            sql: String::new(),
            params: Vec::new(),
            param_base: 0,
            err: None,
        }
    }

    #[must_use]
    pub const fn context(&self) -> Context<'a> {
        self.ctx
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.err.is_some()
    }

    /// Records `err` unless an earlier error is already set.
    pub fn fail(&mut self, err: DynSqlError) {
        if self.err.is_none() {
            tracing::debug!(error = %err, "sql render failed");
            self.err = Some(err);
        }
    }

    pub fn write_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    /// Length of the SQL text written so far, in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sql.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Text written since byte offset `from`.
    #[must_use]
    pub fn tail(&self, from: usize) -> &str {
        &self.sql[from..]
    }

    pub fn truncate(&mut self, len: usize) {
        self.sql.truncate(len);
    }

    /// Replaces everything after `from` with `text`.
    pub fn replace_tail(&mut self, from: usize, text: &str) {
        self.sql.truncate(from);
        self.sql.push_str(text);
    }

    /// Global position of the next bound value, counting enclosing scopes.
    #[must_use]
    pub fn param_index(&self) -> usize {
        self.param_base + self.params.len()
    }

    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn push_params(&mut self, values: Vec<Value>) {
        self.params.extend(values);
    }

    /// Child printer for one loop iteration. It shares the dialect, resolves
    /// parameters through `params` and writes into its own buffers; merge it
    /// back with [`SqlPrinter::absorb`].
    #[must_use]
    pub fn scoped<'b>(&self, params: &'b dyn ParamSource) -> SqlPrinter<'b> {
        SqlPrinter {
            ctx: Context::new(self.ctx.dialect, params),
            sql: String::new(),
            params: Vec::new(),
            param_base: self.param_index(),
            err: None,
        }
    }

    /// Appends a finished child's text and values and takes over its error.
    pub fn absorb(&mut self, child: SqlPrinter<'_>) {
        tracing::trace!(
            sql = %child.sql,
            params = child.params.len(),
            "merge scoped printer"
        );
        self.sql.push_str(&child.sql);
        self.params.extend(child.params);
        if let Some(err) = child.err {
            self.fail(err);
        }
    }

    /// SQL text and values, or the first error; partial output is dropped on error.
    pub fn finish(self) -> Result<(String, Vec<Value>), DynSqlError> {
        match self.err {
            Some(err) => Err(err),
            None => Ok((self.sql, self.params)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::types::{Params, ScopedParams};

    #[test]
    fn test_first_error_wins() {
        let params = Params::new();
        let mut printer = SqlPrinter::new(Context::new(Dialect::Postgres, &params));
        printer.write_str("SELECT 1");
        printer.fail(DynSqlError::ParamNotFound("a".to_string()));
        printer.fail(DynSqlError::ParamNotFound("b".to_string()));
        assert!(printer.is_failed());
        assert!(matches!(
            printer.finish(),
            Err(DynSqlError::ParamNotFound(name)) if name == "a"
        ));
    }

    #[test]
    fn test_tail_replacement() {
        let params = Params::new();
        let mut printer = SqlPrinter::new(Context::new(Dialect::Postgres, &params));
        printer.write_str("UPDATE t SET a = 1,");
        let mark = "UPDATE t SET ".len();
        assert_eq!(printer.tail(mark), "a = 1,");
        printer.replace_tail(mark, "a = 1");
        printer.truncate(printer.len());
        assert_eq!(printer.sql(), "UPDATE t SET a = 1");
    }

    #[test]
    fn test_scoped_printer_continues_numbering_and_merges() {
        let params = Params::new().with("x", 1);
        let mut printer = SqlPrinter::new(Context::new(Dialect::Postgres, &params));
        printer.write_str("a");
        printer.push_params(vec![Value::Integer(1)]);

        let scope = ScopedParams::new(printer.context().params, ["item", "index"], [
            Value::Integer(7),
            Value::Integer(0),
        ]);
        let mut child = printer.scoped(&scope);
        assert_eq!(child.param_index(), 1);
        assert_eq!(child.context().get("item").unwrap(), Some(Value::Integer(7)));
        child.write_str("b");
        child.push_params(vec![Value::Integer(7)]);
        printer.absorb(child);

        let (sql, values) = printer.finish().unwrap();
        assert_eq!(sql, "ab");
        assert_eq!(values, vec![Value::Integer(1), Value::Integer(7)]);
    }
}
