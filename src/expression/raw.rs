use super::printer::SqlPrinter;
use crate::executor::bind_named_query;
use crate::parser::BindParam;

/// Literal SQL without parameter markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawText(pub String);

impl RawText {
    pub fn write_to(&self, printer: &mut SqlPrinter<'_>) {
        printer.write_str(&self.0);
    }
}

impl std::fmt::Display for RawText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Literal SQL containing `#{name}` markers, pre-split at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTextWithParams {
    pub raw_sql: String,
    pub fragments: Vec<String>,
    pub binds: Vec<BindParam>,
}

impl RawTextWithParams {
    pub fn write_to(&self, printer: &mut SqlPrinter<'_>) {
        let ctx = printer.context();
        let sql = ctx
            .dialect
            .placeholder()
            .concat(&self.fragments, &self.binds, printer.param_index());

        match bind_named_query(&self.binds, ctx.params) {
            Ok(values) => {
                printer.write_str(&sql);
                printer.push_params(values);
            }
            Err(e) => printer.fail(e),
        }
    }
}

impl std::fmt::Display for RawTextWithParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw_sql)
    }
}
