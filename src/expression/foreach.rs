use super::printer::SqlPrinter;
use super::ExpressionList;
use crate::types::{DynSqlError, ScopedParams, Value};

/// `<foreach>` - renders its contents once per element of a collection.
#[derive(Debug, Clone)]
pub struct ForEachExpression {
    pub(crate) collection: String,
    pub(crate) item: String,
    pub(crate) index: String,
    pub(crate) open: String,
    pub(crate) separator: String,
    pub(crate) close: String,
    pub(crate) contents: ExpressionList,
}

impl ForEachExpression {
    /// Renders the contents with `item`/`index` bound, into a scoped printer.
    fn exec_one(&self, printer: &mut SqlPrinter<'_>, key: Value, value: Value) {
        let scope = ScopedParams::new(
            printer.context().params,
            [self.item.as_str(), self.index.as_str()],
            [value, key],
        );
        let mut child = printer.scoped(&scope);
        self.contents.write_to(&mut child);
        printer.absorb(child);
    }

    pub fn write_to(&self, printer: &mut SqlPrinter<'_>) {
        let collection = match printer.context().get(&self.collection) {
            Ok(Some(value)) => value,
            // a missing collection is nothing to iterate
            Ok(None) => return,
            Err(e) => {
                printer.fail(e);
                return;
            }
        };
        if collection.resolved().is_nil() {
            return;
        }

        let Some(elements) = collection.elements() else {
            printer.fail(DynSqlError::UnsupportedCollection {
                found: collection.resolved().type_name().to_string(),
                expression: self.to_string(),
            });
            return;
        };
        if elements.is_empty() {
            return;
        }

        printer.write_str(&self.open);
        for (idx, (key, value)) in elements.enumerate() {
            if idx > 0 {
                printer.write_str(&self.separator);
            }
            self.exec_one(printer, key, value);
            if printer.is_failed() {
                return;
            }
        }
        printer.write_str(&self.close);
    }
}

impl std::fmt::Display for ForEachExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<foreach collection=\"{}\" index=\"{}\" item=\"{}\" open=\"{}\" separator=\"{}\" close=\"{}\">{}</foreach>",
            self.collection, self.index, self.item, self.open, self.separator, self.close, self.contents
        )
    }
}
