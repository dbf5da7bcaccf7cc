use super::format::sprintf;
use super::printer::SqlPrinter;
use crate::types::DynSqlError;

/// `<print value="..." fmt="..."/>` - writes a parameter's value straight into the SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintExpression {
    pub(crate) prefix: String,
    pub(crate) suffix: String,
    pub(crate) fmt: Option<String>,
    pub(crate) value: String,
}

impl PrintExpression {
    pub fn write_to(&self, printer: &mut SqlPrinter<'_>) {
        let value = match printer.context().get(&self.value) {
            Ok(Some(value)) if !value.is_nil() => value,
            Ok(_) => {
                printer.fail(DynSqlError::PrintValueMissing(self.value.clone()));
                return;
            }
            Err(e) => {
                printer.fail(DynSqlError::PrintLookup {
                    name: self.value.clone(),
                    source: Box::new(e),
                });
                return;
            }
        };

        let text = match &self.fmt {
            Some(fmt) => match sprintf(fmt, &value) {
                Ok(text) => text,
                Err(e) => {
                    printer.fail(e);
                    return;
                }
            },
            None => value.to_string(),
        };

        printer.write_str(&self.prefix);
        printer.write_str(&text);
        printer.write_str(&self.suffix);
    }
}

impl std::fmt::Display for PrintExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.fmt {
            None => write!(f, "{}<print value=\"{}\" />{}", self.prefix, self.value, self.suffix),
            Some(fmt) => write!(
                f,
                "{}<print fmt=\"{}\" value=\"{}\" />{}",
                self.prefix, fmt, self.value, self.suffix
            ),
        }
    }
}
