use super::printer::SqlPrinter;
use super::SqlExpression;
use crate::executor::Condition;
use crate::types::{Context, DynSqlError, Value};

/// `<if test="...">` - renders its content when the test is `true`.
#[derive(Debug, Clone)]
pub struct IfExpression {
    pub(crate) test: Condition,
    pub(crate) content: Box<SqlExpression>,
}

impl IfExpression {
    /// Evaluates the test; only a boolean result is accepted.
    pub fn is_ok(&self, ctx: Context<'_>) -> Result<bool, DynSqlError> {
        let result = self.test.evaluate(ctx.params)?;
        match result.resolved() {
            Value::Boolean(b) => Ok(*b),
            v if v.is_nil() => Err(DynSqlError::NilTestResult(self.to_string())),
            other => Err(DynSqlError::NonBooleanTestResult {
                found: other.type_name().to_string(),
                expression: self.to_string(),
            }),
        }
    }

    pub fn write_to(&self, printer: &mut SqlPrinter<'_>) {
        match self.is_ok(printer.context()) {
            Ok(true) => self.content.write_to(printer),
            Ok(false) => {}
            Err(e) => printer.fail(e),
        }
    }
}

impl std::fmt::Display for IfExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<if test=\"{}\">{}</if>", self.test, self.content)
    }
}

/// `<choose>` - the first `when` whose test holds wins, else `otherwise`.
#[derive(Debug, Clone)]
pub struct ChooseExpression {
    pub(crate) when: Vec<IfExpression>,
    pub(crate) otherwise: Option<Box<SqlExpression>>,
}

impl ChooseExpression {
    pub fn write_to(&self, printer: &mut SqlPrinter<'_>) {
        for branch in &self.when {
            match branch.is_ok(printer.context()) {
                Ok(true) => {
                    branch.content.write_to(printer);
                    return;
                }
                Ok(false) => {}
                Err(e) => {
                    printer.fail(e);
                    return;
                }
            }
        }

        if let Some(otherwise) = &self.otherwise {
            otherwise.write_to(printer);
        }
    }
}

impl std::fmt::Display for ChooseExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<choose>")?;
        for branch in &self.when {
            write!(f, "<when test=\"{}\">{}</when>", branch.test, branch.content)?;
        }
        if let Some(otherwise) = &self.otherwise {
            write!(f, "<otherwise>{otherwise}</otherwise>")?;
        }
        f.write_str("</choose>")
    }
}
