use super::clause::{SetExpression, WhereExpression};
use super::conditional::{ChooseExpression, IfExpression};
use super::foreach::ForEachExpression;
use super::print::PrintExpression;
use super::raw::{RawText, RawTextWithParams};
use super::{ExpressionList, SqlExpression};
use crate::executor::{Condition, FunctionRegistry};
use crate::parser::compile_named_query;
use crate::types::{DynSqlError, Result};
use std::sync::Arc;

/// One `<when test="...">` branch of a `<choose>`.
#[derive(Debug, Clone)]
pub struct WhenElement {
    pub test: String,
    pub content: Vec<SqlExpression>,
}

/// Parsed `<choose>`; an empty `otherwise` means there is no default branch.
#[derive(Debug, Clone, Default)]
pub struct ChooseElement {
    pub when: Vec<WhenElement>,
    pub otherwise: Vec<SqlExpression>,
}

/// Parsed `<foreach>`; empty `item`/`index` fall back to `"item"`/`"index"`.
#[derive(Debug, Clone, Default)]
pub struct ForEachElement {
    pub collection: String,
    pub item: String,
    pub index: String,
    pub open: String,
    pub separator: String,
    pub close: String,
    pub contents: Vec<SqlExpression>,
}

/// Parsed `<print>` with the literal text around it.
#[derive(Debug, Clone, Default)]
pub struct PrintElement {
    pub prefix: String,
    pub suffix: String,
    pub fmt: Option<String>,
    pub value: String,
}

/// Validates template elements and builds expression nodes.
///
/// Boolean tests are compiled here, once, against the builder's registry.
#[derive(Debug, Clone)]
pub struct ExpressionBuilder {
    registry: Arc<FunctionRegistry>,
}

impl Default for ExpressionBuilder {
    fn default() -> Self {
        Self::new(FunctionRegistry::shared_builtin())
    }
}

fn single(mut contents: Vec<SqlExpression>) -> Option<SqlExpression> {
    match contents.len() {
        0 => None,
        1 => contents.pop(),
        _ => Some(SqlExpression::Sequence(ExpressionList(contents))),
    }
}

impl ExpressionBuilder {
    #[must_use]
    pub const fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self { registry }
    }

    /// Literal SQL; text with `#{name}` markers becomes a parameterized node.
    pub fn raw(&self, content: &str) -> Result<SqlExpression> {
        let (fragments, binds) = compile_named_query(content)?;
        if binds.is_empty() {
            return Ok(SqlExpression::Raw(RawText(content.to_string())));
        }
        Ok(SqlExpression::RawWithParams(RawTextWithParams {
            raw_sql: content.to_string(),
            fragments,
            binds,
        }))
    }

    fn if_node(&self, test: &str, content: Vec<SqlExpression>) -> Result<IfExpression> {
        if test.trim().is_empty() {
            return Err(DynSqlError::EmptyIfTest);
        }
        let content = single(content).ok_or(DynSqlError::EmptyIfContent)?;
        let test = Condition::compile(test, Arc::clone(&self.registry))?;
        Ok(IfExpression {
            test,
            content: Box::new(content),
        })
    }

    pub fn if_expr(&self, test: &str, content: Vec<SqlExpression>) -> Result<SqlExpression> {
        self.if_node(test, content).map(SqlExpression::If)
    }

    pub fn choose(&self, el: ChooseElement) -> Result<SqlExpression> {
        let when = el
            .when
            .into_iter()
            .map(|branch| self.if_node(&branch.test, branch.content))
            .collect::<Result<Vec<_>>>()?;
        Ok(SqlExpression::Choose(ChooseExpression {
            when,
            otherwise: single(el.otherwise).map(Box::new),
        }))
    }

    pub fn for_each(&self, el: ForEachElement) -> Result<SqlExpression> {
        if el.contents.is_empty() {
            return Err(DynSqlError::EmptyForEachContents);
        }
        if el.collection.is_empty() {
            return Err(DynSqlError::EmptyForEachCollection);
        }

        let or_default = |name: String, default: &str| {
            if name.is_empty() { default.to_string() } else { name }
        };
        Ok(SqlExpression::ForEach(ForEachExpression {
            collection: el.collection,
            item: or_default(el.item, "item"),
            index: or_default(el.index, "index"),
            open: el.open,
            separator: el.separator,
            close: el.close,
            contents: ExpressionList(el.contents),
        }))
    }

    #[must_use]
    pub fn where_clause(&self, contents: Vec<SqlExpression>) -> SqlExpression {
        SqlExpression::Where(WhereExpression {
            expressions: ExpressionList(contents),
        })
    }

    #[must_use]
    pub fn set_clause(&self, contents: Vec<SqlExpression>) -> SqlExpression {
        SqlExpression::Set(SetExpression {
            expressions: ExpressionList(contents),
        })
    }

    pub fn print(&self, el: PrintElement) -> Result<SqlExpression> {
        if el.value.is_empty() {
            return Err(DynSqlError::EmptyPrintValue);
        }
        Ok(SqlExpression::Print(PrintExpression {
            prefix: el.prefix,
            suffix: el.suffix,
            fmt: el.fmt.filter(|f| !f.is_empty()),
            value: el.value,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_without_markers_is_plain_text() {
        let builder = ExpressionBuilder::default();
        assert!(matches!(
            builder.raw("SELECT 1").unwrap(),
            SqlExpression::Raw(_)
        ));
        assert!(matches!(
            builder.raw("id = #{id}").unwrap(),
            SqlExpression::RawWithParams(_)
        ));
        assert!(builder.raw("id = #{id").is_err());
    }

    #[test]
    fn test_if_validation() {
        let builder = ExpressionBuilder::default();
        let body = || vec![builder.raw("x").unwrap()];
        assert!(matches!(
            builder.if_expr("", body()),
            Err(DynSqlError::EmptyIfTest)
        ));
        assert!(matches!(
            builder.if_expr("a > 1", vec![]),
            Err(DynSqlError::EmptyIfContent)
        ));
        assert!(matches!(
            builder.if_expr("a >", body()),
            Err(DynSqlError::ConditionSyntax { .. })
        ));
        assert!(builder.if_expr("a > 1", body()).is_ok());
    }

    #[test]
    fn test_choose_validates_every_branch() {
        let builder = ExpressionBuilder::default();
        let el = ChooseElement {
            when: vec![
                WhenElement { test: "a == 1".to_string(), content: vec![builder.raw("a").unwrap()] },
                WhenElement { test: "nope(".to_string(), content: vec![builder.raw("b").unwrap()] },
            ],
            otherwise: vec![],
        };
        assert!(builder.choose(el).is_err());
    }

    #[test]
    fn test_for_each_validation_and_defaults() {
        let builder = ExpressionBuilder::default();
        assert!(matches!(
            builder.for_each(ForEachElement {
                collection: "ids".to_string(),
                ..Default::default()
            }),
            Err(DynSqlError::EmptyForEachContents)
        ));
        assert!(matches!(
            builder.for_each(ForEachElement {
                contents: vec![builder.raw("x").unwrap()],
                ..Default::default()
            }),
            Err(DynSqlError::EmptyForEachCollection)
        ));

        let node = builder
            .for_each(ForEachElement {
                collection: "ids".to_string(),
                contents: vec![builder.raw("#{item}").unwrap()],
                ..Default::default()
            })
            .unwrap();
        match node {
            SqlExpression::ForEach(fe) => {
                assert_eq!(fe.item, "item");
                assert_eq!(fe.index, "index");
            }
            other => panic!("Expected foreach, got {other:?}"),
        }
    }

    #[test]
    fn test_print_requires_value_name() {
        let builder = ExpressionBuilder::default();
        assert!(matches!(
            builder.print(PrintElement::default()),
            Err(DynSqlError::EmptyPrintValue)
        ));
    }
}
