//! Dynamic SQL expression tree
//!
//! A statement template is compiled once into an immutable tree of
//! [`SqlExpression`] nodes. Each render walks the tree with a fresh
//! [`SqlPrinter`], producing SQL text plus the ordered bind values.

mod builder;
mod clause;
mod conditional;
mod foreach;
mod format;
mod print;
mod printer;
mod raw;

pub use builder::{ChooseElement, ExpressionBuilder, ForEachElement, PrintElement, WhenElement};
pub use clause::{SetExpression, WhereExpression};
pub use conditional::{ChooseExpression, IfExpression};
pub use foreach::ForEachExpression;
pub use format::sprintf;
pub use print::PrintExpression;
pub use printer::SqlPrinter;
pub use raw::{RawText, RawTextWithParams};

use crate::types::{Context, Result, Value};

#[derive(Debug, Clone)]
pub enum SqlExpression {
    Raw(RawText),
    RawWithParams(RawTextWithParams),
    If(IfExpression),
    Choose(ChooseExpression),
    ForEach(ForEachExpression),
    Where(WhereExpression),
    Set(SetExpression),
    Print(PrintExpression),
    /// Several children in one slot, e.g. the body of an `<if>`.
    Sequence(ExpressionList),
}

impl SqlExpression {
    pub fn write_to(&self, printer: &mut SqlPrinter<'_>) {
        match self {
            Self::Raw(e) => e.write_to(printer),
            Self::RawWithParams(e) => e.write_to(printer),
            Self::If(e) => e.write_to(printer),
            Self::Choose(e) => e.write_to(printer),
            Self::ForEach(e) => e.write_to(printer),
            Self::Where(e) => e.write_to(printer),
            Self::Set(e) => e.write_to(printer),
            Self::Print(e) => e.write_to(printer),
            Self::Sequence(e) => e.write_to(printer),
        }
    }
}

impl std::fmt::Display for SqlExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw(e) => e.fmt(f),
            Self::RawWithParams(e) => e.fmt(f),
            Self::If(e) => e.fmt(f),
            Self::Choose(e) => e.fmt(f),
            Self::ForEach(e) => e.fmt(f),
            Self::Where(e) => e.fmt(f),
            Self::Set(e) => e.fmt(f),
            Self::Print(e) => e.fmt(f),
            Self::Sequence(e) => e.fmt(f),
        }
    }
}

/// Ordered sibling nodes.
#[derive(Debug, Clone, Default)]
pub struct ExpressionList(pub Vec<SqlExpression>);

impl ExpressionList {
    /// Renders each node in order, stopping at the first failure.
    pub fn write_to(&self, printer: &mut SqlPrinter<'_>) {
        for expr in &self.0 {
            expr.write_to(printer);
            if printer.is_failed() {
                return;
            }
        }
    }

    pub fn generate_sql(&self, ctx: Context<'_>) -> Result<(String, Vec<Value>)> {
        let mut printer = SqlPrinter::new(ctx);
        self.write_to(&mut printer);
        printer.finish()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<SqlExpression>> for ExpressionList {
    fn from(nodes: Vec<SqlExpression>) -> Self {
        Self(nodes)
    }
}

impl std::fmt::Display for ExpressionList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for expr in &self.0 {
            expr.fmt(f)?;
        }
        Ok(())
    }
}

/// Top-level render: SQL text and bind values, or the first error.
pub fn render_sequence(nodes: &[SqlExpression], ctx: Context<'_>) -> Result<(String, Vec<Value>)> {
    let mut printer = SqlPrinter::new(ctx);
    for node in nodes {
        node.write_to(&mut printer);
        if printer.is_failed() {
            break;
        }
    }
    printer.finish()
}
