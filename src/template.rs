//! JSON statement templates
//!
//! A structured alternative to mapper XML: each node is an object tagged by
//! `"type"`, e.g.
//!
//! ```json
//! { "id": "findUsers", "body": [
//!     { "type": "text", "content": "SELECT * FROM users" },
//!     { "type": "where", "children": [
//!         { "type": "if", "test": "name != nil",
//!           "children": [{ "type": "text", "content": "AND name = #{name}" }] }
//!     ] }
//! ] }
//! ```

use crate::expression::{
    ChooseElement, ExpressionBuilder, ForEachElement, PrintElement, SqlExpression, WhenElement,
};
use crate::statement::StatementTemplate;
use crate::types::Result;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemplateNode {
    Text {
        content: String,
    },
    If {
        test: String,
        #[serde(default)]
        children: Vec<TemplateNode>,
    },
    Choose {
        #[serde(default)]
        when: Vec<WhenNode>,
        #[serde(default)]
        otherwise: Vec<TemplateNode>,
    },
    Foreach {
        #[serde(default)]
        collection: String,
        #[serde(default)]
        item: String,
        #[serde(default)]
        index: String,
        #[serde(default)]
        open: String,
        #[serde(default)]
        separator: String,
        #[serde(default)]
        close: String,
        #[serde(default)]
        children: Vec<TemplateNode>,
    },
    Where {
        #[serde(default)]
        children: Vec<TemplateNode>,
    },
    Set {
        #[serde(default)]
        children: Vec<TemplateNode>,
    },
    Print {
        #[serde(default)]
        value: String,
        #[serde(default)]
        fmt: Option<String>,
        #[serde(default)]
        prefix: String,
        #[serde(default)]
        suffix: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WhenNode {
    pub test: String,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

/// One named statement as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateDocument {
    pub id: String,
    pub body: Vec<TemplateNode>,
}

impl TemplateDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates every node and compiles the document into a renderable statement.
    pub fn compile(&self, builder: &ExpressionBuilder) -> Result<StatementTemplate> {
        let body = build_nodes(builder, &self.body)?;
        tracing::debug!(id = %self.id, nodes = body.len(), "compiled statement template");
        Ok(StatementTemplate::new(&self.id, body))
    }
}

pub fn build_nodes(builder: &ExpressionBuilder, nodes: &[TemplateNode]) -> Result<Vec<SqlExpression>> {
    nodes.iter().map(|node| node.build(builder)).collect()
}

impl TemplateNode {
    pub fn build(&self, builder: &ExpressionBuilder) -> Result<SqlExpression> {
        match self {
            Self::Text { content } => builder.raw(content),
            Self::If { test, children } => builder.if_expr(test, build_nodes(builder, children)?),
            Self::Choose { when, otherwise } => {
                let when = when
                    .iter()
                    .map(|branch| {
                        Ok(WhenElement {
                            test: branch.test.clone(),
                            content: build_nodes(builder, &branch.children)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                builder.choose(ChooseElement {
                    when,
                    otherwise: build_nodes(builder, otherwise)?,
                })
            }
            Self::Foreach {
                collection,
                item,
                index,
                open,
                separator,
                close,
                children,
            } => builder.for_each(ForEachElement {
                collection: collection.clone(),
                item: item.clone(),
                index: index.clone(),
                open: open.clone(),
                separator: separator.clone(),
                close: close.clone(),
                contents: build_nodes(builder, children)?,
            }),
            Self::Where { children } => Ok(builder.where_clause(build_nodes(builder, children)?)),
            Self::Set { children } => Ok(builder.set_clause(build_nodes(builder, children)?)),
            Self::Print {
                value,
                fmt,
                prefix,
                suffix,
            } => builder.print(PrintElement {
                prefix: prefix.clone(),
                suffix: suffix.clone(),
                fmt: fmt.clone(),
                value: value.clone(),
            }),
        }
    }
}
