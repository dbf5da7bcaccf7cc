use crate::expression::ExpressionList;
use crate::settings::Settings;
use crate::types::{Context, ParamSource, Result, Value};
use serde::Serialize;

/// A compiled, named statement. Immutable; render it as often as needed.
#[derive(Debug, Clone)]
pub struct StatementTemplate {
    id: String,
    body: ExpressionList,
}

/// Output of one render: SQL for the target dialect plus its bind values in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSql {
    pub id: String,
    pub sql: String,
    pub params: Vec<Value>,
}

impl StatementTemplate {
    pub fn new(id: &str, body: impl Into<ExpressionList>) -> Self {
        Self {
            id: id.to_string(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn render(&self, settings: &Settings, params: &dyn ParamSource) -> Result<RenderedSql> {
        tracing::debug!(id = %self.id, dialect = settings.dialect.name(), "rendering statement");

        let ctx = Context::new(settings.dialect, params);
        let (sql, params) = self.body.generate_sql(ctx)?;

        if settings.show_sql {
            tracing::info!(id = %self.id, sql = %sql, params = ?params, "show sql");
        }
        Ok(RenderedSql {
            id: self.id.clone(),
            sql,
            params,
        })
    }
}

impl std::fmt::Display for StatementTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<statement id=\"{}\">{}</statement>", self.id, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::expression::ExpressionBuilder;
    use crate::types::{DynSqlError, Params};

    fn update_user() -> StatementTemplate {
        let b = ExpressionBuilder::default();
        StatementTemplate::new("updateUser", vec![
            b.raw("UPDATE users").unwrap(),
            b.set_clause(vec![
                b.if_expr("name != nil", vec![b.raw("name = #{name},").unwrap()]).unwrap(),
                b.if_expr("age != nil", vec![b.raw("age = #{age},").unwrap()]).unwrap(),
            ]),
            b.raw(" WHERE id = #{id}").unwrap(),
        ])
    }

    #[test]
    fn test_render_per_dialect() {
        let stmt = update_user();
        let params = Params::new().with("name", "ann").with("id", 3);

        let rendered = stmt.render(&Settings::default(), &params).unwrap();
        assert_eq!(rendered.id, "updateUser");
        assert_eq!(rendered.sql, "UPDATE users SET name = $1 WHERE id = $2");
        assert_eq!(rendered.params, vec![Value::Text("ann".to_string()), Value::Integer(3)]);

        let rendered = stmt.render(&Settings::new(Dialect::Oracle), &params).unwrap();
        assert_eq!(rendered.sql, "UPDATE users SET name = :1 WHERE id = :2");
    }

    #[test]
    fn test_render_error_propagates() {
        let stmt = update_user();
        let params = Params::new().with("name", "ann");
        assert!(matches!(
            stmt.render(&Settings::default(), &params),
            Err(DynSqlError::ParamNotFound(name)) if name == "id"
        ));
    }

    #[test]
    fn test_rendered_sql_serializes() {
        let stmt = update_user();
        let params = Params::new().with("age", 40).with("id", 1);
        let settings = Settings {
            dialect: Dialect::Mysql,
            show_sql: true,
        };
        let rendered = stmt.render(&settings, &params).unwrap();
        let json = serde_json::to_value(&rendered).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "updateUser",
                "sql": "UPDATE users SET age = ? WHERE id = ?",
                "params": [40, 1]
            })
        );
    }
}
