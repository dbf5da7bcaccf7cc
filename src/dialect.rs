use crate::parser::BindParam;
use crate::types::DynSqlError;
use serde::Deserialize;
use std::str::FromStr;

/// Target database. Decides which placeholder syntax rendered SQL uses.
/// Deserializes through [`FromStr`], so config files accept the same aliases as the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Dialect {
    #[default]
    Postgres,
    Mysql,
    Sqlite,
    Mssql,
    Oracle,
}

/// Placeholder convention of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `?`
    Question,
    /// `$1, $2, ...`
    Dollar,
    /// `@p1, @p2, ...`
    AtP,
    /// `:1, :2, ...`
    Colon,
}

impl Dialect {
    #[must_use]
    pub const fn placeholder(self) -> Placeholder {
        match self {
            Self::Postgres => Placeholder::Dollar,
            Self::Mysql | Self::Sqlite => Placeholder::Question,
            Self::Mssql => Placeholder::AtP,
            Self::Oracle => Placeholder::Colon,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
            Self::Mssql => "mssql",
            Self::Oracle => "oracle",
        }
    }
}

impl FromStr for Dialect {
    type Err = DynSqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "mssql" | "sqlserver" => Ok(Self::Mssql),
            "oracle" => Ok(Self::Oracle),
            _ => Err(DynSqlError::UnknownDialect(s.to_string())),
        }
    }
}

impl TryFrom<String> for Dialect {
    type Error = DynSqlError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Placeholder {
    /// Placeholder for the parameter at zero-based global position `index`.
    #[must_use]
    pub fn format(self, index: usize) -> String {
        match self {
            Self::Question => "?".to_string(),
            Self::Dollar => format!("${}", index + 1),
            Self::AtP => format!("@p{}", index + 1),
            Self::Colon => format!(":{}", index + 1),
        }
    }

    /// Interleaves `fragments` with one placeholder per bind parameter.
    /// Numbering starts after the `start` parameters already bound by earlier nodes.
    #[must_use]
    pub fn concat(self, fragments: &[String], binds: &[BindParam], start: usize) -> String {
        let mut sql = String::new();
        for (i, fragment) in fragments.iter().enumerate() {
            sql.push_str(fragment);
            if i < binds.len() {
                sql.push_str(&self.format(start + i));
            }
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::compile_named_query;

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("MySQL".parse::<Dialect>().unwrap(), Dialect::Mysql);
        assert!(matches!(
            "db2".parse::<Dialect>(),
            Err(DynSqlError::UnknownDialect(_))
        ));
    }

    #[test]
    fn test_dialect_deserializes_aliases() {
        let dialect: Dialect = serde_json::from_str("\"SQLServer\"").unwrap();
        assert_eq!(dialect, Dialect::Mssql);
        let dialect: Dialect = serde_json::from_str("\"pg\"").unwrap();
        assert_eq!(dialect, Dialect::Postgres);
        assert!(serde_json::from_str::<Dialect>("\"db2\"").is_err());
    }

    #[test]
    fn test_concat_numbering_continues_from_start() {
        let (fragments, binds) = compile_named_query("a = #{a} AND b = #{b}").unwrap();
        assert_eq!(
            Placeholder::Dollar.concat(&fragments, &binds, 2),
            "a = $3 AND b = $4"
        );
        assert_eq!(
            Placeholder::Question.concat(&fragments, &binds, 2),
            "a = ? AND b = ?"
        );
        assert_eq!(
            Placeholder::AtP.concat(&fragments, &binds, 0),
            "a = @p1 AND b = @p2"
        );
        assert_eq!(Placeholder::Colon.format(0), ":1");
    }
}
