use crate::dialect::Dialect;
use crate::types::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Default locations searched when no explicit file is given.
pub const CONFIG_PATHS: [&str; 2] = ["/etc/dynsql/dynsql.toml", "./dynsql.toml"];

/// Render settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub dialect: Dialect,
    /// Log every rendered statement at info level.
    #[serde(default)]
    pub show_sql: bool,
}

impl Settings {
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            show_sql: false,
        }
    }

    /// Loads settings with priority: ENV (`DYNSQL_*`) > config file > defaults.
    ///
    /// An explicit `path` must exist; otherwise the first of [`CONFIG_PATHS`]
    /// that exists is used, if any.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
                tracing::debug!(path = %path.display(), "loading config");
            }
            None => {
                if let Some(found) = CONFIG_PATHS.iter().map(Path::new).find(|p| p.exists()) {
                    builder = builder.add_source(File::from(found));
                    tracing::debug!(path = %found.display(), "loading config");
                }
            }
        }

        builder = builder.add_source(Environment::with_prefix("DYNSQL").try_parsing(true));

        let settings = builder.build()?.try_deserialize::<Self>()?;
        Ok(settings)
    }
}
