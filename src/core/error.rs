use thiserror::Error;

#[derive(Error, Debug)]
pub enum DynSqlError {
    #[error("if test is empty")]
    EmptyIfTest,
    #[error("if content is empty")]
    EmptyIfContent,
    #[error("contents of foreach is empty")]
    EmptyForEachContents,
    #[error("collection of foreach is empty")]
    EmptyForEachCollection,
    #[error("print value name is empty")]
    EmptyPrintValue,
    #[error("Syntax error in test '{test}': {message}")]
    ConditionSyntax { test: String, message: String },
    #[error("Undefined function '{0}'")]
    UnknownFunction(String),
    #[error("Named parameter error: {0}")]
    NamedQuery(String),
    #[error("Parameter '{0}' not found")]
    ParamNotFound(String),
    #[error("result of if expression is nil - {0}")]
    NilTestResult(String),
    #[error("result of if expression is not bool, got {found} - {expression}")]
    NonBooleanTestResult { found: String, expression: String },
    #[error("collection is not slice, array or map, actual is {found} - {expression}")]
    UnsupportedCollection { found: String, expression: String },
    #[error("search '{name}' fail, {source}")]
    PrintLookup {
        name: String,
        #[source]
        source: Box<DynSqlError>,
    },
    #[error("'{0}' is not found")]
    PrintValueMissing(String),
    #[error("{function}() {message}")]
    Function { function: String, message: String },
    #[error("Evaluation error: {0}")]
    Eval(String),
    #[error("Format error: {0}")]
    Format(String),
    #[error("Unknown dialect '{0}'")]
    UnknownDialect(String),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("JSON Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DynSqlError>;
