// dynsql - dynamic SQL generation for mapper-style statement templates
// Templates compile once into an immutable expression tree; each render yields SQL + bind values

// Clippy configuration - allow non-critical warnings
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]

// Core structures (values, parameter sources, errors)
pub mod core;

// Backward compatibility - re-export all core types as types module
pub mod types {
    pub use crate::core::*;
}

// Parsers for boolean tests and named-parameter markers
pub mod parser;

// Test evaluation, predicate registry, bind resolution
pub mod executor;

// Placeholder syntax per target database
pub mod dialect;

// Expression tree nodes and the render accumulator
pub mod expression;

// Settings (file + environment)
pub mod settings;

// Named statements and JSON templates
pub mod statement;
pub mod template;

// Re-export commonly used types for convenience
pub use crate::core::{Context, DynSqlError, ParamSource, Params, Value};
pub use dialect::{Dialect, Placeholder};
pub use executor::{Condition, FunctionRegistry};
pub use expression::{ExpressionBuilder, ExpressionList, SqlExpression, SqlPrinter, render_sequence};
pub use settings::Settings;
pub use statement::{RenderedSql, StatementTemplate};
pub use template::{TemplateDocument, TemplateNode};
