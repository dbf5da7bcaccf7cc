// Module declarations
mod common;
pub mod condition;
mod named;

// Re-export the parser entry points
pub use condition::{parse_condition, BinaryOp, Expr, UnaryOp};
pub use named::{compile_named_query, BindParam};
