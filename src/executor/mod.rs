// Render-time collaborators of the expression tree
pub mod binder;
pub mod conditions;
pub mod functions;

pub use binder::bind_named_query;
pub use conditions::Condition;
pub use functions::{FunctionRegistry, PredicateFn};
