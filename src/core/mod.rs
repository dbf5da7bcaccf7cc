// Module declarations
pub mod error;
pub mod value;
pub mod context;

// Re-exports for convenience
pub use error::{DynSqlError, Result};
pub use value::{Elements, Value};
pub use context::{Context, ParamSource, Params, ScopedParams};
