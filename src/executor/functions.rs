/// Helper predicates callable from boolean tests
///
/// Builtins: len(), isEmpty(), isNotEmpty(), isnull(), isnotnull().
/// All of them are variadic and reject an empty argument list.

use crate::types::{DynSqlError, Value};
use std::collections::HashMap;
use std::sync::Arc;

pub type PredicateFn = fn(&[Value]) -> Result<Value, DynSqlError>;

#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, PredicateFn>,
}

impl FunctionRegistry {
    /// Empty registry; tests compiled against it may only use operators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("len", len);
        registry.register("isEmpty", is_empty);
        registry.register("isNotEmpty", is_not_empty);
        registry.register("isnull", is_null);
        registry.register("isnotnull", is_not_null);
        registry
    }

    #[must_use]
    pub fn shared_builtin() -> Arc<Self> {
        Arc::new(Self::builtin())
    }

    pub fn register(&mut self, name: &str, function: PredicateFn) {
        self.functions.insert(name.to_string(), function);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<PredicateFn> {
        self.functions.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

fn function_error(function: &str, message: impl Into<String>) -> DynSqlError {
    DynSqlError::Function {
        function: function.to_string(),
        message: message.into(),
    }
}

fn first_arg<'a>(function: &str, args: &'a [Value]) -> Result<&'a Value, DynSqlError> {
    args.first()
        .map(Value::resolved)
        .ok_or_else(|| function_error(function, "args is empty"))
}

/// Element count of a sequence, map or string
fn container_len(function: &str, value: &Value) -> Result<usize, DynSqlError> {
    match value {
        Value::List(items) => Ok(items.len()),
        Value::Map(entries) => Ok(entries.len()),
        Value::Text(s) => Ok(s.chars().count()),
        Value::Bytea(b) => Ok(b.len()),
        _ => Err(function_error(
            function,
            "value is not a sequence, array, or map",
        )),
    }
}

fn len(args: &[Value]) -> Result<Value, DynSqlError> {
    let value = first_arg("len", args)?;
    Ok(Value::Integer(container_len("len", value)? as i64))
}

fn is_empty(args: &[Value]) -> Result<Value, DynSqlError> {
    let value = first_arg("isEmpty", args)?;
    Ok(Value::Boolean(container_len("isEmpty", value)? == 0))
}

fn is_not_empty(args: &[Value]) -> Result<Value, DynSqlError> {
    let value = first_arg("isNotEmpty", args)?;
    Ok(Value::Boolean(container_len("isNotEmpty", value)? != 0))
}

/// Checks that every argument is nullable and reports whether all of them are absent
/// (`want_absent`) or all present.
fn all_nullable(function: &str, args: &[Value], want_absent: bool) -> Result<Value, DynSqlError> {
    if args.is_empty() {
        return Err(function_error(function, "args is empty"));
    }

    let mut all = true;
    for (idx, arg) in args.iter().enumerate() {
        let absent = match arg {
            Value::Null | Value::Nullable(None) => true,
            Value::Nullable(Some(_)) => false,
            _ => {
                return Err(function_error(
                    function,
                    format!("args({idx}) is not a nullable value"),
                ));
            }
        };
        if absent != want_absent {
            all = false;
        }
    }
    Ok(Value::Boolean(all))
}

fn is_null(args: &[Value]) -> Result<Value, DynSqlError> {
    all_nullable("isnull", args, true)
}

fn is_not_null(args: &[Value]) -> Result<Value, DynSqlError> {
    all_nullable("isnotnull", args, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> Result<Value, DynSqlError> {
        let registry = FunctionRegistry::builtin();
        let function = registry.get(name).unwrap();
        function(args)
    }

    #[test]
    fn test_len() {
        assert_eq!(call("len", &[Value::List(vec![])]).unwrap(), Value::Integer(0));
        assert_eq!(
            call("len", &[Value::from(vec![1, 2, 3])]).unwrap(),
            Value::Integer(3)
        );
        assert_eq!(call("len", &[Value::from("héllo")]).unwrap(), Value::Integer(5));
        assert_eq!(
            call("len", &[Value::from(Some(vec![1, 2]))]).unwrap(),
            Value::Integer(2)
        );
    }

    #[test]
    fn test_len_rejects_scalars_and_no_args() {
        let err = call("len", &[Value::Integer(4)]).unwrap_err();
        assert!(err.to_string().contains("value is not a sequence, array, or map"));
        assert!(matches!(
            call("len", &[]),
            Err(DynSqlError::Function { .. })
        ));
    }

    #[test]
    fn test_is_empty() {
        assert_eq!(call("isEmpty", &[Value::List(vec![])]).unwrap(), Value::Boolean(true));
        assert_eq!(call("isEmpty", &[Value::from("")]).unwrap(), Value::Boolean(true));
        assert_eq!(
            call("isNotEmpty", &[Value::from(vec![1])]).unwrap(),
            Value::Boolean(true)
        );
        assert!(call("isNotEmpty", &[Value::Null]).is_err());
    }

    #[test]
    fn test_isnull() {
        let absent = Value::from(None::<i64>);
        let present = Value::from(Some(1));
        assert_eq!(
            call("isnull", &[absent.clone(), absent.clone()]).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            call("isnull", &[absent.clone(), present.clone()]).unwrap(),
            Value::Boolean(false)
        );
        assert_eq!(call("isnull", &[Value::Null]).unwrap(), Value::Boolean(true));
        assert_eq!(
            call("isnotnull", &[present.clone(), present.clone()]).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            call("isnotnull", &[present, absent]).unwrap(),
            Value::Boolean(false)
        );
    }

    #[test]
    fn test_isnull_rejects_non_nullable() {
        let err = call("isnull", &[Value::from(None::<i64>), Value::Integer(1)]).unwrap_err();
        assert_eq!(err.to_string(), "isnull() args(1) is not a nullable value");
        assert!(call("isnotnull", &[]).is_err());
    }

    #[test]
    fn test_custom_registration() {
        fn always(_: &[Value]) -> Result<Value, DynSqlError> {
            Ok(Value::Boolean(true))
        }
        let mut registry = FunctionRegistry::new();
        assert!(!registry.contains("always"));
        registry.register("always", always);
        assert!(registry.contains("always"));
    }
}
