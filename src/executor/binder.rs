use crate::parser::BindParam;
use crate::types::{DynSqlError, ParamSource, Value};

/// Resolves every bind parameter against `params`, in order.
///
/// Nullable values bind as their inner value or `Null`. Fails on the first
/// parameter that is missing or whose lookup fails; no partial list is returned.
pub fn bind_named_query(
    binds: &[BindParam],
    params: &dyn ParamSource,
) -> Result<Vec<Value>, DynSqlError> {
    binds
        .iter()
        .map(|bind| {
            params
                .get(&bind.name)?
                .map(Value::into_resolved)
                .ok_or_else(|| DynSqlError::ParamNotFound(bind.name.clone()))
        })
        .collect()
}
