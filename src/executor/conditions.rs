/// Boolean test evaluation for `if` and `when` nodes
///
/// A test is compiled once into a `Condition` and evaluated against the active
/// parameter scope on every render. Free names resolve through the scope; a
/// name that is not found evaluates to `nil`.

use super::functions::FunctionRegistry;
use crate::parser::{parse_condition, BinaryOp, Expr, UnaryOp};
use crate::types::{DynSqlError, ParamSource, Value};
use std::cmp::Ordering;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Condition {
    source: String,
    expr: Expr,
    registry: Arc<FunctionRegistry>,
}

impl Condition {
    /// Parses `test` and checks every called function exists in `registry`.
    pub fn compile(test: &str, registry: Arc<FunctionRegistry>) -> Result<Self, DynSqlError> {
        let expr = parse_condition(test)?;

        let mut unknown = None;
        expr.for_each_call(&mut |name| {
            if unknown.is_none() && !registry.contains(name) {
                unknown = Some(name.to_string());
            }
        });
        if let Some(name) = unknown {
            return Err(DynSqlError::UnknownFunction(name));
        }

        Ok(Self {
            source: test.to_string(),
            expr,
            registry,
        })
    }

    /// Raw evaluation result; may be any value including `nil`.
    pub fn evaluate(&self, params: &dyn ParamSource) -> Result<Value, DynSqlError> {
        ConditionEvaluator {
            params,
            registry: &self.registry,
        }
        .eval(&self.expr)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

struct ConditionEvaluator<'a> {
    params: &'a dyn ParamSource,
    registry: &'a FunctionRegistry,
}

impl ConditionEvaluator<'_> {
    fn eval(&self, expr: &Expr) -> Result<Value, DynSqlError> {
        match expr {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Param(name) => Ok(self.params.get(name)?.unwrap_or(Value::Null)),
            Expr::Call { name, args } => {
                let function = self
                    .registry
                    .get(name)
                    .ok_or_else(|| DynSqlError::UnknownFunction(name.clone()))?;
                let args = args
                    .iter()
                    .map(|a| self.eval(a))
                    .collect::<Result<Vec<_>, _>>()?;
                function(&args)
            }
            Expr::Unary(UnaryOp::Not, inner) => {
                let value = self.eval(inner)?;
                Ok(Value::Boolean(!Self::require_bool("!", &value)?))
            }
            Expr::Unary(UnaryOp::Neg, inner) => match self.eval(inner)?.resolved() {
                Value::Integer(i) => i
                    .checked_neg()
                    .map(Value::Integer)
                    .ok_or_else(|| DynSqlError::Eval("integer overflow".to_string())),
                Value::Real(r) => Ok(Value::Real(-r)),
                Value::Numeric(d) => Ok(Value::Numeric(-*d)),
                other => Err(DynSqlError::Eval(format!(
                    "cannot negate {}",
                    other.type_name()
                ))),
            },
            Expr::Binary(BinaryOp::And, left, right) => {
                let left = self.eval(left)?;
                if !Self::require_bool("&&", &left)? {
                    return Ok(Value::Boolean(false));
                }
                let right = self.eval(right)?;
                Ok(Value::Boolean(Self::require_bool("&&", &right)?))
            }
            Expr::Binary(BinaryOp::Or, left, right) => {
                let left = self.eval(left)?;
                if Self::require_bool("||", &left)? {
                    return Ok(Value::Boolean(true));
                }
                let right = self.eval(right)?;
                Ok(Value::Boolean(Self::require_bool("||", &right)?))
            }
            Expr::Binary(op, left, right) => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                Self::binary(*op, left.resolved(), right.resolved())
            }
            Expr::In(needle, haystack) => {
                let needle = self.eval(needle)?;
                for candidate in haystack {
                    let candidate = self.eval(candidate)?;
                    if values_equal(needle.resolved(), candidate.resolved()) {
                        return Ok(Value::Boolean(true));
                    }
                }
                Ok(Value::Boolean(false))
            }
        }
    }

    fn require_bool(op: &str, value: &Value) -> Result<bool, DynSqlError> {
        value.resolved().as_bool().ok_or_else(|| {
            DynSqlError::Eval(format!(
                "operator '{op}' expects bool, got {}",
                value.resolved().type_name()
            ))
        })
    }

    fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, DynSqlError> {
        match op {
            BinaryOp::Eq => Ok(Value::Boolean(values_equal(left, right))),
            BinaryOp::NotEq => Ok(Value::Boolean(!values_equal(left, right))),
            BinaryOp::Lt => Ok(Value::Boolean(compare(left, right)? == Ordering::Less)),
            BinaryOp::LtEq => Ok(Value::Boolean(compare(left, right)? != Ordering::Greater)),
            BinaryOp::Gt => Ok(Value::Boolean(compare(left, right)? == Ordering::Greater)),
            BinaryOp::GtEq => Ok(Value::Boolean(compare(left, right)? != Ordering::Less)),
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                arithmetic(op, left, right)
            }
            BinaryOp::And | BinaryOp::Or => {
                Err(DynSqlError::Eval(format!("operator {op:?} must short-circuit")))
            }
        }
    }
}

/// Equality with numeric coercion; `nil == nil`.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => (a.is_nil() && b.is_nil()) || a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Result<Ordering, DynSqlError> {
    let ordering = match (a, b) {
        (Value::Text(x), Value::Text(y)) => Some(x.cmp(y)),
        (Value::Date(x), Value::Date(y)) => Some(x.cmp(y)),
        (Value::Timestamp(x), Value::Timestamp(y)) => Some(x.cmp(y)),
        (Value::TimestampTz(x), Value::TimestampTz(y)) => Some(x.cmp(y)),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => None,
        },
    };
    ordering.ok_or_else(|| {
        DynSqlError::Eval(format!(
            "cannot compare {} with {}",
            a.type_name(),
            b.type_name()
        ))
    })
}

fn arithmetic(op: BinaryOp, a: &Value, b: &Value) -> Result<Value, DynSqlError> {
    let overflow = || DynSqlError::Eval("integer overflow".to_string());
    match (op, a, b) {
        (BinaryOp::Add, Value::Text(x), Value::Text(y)) => Ok(Value::Text(format!("{x}{y}"))),
        (BinaryOp::Add, Value::Integer(x), Value::Integer(y)) => {
            x.checked_add(*y).map(Value::Integer).ok_or_else(overflow)
        }
        (BinaryOp::Sub, Value::Integer(x), Value::Integer(y)) => {
            x.checked_sub(*y).map(Value::Integer).ok_or_else(overflow)
        }
        (BinaryOp::Mul, Value::Integer(x), Value::Integer(y)) => {
            x.checked_mul(*y).map(Value::Integer).ok_or_else(overflow)
        }
        (BinaryOp::Mod, Value::Integer(x), Value::Integer(y)) => x
            .checked_rem(*y)
            .map(Value::Integer)
            .ok_or_else(|| DynSqlError::Eval("modulo by zero or overflow".to_string())),
        _ => {
            let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) else {
                return Err(DynSqlError::Eval(format!(
                    "cannot apply {op:?} to {} and {}",
                    a.type_name(),
                    b.type_name()
                )));
            };
            Ok(Value::Real(match op {
                BinaryOp::Add => x + y,
                BinaryOp::Sub => x - y,
                BinaryOp::Mul => x * y,
                BinaryOp::Div => x / y,
                _ => x % y,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Params;

    fn eval(test: &str, params: &Params) -> Result<Value, DynSqlError> {
        Condition::compile(test, FunctionRegistry::shared_builtin())?.evaluate(params)
    }

    #[test]
    fn test_comparisons() {
        let params = Params::new().with("id", 5).with("name", "bob");
        assert_eq!(eval("id > 0", &params).unwrap(), Value::Boolean(true));
        assert_eq!(eval("id <= 4", &params).unwrap(), Value::Boolean(false));
        assert_eq!(eval("id == 5.0", &params).unwrap(), Value::Boolean(true));
        assert_eq!(eval("name == 'bob'", &params).unwrap(), Value::Boolean(true));
        assert_eq!(eval("name < 'carl'", &params).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_missing_param_is_nil() {
        let params = Params::new();
        assert_eq!(eval("missing == nil", &params).unwrap(), Value::Boolean(true));
        assert_eq!(eval("missing", &params).unwrap(), Value::Null);
        assert_eq!(eval("isnull(missing)", &params).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_logical_short_circuit() {
        let params = Params::new().with("flag", false);
        // right side would fail: comparing text with an integer
        assert_eq!(
            eval("flag && 'a' > 1", &params).unwrap(),
            Value::Boolean(false)
        );
        assert_eq!(
            eval("!flag || 'a' > 1", &params).unwrap(),
            Value::Boolean(true)
        );
        assert!(eval("flag || 'a' > 1", &params).is_err());
    }

    #[test]
    fn test_logical_operands_must_be_bool() {
        let params = Params::new().with("n", 1);
        assert!(matches!(
            eval("n && true", &params),
            Err(DynSqlError::Eval(_))
        ));
    }

    #[test]
    fn test_functions_and_nullable() {
        let params = Params::new()
            .with("ids", vec![1, 2])
            .with("nick", None::<String>)
            .with("age", Some(30));
        assert_eq!(eval("len(ids) == 2", &params).unwrap(), Value::Boolean(true));
        assert_eq!(eval("isNotEmpty(ids)", &params).unwrap(), Value::Boolean(true));
        assert_eq!(eval("isnull(nick)", &params).unwrap(), Value::Boolean(true));
        assert_eq!(eval("isnotnull(age) && age > 18", &params).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_arithmetic_and_in() {
        let params = Params::new().with("a", 7).with("s", "x");
        assert_eq!(eval("a % 4 == 3", &params).unwrap(), Value::Boolean(true));
        assert_eq!(eval("a / 2", &params).unwrap(), Value::Real(3.5));
        assert_eq!(eval("-a + 10", &params).unwrap(), Value::Integer(3));
        assert_eq!(eval("s + 'y' == 'xy'", &params).unwrap(), Value::Boolean(true));
        assert_eq!(eval("a in (1, 7)", &params).unwrap(), Value::Boolean(true));
        assert_eq!(eval("s in ('a')", &params).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        let params = Params::new().with("n", i64::MIN).with("m", i64::MAX);
        assert!(matches!(eval("-n > 0", &params), Err(DynSqlError::Eval(_))));
        assert!(matches!(eval("m + 1", &params), Err(DynSqlError::Eval(_))));
        assert!(matches!(eval("n % -1", &params), Err(DynSqlError::Eval(_))));
    }

    #[test]
    fn test_unknown_function_fails_compile() {
        assert!(matches!(
            Condition::compile("upper(x) == 'A'", FunctionRegistry::shared_builtin()),
            Err(DynSqlError::UnknownFunction(name)) if name == "upper"
        ));
        assert!(matches!(
            Condition::compile("len(x) > 0", Arc::new(FunctionRegistry::new())),
            Err(DynSqlError::UnknownFunction(_))
        ));
    }

    #[test]
    fn test_non_bool_results_are_returned() {
        let params = Params::new().with("n", 3);
        assert_eq!(eval("n + 1", &params).unwrap(), Value::Integer(4));
    }
}
