use super::error::Result;
use super::value::Value;
use crate::dialect::Dialect;
use std::collections::BTreeMap;

/// Resolves named parameters for one statement execution.
///
/// `Ok(None)` is the "not found" signal and is distinct from a lookup failure:
/// `foreach` and boolean tests treat it as nothing/`nil`, `print` and bind
/// parameters treat it as an error.
pub trait ParamSource {
    fn get(&self, name: &str) -> Result<Option<Value>>;
}

/// Owned name -> value parameters. Dotted names walk into maps and lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: BTreeMap<String, Value>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Builds parameters from a JSON object; any other JSON value is an error.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        match Value::from(json) {
            Value::Map(values) => Ok(Self { values }),
            other => Err(super::error::DynSqlError::Eval(format!(
                "parameters must be a JSON object, got {}",
                other.type_name()
            ))),
        }
    }
}

impl ParamSource for Params {
    fn get(&self, name: &str) -> Result<Option<Value>> {
        let mut segments = name.split('.');
        let head = segments.next().unwrap_or_default();
        Ok(self
            .values
            .get(head)
            .and_then(|v| v.lookup_path(segments))
            .cloned())
    }
}

impl ParamSource for BTreeMap<String, Value> {
    fn get(&self, name: &str) -> Result<Option<Value>> {
        let mut segments = name.split('.');
        let head = segments.next().unwrap_or_default();
        Ok(self.get(head).and_then(|v| v.lookup_path(segments)).cloned())
    }
}

/// Loop scope: binds the item and index variables over an enclosing source.
pub struct ScopedParams<'a> {
    parent: &'a dyn ParamSource,
    names: [&'a str; 2],
    values: [Value; 2],
}

impl<'a> ScopedParams<'a> {
    #[must_use]
    pub fn new(parent: &'a dyn ParamSource, names: [&'a str; 2], values: [Value; 2]) -> Self {
        Self { parent, names, values }
    }
}

impl ParamSource for ScopedParams<'_> {
    fn get(&self, name: &str) -> Result<Option<Value>> {
        let mut segments = name.split('.');
        let head = segments.next().unwrap_or_default();
        for (bound, value) in self.names.iter().zip(&self.values) {
            if *bound == head {
                return Ok(value.lookup_path(segments).cloned());
            }
        }
        self.parent.get(name)
    }
}

/// Per-execution context: dialect plus the active parameter scope.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub dialect: Dialect,
    pub params: &'a dyn ParamSource,
}

impl<'a> Context<'a> {
    #[must_use]
    pub fn new(dialect: Dialect, params: &'a dyn ParamSource) -> Self {
        Self { dialect, params }
    }

    pub fn get(&self, name: &str) -> Result<Option<Value>> {
        self.params.get(name)
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("dialect", &self.dialect)
            .finish_non_exhaustive()
    }
}
