use serde::Serialize;
use chrono::{NaiveDate, NaiveDateTime, DateTime, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    // Numeric types
    Integer(i64),
    Real(f64),
    Numeric(Decimal),
    Text(String),
    // Date/Time types
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    // Special types
    Uuid(Uuid),
    Bytea(Vec<u8>),
    // Containers
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// An optional parameter: `None` is an absent value, `Some` a present one.
    Nullable(Option<Box<Value>>),
}

static NULL: Value = Value::Null;

/// Iterable view of a sequence or mapping value, yielding `(index or key, element)`.
pub struct Elements<'a> {
    shape: Shape<'a>,
    position: i64,
}

enum Shape<'a> {
    Sequence(std::slice::Iter<'a, Value>),
    Bytes(std::slice::Iter<'a, u8>),
    Mapping(std::collections::btree_map::Iter<'a, String, Value>),
}

impl Elements<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Iterator for Elements<'_> {
    type Item = (Value, Value);

    fn next(&mut self) -> Option<Self::Item> {
        let item = match &mut self.shape {
            Shape::Sequence(it) => it.next().cloned(),
            Shape::Bytes(it) => it.next().map(|b| Value::Integer(i64::from(*b))),
            Shape::Mapping(it) => {
                return it.next().map(|(k, v)| (Value::Text(k.clone()), v.clone()));
            }
        }?;
        let key = Value::Integer(self.position);
        self.position += 1;
        Some((key, item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = match &self.shape {
            Shape::Sequence(it) => it.len(),
            Shape::Bytes(it) => it.len(),
            Shape::Mapping(it) => it.len(),
        };
        (len, Some(len))
    }
}

impl ExactSizeIterator for Elements<'_> {}

impl Value {
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view used by comparisons and arithmetic.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        use rust_decimal::prelude::ToPrimitive;
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            Self::Numeric(d) => d.to_f64(),
            _ => None,
        }
    }

    /// `nil` in the sense of a boolean test: `Null` or an absent `Nullable`.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Null | Self::Nullable(None))
    }

    /// Looks through a present `Nullable`; an absent one becomes `Null`.
    #[must_use]
    pub fn resolved(&self) -> &Self {
        match self {
            Self::Nullable(Some(inner)) => inner.resolved(),
            Self::Nullable(None) => &NULL,
            other => other,
        }
    }

    /// Owned counterpart of [`Value::resolved`].
    #[must_use]
    pub fn into_resolved(self) -> Self {
        match self {
            Self::Nullable(Some(inner)) => inner.into_resolved(),
            Self::Nullable(None) => Self::Null,
            other => other,
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Numeric(_) => "numeric",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::Timestamp(_) => "timestamp",
            Self::TimestampTz(_) => "timestamptz",
            Self::Uuid(_) => "uuid",
            Self::Bytea(_) => "bytea",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Nullable(_) => "nullable",
        }
    }

    /// Classifies the value as something iterable. `None` means the shape is unsupported.
    #[must_use]
    pub fn elements(&self) -> Option<Elements<'_>> {
        let shape = match self.resolved() {
            Self::List(items) => Shape::Sequence(items.iter()),
            Self::Bytea(bytes) => Shape::Bytes(bytes.iter()),
            Self::Map(entries) => Shape::Mapping(entries.iter()),
            _ => return None,
        };
        Some(Elements { shape, position: 0 })
    }

    /// Walks a dotted path (`user.address.city`, `ids.0`) below this value.
    #[must_use]
    pub fn lookup_path<'a, I>(&self, mut segments: I) -> Option<&Self>
    where
        I: Iterator<Item = &'a str>,
    {
        let Some(segment) = segments.next() else {
            return Some(self);
        };
        match self.resolved() {
            Self::Map(entries) => entries.get(segment)?.lookup_path(segments),
            Self::List(items) => {
                let idx: usize = segment.parse().ok()?;
                items.get(idx)?.lookup_path(segments)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Numeric(d) => write!(f, "{d}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
            Self::TimestampTz(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S %Z")),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Bytea(b) => write!(f, "\\x{}", hex::encode(b)),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "map[")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                write!(f, "]")
            }
            Self::Nullable(Some(inner)) => write!(f, "{inner}"),
            Self::Nullable(None) => write!(f, "NULL"),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Self::Integer(i64::from(v))
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Real(f64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Self::Numeric(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::Timestamp(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::TimestampTz(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<BTreeMap<String, T>> for Value {
    fn from(v: BTreeMap<String, T>) -> Self {
        Self::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        Self::Nullable(v.map(|inner| Box::new(inner.into())))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Real(n.as_f64().unwrap_or(f64::NAN)), Self::Integer),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Real(3.5).to_string(), "3.5");
        assert_eq!(Value::Text("hello".to_string()).to_string(), "hello");
        assert_eq!(Value::from(vec![1, 2, 3]).to_string(), "[1 2 3]");
        assert_eq!(Value::Bytea(vec![0xde, 0xad]).to_string(), "\\xdead");
        assert_eq!(Value::from(Some(7)).to_string(), "7");
        assert_eq!(Value::from(None::<i32>).to_string(), "NULL");
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(42).as_int(), Some(42));
        assert_eq!(Value::Text("hello".to_string()).as_int(), None);
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
        assert_eq!(Value::Integer(2).as_f64(), Some(2.0));
    }

    #[test]
    fn test_resolved_looks_through_nullable() {
        let present = Value::from(Some("x"));
        assert_eq!(present.resolved(), &Value::Text("x".to_string()));
        assert!(Value::from(None::<i64>).resolved().is_nil());
        assert!(!present.is_nil());
    }

    #[test]
    fn test_elements_of_list_and_map() {
        let list = Value::from(vec![10, 20]);
        let pairs: Vec<_> = list.elements().unwrap().collect();
        assert_eq!(
            pairs,
            vec![
                (Value::Integer(0), Value::Integer(10)),
                (Value::Integer(1), Value::Integer(20)),
            ]
        );

        let mut map = BTreeMap::new();
        map.insert("b".to_string(), 2);
        map.insert("a".to_string(), 1);
        let map = Value::from(map);
        let elements = map.elements().unwrap();
        assert_eq!(elements.len(), 2);
        let pairs: Vec<_> = elements.collect();
        assert_eq!(pairs[0], (Value::Text("a".to_string()), Value::Integer(1)));
        assert_eq!(pairs.len(), 2);

        assert!(Value::Integer(1).elements().is_none());
        assert!(Value::Text("abc".to_string()).elements().is_none());
    }

    #[test]
    fn test_lookup_path() {
        let json = serde_json::json!({"user": {"name": "alice", "ids": [4, 5]}});
        let value = Value::from(json);
        assert_eq!(
            value.lookup_path("user.name".split('.')),
            Some(&Value::Text("alice".to_string()))
        );
        assert_eq!(value.lookup_path("user.ids.1".split('.')), Some(&Value::Integer(5)));
        assert_eq!(value.lookup_path("user.missing".split('.')), None);
    }

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(Value::from(serde_json::json!(3)), Value::Integer(3));
        assert_eq!(Value::from(serde_json::json!(1.5)), Value::Real(1.5));
        assert_eq!(Value::from(serde_json::json!(null)), Value::Null);
    }
}
