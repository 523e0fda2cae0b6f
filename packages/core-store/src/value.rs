//! Untyped column values.
//!
//! `Value` is the dynamically typed cell of a write payload and
//! `ContentValues` maps column names to cells. Payloads arrive untyped from
//! the outside (a shell line, a JSON document) and are validated column by
//! column into [`ProductValues`](crate::ProductValues) before any store call.

use std::collections::BTreeMap;
use std::fmt;

/// A single column value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Absence of a value. A null column is treated as "not provided".
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        // Product counts are capped at i64::MAX, so only foreign values saturate
        Value::Integer(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// An untyped write payload: column name to value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentValues {
    columns: BTreeMap<String, Value>,
}

impl ContentValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any previous value.
    pub fn put(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.columns.insert(column.into(), value.into());
        self
    }

    /// Builder-style variant of [`put`](Self::put).
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.put(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate columns in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.columns.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ContentValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let columns = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        ContentValues { columns }
    }
}

impl From<BTreeMap<String, Value>> for ContentValues {
    fn from(columns: BTreeMap<String, Value>) -> Self {
        ContentValues { columns }
    }
}
