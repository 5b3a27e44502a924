//! Runtime value model for template evaluation.
//!
//! Every piece of data a template can touch — caller bindings, loop
//! elements, function arguments and results — is a [`Value`]. The set of
//! kinds is closed: strings, numbers, booleans, lists, maps, and
//! [`Value::Absent`] for "no such key". Values are immutable once built;
//! composite values are owned by the [`Context`](crate::context::Context)
//! that holds them for the duration of a render call.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A runtime value in the template language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A text value.
    String(String),
    /// A numeric value. Integral numbers display without a fractional part.
    Number(f64),
    /// A boolean value.
    Bool(bool),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A string-keyed mapping, traversable with dotted paths.
    Map(HashMap<String, Value>),
    /// No value — a missing variable or nested key.
    Absent,
}

impl Value {
    /// The engine's single truthiness rule.
    ///
    /// Non-empty strings, non-zero numbers, `true`, and non-empty
    /// lists/maps are truthy. Everything else, including [`Value::Absent`],
    /// is falsy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::String(s) => !s.is_empty(),
            Value::Number(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Absent => false,
        }
    }

    /// Traverse nested maps one path segment at a time.
    ///
    /// Returns `None` as soon as a segment is missing or the current value
    /// is not a map. An empty path returns the value itself.
    pub fn get_path(&self, path: &[String]) -> Option<&Value> {
        let mut current = self;
        for segment in path {
            current = match current {
                Value::Map(map) => map.get(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Borrow the string contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Kind name for diagnostics ("string", "number", ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Absent => "absent",
        }
    }
}

/// Renders the value as prompt text. This is the form substituted into
/// rendered output: integral numbers drop the `.0`, lists comma-join their
/// elements, maps fall back to their JSON form, and `Absent` is empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Bool(b) => write!(f, "{b}"),
            Value::List(items) => {
                let mut first = true;
                for item in items {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Map(_) => match serde_json::to_string(self) {
                Ok(json) => f.write_str(&json),
                Err(_) => f.write_str("{}"),
            },
            Value::Absent => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(map: HashMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Absent,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
