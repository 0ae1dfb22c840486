//! Runtime values of the expression language.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use surveygraph_tabular::Value;

/// A value bound in, or produced by, an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ExprValue>),
    Map(BTreeMap<String, ExprValue>),
}

impl ExprValue {
    /// Truthiness: null, false, zero and empty containers are false.
    pub fn truthy(&self) -> bool {
        match self {
            ExprValue::Null => false,
            ExprValue::Bool(b) => *b,
            ExprValue::Int(i) => *i != 0,
            ExprValue::Float(f) => *f != 0.0,
            ExprValue::Str(s) => !s.is_empty(),
            ExprValue::List(items) => !items.is_empty(),
            ExprValue::Map(entries) => !entries.is_empty(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ExprValue::Null => "None",
            ExprValue::Bool(_) => "bool",
            ExprValue::Int(_) => "int",
            ExprValue::Float(_) => "float",
            ExprValue::Str(_) => "str",
            ExprValue::List(_) => "list",
            ExprValue::Map(_) => "map",
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            ExprValue::Int(i) => Some(*i as f64),
            ExprValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Equality with numeric promotion; values of unrelated types are unequal.
    pub fn loose_eq(&self, other: &ExprValue) -> bool {
        match (self, other) {
            (ExprValue::Int(a), ExprValue::Int(b)) => a == b,
            (a, b) if a.as_number().is_some() && b.as_number().is_some() => {
                a.as_number() == b.as_number()
            }
            (ExprValue::List(a), ExprValue::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (a, b) => a == b,
        }
    }

    /// Ordering for `<`-style comparisons; `None` when the types are unordered.
    pub fn compare(&self, other: &ExprValue) -> Option<Ordering> {
        match (self, other) {
            (ExprValue::Int(a), ExprValue::Int(b)) => Some(a.cmp(b)),
            (ExprValue::Str(a), ExprValue::Str(b)) => Some(a.cmp(b)),
            (ExprValue::Bool(a), ExprValue::Bool(b)) => Some(a.cmp(b)),
            (a, b) => a.as_number()?.partial_cmp(&b.as_number()?),
        }
    }

    /// Convert a JSON value supplied as a side input.
    pub fn from_json(value: &serde_json::Value) -> ExprValue {
        match value {
            serde_json::Value::Null => ExprValue::Null,
            serde_json::Value::Bool(b) => ExprValue::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ExprValue::Int(i),
                None => ExprValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ExprValue::Str(s.clone()),
            serde_json::Value::Array(items) => {
                ExprValue::List(items.iter().map(ExprValue::from_json).collect())
            }
            serde_json::Value::Object(entries) => ExprValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), ExprValue::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Option<&Value>> for ExprValue {
    fn from(value: Option<&Value>) -> Self {
        match value {
            None => ExprValue::Null,
            Some(Value::String(s)) => ExprValue::Str(s.clone()),
            Some(Value::Integer(i)) => ExprValue::Int(*i),
            Some(Value::Number(n)) => ExprValue::Float(*n),
            Some(Value::Boolean(b)) => ExprValue::Bool(*b),
            Some(Value::List(items)) => {
                ExprValue::List(items.iter().cloned().map(ExprValue::Str).collect())
            }
            Some(other) => ExprValue::Str(other.to_string()),
        }
    }
}

impl From<&str> for ExprValue {
    fn from(value: &str) -> Self {
        ExprValue::Str(value.to_string())
    }
}

impl From<i64> for ExprValue {
    fn from(value: i64) -> Self {
        ExprValue::Int(value)
    }
}

impl From<bool> for ExprValue {
    fn from(value: bool) -> Self {
        ExprValue::Bool(value)
    }
}

impl fmt::Display for ExprValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprValue::Null => f.write_str("None"),
            ExprValue::Bool(true) => f.write_str("True"),
            ExprValue::Bool(false) => f.write_str("False"),
            ExprValue::Int(i) => write!(f, "{i}"),
            ExprValue::Float(x) => write!(f, "{x}"),
            ExprValue::Str(s) => write!(f, "{s:?}"),
            ExprValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            ExprValue::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}
