//! The host value type shared by records, filters, and aggregation.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A property or projection value.
///
/// Carries a total order so that filter comparisons and `min`/`max`
/// aggregation behave the same everywhere: `Null < Bool < Number < String`,
/// floats compared through [`OrderedFloat`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Value {
    /// Parses a raw command-line token into the closest-typed value.
    pub fn parse(raw: &str) -> Value {
        if raw.eq_ignore_ascii_case("null") {
            return Value::Null;
        }
        if raw.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        if let Ok(n) = raw.parse::<f64>() {
            return Value::Number(n);
        }
        Value::String(raw.to_string())
    }

    /// Numeric view used by the arithmetic evaluator and the aggregates.
    /// Strings that parse as numbers coerce, everything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => s.parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Total order over values of any type.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
            (Value::Bool(_), _) => Ordering::Less,
            (_, Value::Bool(_)) => Ordering::Greater,
            (Value::Number(l), Value::Number(r)) => OrderedFloat(*l).cmp(&OrderedFloat(*r)),
            (Value::Number(_), _) => Ordering::Less,
            (_, Value::Number(_)) => Ordering::Greater,
            (Value::String(l), Value::String(r)) => l.cmp(r),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
        }
    }
}
