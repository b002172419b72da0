//! Attribute values.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A dynamically typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// Signed integer value
    Integer(i64),
    /// Floating point value
    Decimal(f64),
    /// Text value
    String(String),
}

impl Value {
    /// Returns the type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(value) => Some(*value as f64),
            Value::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Equality used by qualifiers: numbers compare by value across
    /// integer and decimal.
    pub fn matches(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_numeric() && b.is_numeric() => a.compare(b) == Some(Ordering::Equal),
            (a, b) => a == b,
        }
    }

    /// Partial ordering between values of comparable types. `None` when either
    /// side is null or NaN, or the types differ.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (a, b) if a.is_numeric() && b.is_numeric() => {
                if a.is_nan() || b.is_nan() {
                    return None;
                }
                Some(numeric_cmp(a, b))
            }
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used for sorting: `Null < Boolean < numbers < String`.
    /// Among numbers, negative NaN sorts first and positive NaN last.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        if self.is_numeric() && other.is_numeric() {
            return numeric_cmp(self, other);
        }
        self.compare(other)
            .unwrap_or_else(|| self.sort_rank().cmp(&other.sort_rank()))
    }

    fn is_nan(&self) -> bool {
        matches!(self, Value::Decimal(value) if value.is_nan())
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Decimal(_))
    }

    fn sort_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Integer(_) | Value::Decimal(_) => 2,
            Value::String(_) => 3,
        }
    }
}

/// Total order over numeric values. Integers and decimals compare exactly,
/// `-0.0` equals `0.0`, and NaNs sit beyond the infinities on their sign's side.
fn numeric_cmp(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
        (Value::Integer(a), Value::Decimal(b)) => integer_decimal_cmp(*a, *b),
        (Value::Decimal(a), Value::Integer(b)) => integer_decimal_cmp(*b, *a).reverse(),
        (Value::Decimal(a), Value::Decimal(b)) => match (a.is_nan(), b.is_nan()) {
            (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (true, true) => a.total_cmp(b),
            (true, false) => nan_side(*a),
            (false, true) => nan_side(*b).reverse(),
        },
        _ => Ordering::Equal,
    }
}

/// Position of a NaN relative to any non-NaN number.
fn nan_side(nan: f64) -> Ordering {
    if nan.is_sign_negative() {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Exact comparison of an integer with a decimal, without rounding the
/// integer through `f64`.
fn integer_decimal_cmp(integer: i64, decimal: f64) -> Ordering {
    // 2^63: every i64 is below it, and -2^63 is the smallest i64
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if decimal.is_nan() {
        return nan_side(decimal).reverse();
    }
    if decimal >= LIMIT {
        return Ordering::Less;
    }
    if decimal < -LIMIT {
        return Ordering::Greater;
    }

    let whole = decimal.trunc();
    match integer.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&decimal).unwrap_or(Ordering::Equal),
        ordering => ordering,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Integer(value) => write!(f, "{}", value),
            Value::Decimal(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{:?}", value),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
