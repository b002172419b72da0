//! Qualifiers: predicates over object values.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::object::KeyValueCoding;
use crate::value::Value;

/// Comparison operator of a key/value qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    /// Wildcard match: `*` any run of characters, `?` one character
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "caseInsensitiveLike")]
    CaseInsensitiveLike,
}

impl Selector {
    fn evaluate(self, left: &Value, right: &Value) -> bool {
        match self {
            Selector::Equal => left.matches(right),
            Selector::NotEqual => !left.matches(right),
            Selector::LessThan => left.compare(right) == Some(Ordering::Less),
            Selector::LessThanOrEqual => {
                matches!(left.compare(right), Some(Ordering::Less | Ordering::Equal))
            }
            Selector::GreaterThan => left.compare(right) == Some(Ordering::Greater),
            Selector::GreaterThanOrEqual => {
                matches!(left.compare(right), Some(Ordering::Greater | Ordering::Equal))
            }
            Selector::Like => match (left.as_str(), right.as_str()) {
                (Some(text), Some(pattern)) => wildcard_match(text, pattern),
                _ => false,
            },
            Selector::CaseInsensitiveLike => match (left.as_str(), right.as_str()) {
                (Some(text), Some(pattern)) => {
                    wildcard_match(&text.to_lowercase(), &pattern.to_lowercase())
                }
                _ => false,
            },
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Selector::Equal => "=",
            Selector::NotEqual => "!=",
            Selector::LessThan => "<",
            Selector::LessThanOrEqual => "<=",
            Selector::GreaterThan => ">",
            Selector::GreaterThanOrEqual => ">=",
            Selector::Like => "like",
            Selector::CaseInsensitiveLike => "caseInsensitiveLike",
        }
    }
}

/// Predicate evaluated against objects through key-value coding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualifier {
    /// Compares the value for `key` with a constant
    KeyValue {
        key: String,
        selector: Selector,
        value: Value,
    },
    And(Vec<Qualifier>),
    Or(Vec<Qualifier>),
    Not(Box<Qualifier>),
}

impl Qualifier {
    pub fn key_value(key: impl Into<String>, selector: Selector, value: impl Into<Value>) -> Self {
        Qualifier::KeyValue {
            key: key.into(),
            selector,
            value: value.into(),
        }
    }

    pub fn is(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::key_value(key, Selector::Equal, value)
    }

    pub fn is_not(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::key_value(key, Selector::NotEqual, value)
    }

    pub fn less_than(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::key_value(key, Selector::LessThan, value)
    }

    pub fn less_than_or_equal_to(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::key_value(key, Selector::LessThanOrEqual, value)
    }

    pub fn greater_than(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::key_value(key, Selector::GreaterThan, value)
    }

    pub fn greater_than_or_equal_to(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::key_value(key, Selector::GreaterThanOrEqual, value)
    }

    pub fn like(key: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::key_value(key, Selector::Like, Value::String(pattern.into()))
    }

    pub fn like_insensitive(key: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::key_value(key, Selector::CaseInsensitiveLike, Value::String(pattern.into()))
    }

    /// Matches objects whose value for `key` equals any of `values`.
    pub fn is_in<V: Into<Value>>(key: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        let key = key.into();
        Qualifier::Or(
            values
                .into_iter()
                .map(|value| Self::is(key.clone(), value))
                .collect(),
        )
    }

    /// Conjunction; nested conjunctions are flattened.
    pub fn and(self, other: Qualifier) -> Self {
        let mut operands = match self {
            Qualifier::And(operands) => operands,
            qualifier => vec![qualifier],
        };
        match other {
            Qualifier::And(more) => operands.extend(more),
            qualifier => operands.push(qualifier),
        }
        Qualifier::And(operands)
    }

    /// Disjunction; nested disjunctions are flattened.
    pub fn or(self, other: Qualifier) -> Self {
        let mut operands = match self {
            Qualifier::Or(operands) => operands,
            qualifier => vec![qualifier],
        };
        match other {
            Qualifier::Or(more) => operands.extend(more),
            qualifier => operands.push(qualifier),
        }
        Qualifier::Or(operands)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Qualifier::Not(Box::new(self))
    }

    /// Evaluates the qualifier against one object. An empty `And` is true, an
    /// empty `Or` is false.
    pub fn evaluate_with_object<T: KeyValueCoding + ?Sized>(&self, object: &T) -> bool {
        match self {
            Qualifier::KeyValue {
                key,
                selector,
                value,
            } => selector.evaluate(&object.value_for_key(key), value),
            Qualifier::And(operands) => operands.iter().all(|q| q.evaluate_with_object(object)),
            Qualifier::Or(operands) => operands.iter().any(|q| q.evaluate_with_object(object)),
            Qualifier::Not(operand) => !operand.evaluate_with_object(object),
        }
    }

    /// Keeps the objects the qualifier accepts, preserving order.
    pub fn filtered<'a, T: KeyValueCoding>(&self, objects: impl IntoIterator<Item = &'a T>) -> Vec<&'a T>
    where
        T: 'a,
    {
        objects
            .into_iter()
            .filter(|object| self.evaluate_with_object(*object))
            .collect()
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, operands: &[Qualifier], op: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, operand) in operands.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", op)?;
                }
                write!(f, "{}", operand)?;
            }
            write!(f, ")")
        }

        match self {
            Qualifier::KeyValue {
                key,
                selector,
                value,
            } => write!(f, "{} {} {}", key, selector.symbol(), value),
            Qualifier::And(operands) => join(f, operands, "and"),
            Qualifier::Or(operands) => join(f, operands, "or"),
            Qualifier::Not(operand) => write!(f, "not ({})", operand),
        }
    }
}

/// Matches `text` against a pattern where `*` matches any run of characters
/// and `?` matches exactly one.
fn wildcard_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
