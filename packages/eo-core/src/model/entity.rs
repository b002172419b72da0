//! Entity and attribute definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fetch::StoredFetchSpecification;
use crate::value::Value;

/// Storage type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Integer,
    Decimal,
    String,
    Boolean,
}

impl AttributeType {
    pub fn name(self) -> &'static str {
        match self {
            AttributeType::Integer => "integer",
            AttributeType::Decimal => "decimal",
            AttributeType::String => "string",
            AttributeType::Boolean => "boolean",
        }
    }

    /// Converts `value` to this type. Null is always accepted and integers
    /// widen into decimals; anything else returns `None`.
    pub fn coerce(self, value: Value) -> Option<Value> {
        match (self, value) {
            (_, Value::Null) => Some(Value::Null),
            (AttributeType::Integer, value @ Value::Integer(_)) => Some(value),
            (AttributeType::Decimal, Value::Integer(i)) => Some(Value::Decimal(i as f64)),
            (AttributeType::Decimal, value @ Value::Decimal(_)) => Some(value),
            (AttributeType::String, value @ Value::String(_)) => Some(value),
            (AttributeType::Boolean, value @ Value::Boolean(_)) => Some(value),
            _ => None,
        }
    }
}

/// A named, typed property of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    /// Value applied when an instance is inserted
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default = "allows_null_default")]
    pub allows_null: bool,
}

fn allows_null_default() -> bool {
    true
}

impl Attribute {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
            default: None,
            allows_null: true,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.allows_null = false;
        self
    }
}

/// Schema definition of an enterprise object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    /// Implementing class name, informational
    #[serde(default)]
    pub class_name: Option<String>,
    /// Super-entity name
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub fetch_specifications: BTreeMap<String, StoredFetchSpecification>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_name: None,
            parent: None,
            is_abstract: false,
            attributes: Vec::new(),
            fetch_specifications: BTreeMap::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Attribute declared directly on this entity.
    pub fn attribute_named(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }
}
