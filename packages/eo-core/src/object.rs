//! Enterprise object instances.

use std::collections::BTreeMap;
use std::fmt;

use crate::global_id::GlobalId;
use crate::value::Value;

/// Key resolving to an object's entity name.
pub const ENTITY_NAME_KEY: &str = "entityName";

/// Handle to an object owned by an editing context.
///
/// Handles are allocated in increasing order, so ordering by handle is
/// ordering by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read access to values by key.
pub trait KeyValueCoding {
    /// Returns the value for `key`, or `Value::Null` for unknown keys.
    fn value_for_key(&self, key: &str) -> Value;
}

/// An instance of an entity: its entity name, attribute values and the
/// global id currently assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct EnterpriseObject {
    entity_name: String,
    values: BTreeMap<String, Value>,
    global_id: Option<GlobalId>,
}

impl EnterpriseObject {
    /// Creates an instance with every key set to null.
    pub fn new<'a>(entity_name: impl Into<String>, keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            entity_name: entity_name.into(),
            values: keys
                .into_iter()
                .map(|key| (key.to_string(), Value::Null))
                .collect(),
            global_id: None,
        }
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn global_id(&self) -> Option<&GlobalId> {
        self.global_id.as_ref()
    }

    pub(crate) fn set_global_id(&mut self, global_id: Option<GlobalId>) {
        self.global_id = global_id;
    }

    /// Attribute keys and values in key order.
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub(crate) fn store_value(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }
}

impl KeyValueCoding for EnterpriseObject {
    fn value_for_key(&self, key: &str) -> Value {
        if key == ENTITY_NAME_KEY {
            return Value::String(self.entity_name.clone());
        }
        self.values.get(key).cloned().unwrap_or(Value::Null)
    }
}
