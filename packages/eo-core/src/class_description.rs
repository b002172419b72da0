//! Class descriptions: how instances of an entity are created, initialized
//! and validated.

use crate::context::ObjectEditor;
use crate::error::EoError;
use crate::model::Attribute;
use crate::object::{EnterpriseObject, ObjectId};
use crate::value::Value;

/// Initialization code run when an object is inserted, after model defaults
/// have been applied. Changes must go through the editor so that change
/// notifications fire.
pub type AwakeFromInsertion = fn(&mut dyn ObjectEditor, ObjectId) -> Result<(), EoError>;

/// Runtime description of an entity's instances.
#[derive(Debug, Clone)]
pub struct ClassDescription {
    entity_name: String,
    attributes: Vec<Attribute>,
    awake: Option<AwakeFromInsertion>,
}

impl ClassDescription {
    pub fn new(
        entity_name: impl Into<String>,
        attributes: Vec<Attribute>,
        awake: Option<AwakeFromInsertion>,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            attributes,
            awake,
        }
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Attributes including inherited ones.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute_named(&self, key: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attribute| attribute.name == key)
    }

    /// Creates a bare instance: every attribute null, no global id.
    pub fn create_instance(&self) -> EnterpriseObject {
        EnterpriseObject::new(
            self.entity_name.as_str(),
            self.attributes.iter().map(|attribute| attribute.name.as_str()),
        )
    }

    /// Applies attribute defaults through `editor`, then runs the registered
    /// awake hook.
    pub fn awake_object_from_insertion(
        &self,
        editor: &mut dyn ObjectEditor,
        object: ObjectId,
    ) -> Result<(), EoError> {
        for attribute in &self.attributes {
            if let Some(default) = &attribute.default {
                editor.take_value_for_key(object, &attribute.name, default.clone())?;
            }
        }

        if let Some(awake) = self.awake {
            awake(editor, object)?;
        }

        Ok(())
    }

    /// Checks that `key` is an attribute and converts `value` to its type.
    pub fn validate_value(&self, key: &str, value: Value) -> Result<Value, EoError> {
        let attribute = self
            .attribute_named(key)
            .ok_or_else(|| EoError::UnknownKey {
                entity: self.entity_name.clone(),
                key: key.to_string(),
            })?;

        let got = value.type_name();
        attribute
            .attribute_type
            .coerce(value)
            .ok_or_else(|| EoError::TypeMismatch {
                entity: self.entity_name.clone(),
                key: key.to_string(),
                expected: attribute.attribute_type.name().to_string(),
                got: got.to_string(),
            })
    }

    /// Rejects objects with null values in required attributes.
    pub fn validate_for_save(&self, object: &EnterpriseObject) -> Result<(), EoError> {
        for attribute in self.attributes.iter().filter(|a| !a.allows_null) {
            let missing = object
                .values()
                .get(&attribute.name)
                .map_or(true, Value::is_null);
            if missing {
                return Err(EoError::ValidationFailed {
                    entity: self.entity_name.clone(),
                    key: attribute.name.clone(),
                    message: "value is required".to_string(),
                });
            }
        }
        Ok(())
    }
}
