//! Traits implemented by editing contexts. Domain code is written against
//! these so it runs unchanged on any context.

use crate::error::EoError;
use crate::fetch::FetchSpecification;
use crate::global_id::GlobalId;
use crate::model::ModelGroup;
use crate::object::ObjectId;
use crate::value::Value;

/// Value access for objects owned by a context.
pub trait ObjectEditor {
    /// Reads a value. The key `entityName` yields the entity name.
    fn value_for_key(&self, object: ObjectId, key: &str) -> Result<Value, EoError>;

    /// Notifies the context of the change, then stores the value.
    fn take_value_for_key(&mut self, object: ObjectId, key: &str, value: Value) -> Result<(), EoError>;

    /// Change notification sent before an object is modified.
    fn object_will_change(&mut self, object: ObjectId);
}

/// Object graph management: creation, deletion, fetching and saving.
pub trait ObjectContext: ObjectEditor {
    fn model_group(&self) -> &ModelGroup;

    /// Instantiates an object of `entity_name` and inserts it.
    fn create_and_insert_instance(&mut self, entity_name: &str) -> Result<ObjectId, EoError>;

    /// Inserts a previously instantiated object.
    fn insert_object(&mut self, object: ObjectId) -> Result<(), EoError>;

    fn delete_object(&mut self, object: ObjectId) -> Result<(), EoError>;

    fn global_id_for_object(&self, object: ObjectId) -> Option<&GlobalId>;

    fn object_for_global_id(&self, global_id: &GlobalId) -> Option<ObjectId>;

    fn objects_with_fetch_specification(
        &mut self,
        fetch_specification: &FetchSpecification,
    ) -> Result<Vec<ObjectId>, EoError>;

    fn save_changes(&mut self) -> Result<(), EoError>;

    /// Whether there are unsaved insertions, updates or deletions.
    fn has_changes(&self) -> bool;
}
