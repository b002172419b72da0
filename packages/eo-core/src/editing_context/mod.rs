//! Editing context: an in-memory object graph with change tracking, backed
//! by an object store.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::class_description::ClassDescription;
use crate::config::EoConfig;
use crate::context::{ObjectContext, ObjectEditor};
use crate::error::EoError;
use crate::fetch::FetchSpecification;
use crate::global_id::GlobalId;
use crate::model::ModelGroup;
use crate::object::{EnterpriseObject, KeyValueCoding, ObjectId, ENTITY_NAME_KEY};
use crate::store::{ChangeSet, ObjectSnapshot, ObjectStore};
use crate::value::Value;

/// Object graph owned by one unit of work.
///
/// Objects live in an arena addressed by [`ObjectId`]. An object is
/// *registered* once it has a global id in this context; registration order
/// is creation order.
#[derive(Debug)]
pub struct EditingContext {
    config: EoConfig,
    model_group: ModelGroup,
    store: Box<dyn ObjectStore>,
    objects: BTreeMap<ObjectId, EnterpriseObject>,
    next_object_id: u64,
    next_temporary_id: u64,
    registered: BTreeMap<ObjectId, GlobalId>,
    objects_by_global_id: HashMap<GlobalId, ObjectId>,
    inserted: BTreeSet<ObjectId>,
    updated: BTreeSet<ObjectId>,
    deleted: BTreeSet<ObjectId>,
}

impl EditingContext {
    /// Creates an empty editing context.
    pub fn new(store: Box<dyn ObjectStore>, model_group: ModelGroup, config: EoConfig) -> Self {
        Self {
            config,
            model_group,
            store,
            objects: BTreeMap::new(),
            next_object_id: 0,
            next_temporary_id: 0,
            registered: BTreeMap::new(),
            objects_by_global_id: HashMap::new(),
            inserted: BTreeSet::new(),
            updated: BTreeSet::new(),
            deleted: BTreeSet::new(),
        }
    }

    /// Creates an editing context over the named models.
    ///
    /// # Errors
    /// Propagates model lookup, parse and validation failures.
    pub fn with_models<S: AsRef<str>>(
        store: Box<dyn ObjectStore>,
        config: EoConfig,
        model_names: &[S],
    ) -> Result<Self, EoError> {
        let model_group = ModelGroup::load(&config, model_names)?;
        Ok(Self::new(store, model_group, config))
    }

    pub fn config(&self) -> &EoConfig {
        &self.config
    }

    pub fn model_group_mut(&mut self) -> &mut ModelGroup {
        &mut self.model_group
    }

    pub fn object(&self, object: ObjectId) -> Option<&EnterpriseObject> {
        self.objects.get(&object)
    }

    pub fn entity_name_for_object(&self, object: ObjectId) -> Result<&str, EoError> {
        self.objects
            .get(&object)
            .map(EnterpriseObject::entity_name)
            .ok_or(EoError::ObjectNotFound { object })
    }

    pub fn class_description_for_object(&self, object: ObjectId) -> Result<ClassDescription, EoError> {
        let entity_name = self.entity_name_for_object(object)?;
        self.class_description(entity_name)
    }

    fn class_description(&self, entity_name: &str) -> Result<ClassDescription, EoError> {
        self.model_group
            .class_description_for_entity_name(entity_name)
            .ok_or_else(|| EoError::ClassDescriptionNotFound {
                entity: entity_name.to_string(),
            })
    }

    /// Creates a bare, unregistered instance of an entity in this context.
    pub fn instantiate(&mut self, entity_name: &str) -> Result<ObjectId, EoError> {
        let description = self.class_description(entity_name)?;
        Ok(self.adopt(description.create_instance()))
    }

    fn adopt(&mut self, object: EnterpriseObject) -> ObjectId {
        self.next_object_id += 1;
        let id = ObjectId(self.next_object_id);
        self.objects.insert(id, object);
        id
    }

    /// Returns a temporary global id unique within this context.
    pub fn new_temporary_global_id(&mut self) -> GlobalId {
        self.next_temporary_id += 1;
        GlobalId::Temporary(self.next_temporary_id)
    }

    /// Registers `object` under `global_id`, replacing any previous
    /// registration of either, and assigns the id to the instance.
    pub fn record_object(&mut self, object: ObjectId, global_id: GlobalId) -> Result<(), EoError> {
        let instance = self
            .objects
            .get_mut(&object)
            .ok_or(EoError::ObjectNotFound { object })?;
        instance.set_global_id(Some(global_id.clone()));

        if let Some(previous) = self.registered.insert(object, global_id.clone()) {
            self.objects_by_global_id.remove(&previous);
        }
        if let Some(displaced) = self.objects_by_global_id.insert(global_id, object) {
            if displaced != object {
                self.registered.remove(&displaced);
            }
        }
        Ok(())
    }

    /// Unregisters an object and drops it from the pending-change sets. The
    /// instance stays readable through its handle.
    pub fn forget_object(&mut self, object: ObjectId) {
        if let Some(global_id) = self.registered.remove(&object) {
            self.objects_by_global_id.remove(&global_id);
        }
        if let Some(instance) = self.objects.get_mut(&object) {
            instance.set_global_id(None);
        }
        self.inserted.remove(&object);
        self.updated.remove(&object);
        self.deleted.remove(&object);
    }

    /// Sets the global id carried by the instance without touching the
    /// registration table.
    pub fn assign_global_id(&mut self, object: ObjectId, global_id: GlobalId) -> Result<(), EoError> {
        self.objects
            .get_mut(&object)
            .ok_or(EoError::ObjectNotFound { object })?
            .set_global_id(Some(global_id));
        Ok(())
    }

    /// Registered objects in registration order.
    pub fn registered_objects(&self) -> Vec<ObjectId> {
        self.registered.keys().copied().collect()
    }

    pub fn inserted_objects(&self) -> Vec<ObjectId> {
        self.inserted.iter().copied().collect()
    }

    pub fn updated_objects(&self) -> Vec<ObjectId> {
        self.updated.iter().copied().collect()
    }

    pub fn deleted_objects(&self) -> Vec<ObjectId> {
        self.deleted.iter().copied().collect()
    }

    pub fn is_registered(&self, object: ObjectId) -> bool {
        self.registered.contains_key(&object)
    }

    /// Runs the insertion-time initialization of an object with this context
    /// as the editor.
    pub fn awake_from_insertion(&mut self, object: ObjectId) -> Result<(), EoError> {
        let description = self.class_description_for_object(object)?;
        description.awake_object_from_insertion(self, object)
    }

    fn checked_value(&self, object: ObjectId, key: &str, value: Value) -> Result<Value, EoError> {
        self.class_description_for_object(object)?
            .validate_value(key, value)
    }

    fn store_checked(&mut self, object: ObjectId, key: &str, value: Value) -> Result<(), EoError> {
        self.objects
            .get_mut(&object)
            .ok_or(EoError::ObjectNotFound { object })?
            .store_value(key, value);
        Ok(())
    }

    /// Stores a value without sending a change notification.
    pub fn take_stored_value_for_key(
        &mut self,
        object: ObjectId,
        key: &str,
        value: Value,
    ) -> Result<(), EoError> {
        let value = self.checked_value(object, key, value)?;
        self.store_checked(object, key, value)
    }

    fn snapshot(&self, object: ObjectId) -> Option<ObjectSnapshot> {
        let instance = self.objects.get(&object)?;
        Some(ObjectSnapshot {
            global_id: self.registered.get(&object)?.clone(),
            entity_name: instance.entity_name().to_string(),
            values: instance.values().clone(),
        })
    }

    fn materialize(&mut self, snapshot: ObjectSnapshot) -> Result<ObjectId, EoError> {
        let description = self.class_description(&snapshot.entity_name)?;
        let mut instance = description.create_instance();
        for (key, value) in snapshot.values {
            let value = description.validate_value(&key, value)?;
            instance.store_value(&key, value);
        }
        let id = self.adopt(instance);
        self.record_object(id, snapshot.global_id)?;
        Ok(id)
    }

    /// Discards every object and pending change. Models, the store and the
    /// id counters are kept.
    pub fn reset(&mut self) {
        tracing::debug!(
            "Resetting editing context: discarding {} objects ({} registered)",
            self.objects.len(),
            self.registered.len()
        );
        self.objects.clear();
        self.registered.clear();
        self.objects_by_global_id.clear();
        self.inserted.clear();
        self.updated.clear();
        self.deleted.clear();
    }
}

impl ObjectEditor for EditingContext {
    fn value_for_key(&self, object: ObjectId, key: &str) -> Result<Value, EoError> {
        let instance = self
            .objects
            .get(&object)
            .ok_or(EoError::ObjectNotFound { object })?;
        if key != ENTITY_NAME_KEY && !instance.values().contains_key(key) {
            return Err(EoError::UnknownKey {
                entity: instance.entity_name().to_string(),
                key: key.to_string(),
            });
        }
        Ok(instance.value_for_key(key))
    }

    fn take_value_for_key(&mut self, object: ObjectId, key: &str, value: Value) -> Result<(), EoError> {
        let value = self.checked_value(object, key, value)?;
        self.object_will_change(object);
        self.store_checked(object, key, value)
    }

    fn object_will_change(&mut self, object: ObjectId) {
        if self.registered.contains_key(&object)
            && !self.inserted.contains(&object)
            && !self.deleted.contains(&object)
        {
            self.updated.insert(object);
        }
    }
}

impl ObjectContext for EditingContext {
    fn model_group(&self) -> &ModelGroup {
        &self.model_group
    }

    fn create_and_insert_instance(&mut self, entity_name: &str) -> Result<ObjectId, EoError> {
        let object = self.instantiate(entity_name)?;
        self.insert_object(object)?;
        Ok(object)
    }

    fn insert_object(&mut self, object: ObjectId) -> Result<(), EoError> {
        if !self.objects.contains_key(&object) {
            return Err(EoError::ObjectNotFound { object });
        }
        if self.registered.contains_key(&object) {
            tracing::debug!("Object {} is already registered; insert ignored", object);
            return Ok(());
        }

        let global_id = self.new_temporary_global_id();
        self.record_object(object, global_id)?;
        self.inserted.insert(object);
        self.awake_from_insertion(object)
    }

    fn delete_object(&mut self, object: ObjectId) -> Result<(), EoError> {
        if !self.registered.contains_key(&object) {
            return Err(EoError::ObjectNotFound { object });
        }
        if self.inserted.contains(&object) {
            // never saved, nothing to delete from the store
            self.forget_object(object);
        } else {
            self.updated.remove(&object);
            self.deleted.insert(object);
        }
        Ok(())
    }

    fn global_id_for_object(&self, object: ObjectId) -> Option<&GlobalId> {
        self.registered.get(&object)
    }

    fn object_for_global_id(&self, global_id: &GlobalId) -> Option<ObjectId> {
        self.objects_by_global_id.get(global_id).copied()
    }

    fn objects_with_fetch_specification(
        &mut self,
        fetch_specification: &FetchSpecification,
    ) -> Result<Vec<ObjectId>, EoError> {
        let snapshots = self
            .store
            .objects_with_fetch_specification(fetch_specification)?;

        let mut objects = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            // objects already in the context keep their in-memory state
            let object = match self.objects_by_global_id.get(&snapshot.global_id) {
                Some(&object) => object,
                None => self.materialize(snapshot)?,
            };
            if !self.deleted.contains(&object) {
                objects.push(object);
            }
        }
        Ok(objects)
    }

    fn save_changes(&mut self) -> Result<(), EoError> {
        if !self.has_changes() {
            return Ok(());
        }

        if self.config.validate_on_save {
            for &object in self.inserted.iter().chain(self.updated.iter()) {
                let instance = self
                    .objects
                    .get(&object)
                    .ok_or(EoError::ObjectNotFound { object })?;
                self.class_description(instance.entity_name())?
                    .validate_for_save(instance)?;
            }
        }

        let changes = ChangeSet {
            inserted: self.inserted.iter().filter_map(|&o| self.snapshot(o)).collect(),
            updated: self.updated.iter().filter_map(|&o| self.snapshot(o)).collect(),
            deleted: self
                .deleted
                .iter()
                .filter_map(|o| self.registered.get(o).cloned())
                .collect(),
        };

        let permanent_ids = self.store.save_changes(&changes)?;

        for object in std::mem::take(&mut self.deleted) {
            self.forget_object(object);
        }
        for object in std::mem::take(&mut self.inserted) {
            let permanent = self
                .registered
                .get(&object)
                .and_then(|temporary| permanent_ids.get(temporary))
                .cloned();
            if let Some(global_id) = permanent {
                self.record_object(object, global_id)?;
            }
        }
        self.updated.clear();

        tracing::debug!(
            "Saved changes: {} inserted, {} updated, {} deleted",
            changes.inserted.len(),
            changes.updated.len(),
            changes.deleted.len()
        );
        Ok(())
    }

    fn has_changes(&self) -> bool {
        !self.inserted.is_empty() || !self.updated.is_empty() || !self.deleted.is_empty()
    }
}
