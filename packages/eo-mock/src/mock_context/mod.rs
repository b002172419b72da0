//! Mock editing context: an editing context that never touches a database.
//!
//! Objects created through [`MockEditingContext::create_saved_object`] look as
//! if they were fetched from a database: they carry a permanent global id and
//! changes made to them are not tracked. Fetches are answered from the objects
//! registered in memory, and saves hand out fabricated permanent ids.

use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

use eo_core::{
    sort_by_orderings, EditingContext, EnterpriseObject, EoConfig, EoError, FetchSpecification,
    GlobalId, ModelGroup, ObjectContext, ObjectEditor, ObjectId, ObjectStore, Qualifier, Value,
    ENTITY_NAME_KEY,
};

use crate::coordinator::MockObjectStoreCoordinator;
use crate::factory::{DummyFactory, EnterpriseObjectFactory, InsertedObjectFactory};
use crate::fixture::{EoClass, EoType, FixtureMarker, TestTarget};
use crate::rule::TestRule;

#[derive(Debug, Clone)]
struct FixtureFactories {
    dummy: Rc<dyn EnterpriseObjectFactory>,
    under_test: Rc<dyn EnterpriseObjectFactory>,
}

impl FixtureFactories {
    fn for_marker(&self, marker: FixtureMarker) -> Rc<dyn EnterpriseObjectFactory> {
        match marker {
            FixtureMarker::Dummy => Rc::clone(&self.dummy),
            FixtureMarker::UnderTest => Rc::clone(&self.under_test),
        }
    }
}

impl Default for FixtureFactories {
    fn default() -> Self {
        Self {
            dummy: Rc::new(DummyFactory),
            under_test: Rc::new(InsertedObjectFactory),
        }
    }
}

/// Editing context for unit tests, served entirely from memory.
#[derive(Debug)]
pub struct MockEditingContext {
    ec: EditingContext,
    global_fake_id: i64,
    ignored_objects: HashSet<ObjectId>,
    factories: FixtureFactories,
}

impl MockEditingContext {
    /// Creates a mock context over the named models, located through
    /// [`EoConfig::from_env`].
    ///
    /// # Errors
    /// Returns the model group's load error when a model is missing, malformed
    /// or inconsistent.
    pub fn new<S: AsRef<str>>(model_names: &[S]) -> Result<Self, EoError> {
        Self::with_config(EoConfig::from_env(), model_names)
    }

    /// Creates a mock context over the named models using `config`.
    pub fn with_config<S: AsRef<str>>(config: EoConfig, model_names: &[S]) -> Result<Self, EoError> {
        let store = Box::new(MockObjectStoreCoordinator::new());
        let ec = EditingContext::with_models(store, config, model_names)?;
        Ok(Self::from_editing_context(ec))
    }

    /// Creates a mock context over an already built model group and a custom
    /// store. Only saves ever reach the store.
    pub fn with_store(store: Box<dyn ObjectStore>, model_group: ModelGroup) -> Self {
        Self::from_editing_context(EditingContext::new(store, model_group, EoConfig::default()))
    }

    fn from_editing_context(ec: EditingContext) -> Self {
        Self {
            ec,
            global_fake_id: 0,
            ignored_objects: HashSet::new(),
            factories: FixtureFactories::default(),
        }
    }

    /// Replaces the factory used for fixture fields carrying `marker`.
    pub fn with_factory<F>(mut self, marker: FixtureMarker, factory: F) -> Self
    where
        F: EnterpriseObjectFactory + 'static,
    {
        let factory: Rc<dyn EnterpriseObjectFactory> = Rc::new(factory);
        match marker {
            FixtureMarker::Dummy => self.factories.dummy = factory,
            FixtureMarker::UnderTest => self.factories.under_test = factory,
        }
        self
    }

    /// The wrapped editing context, for inspecting registrations and pending
    /// changes.
    pub fn editing_context(&self) -> &EditingContext {
        &self.ec
    }

    pub fn model_group_mut(&mut self) -> &mut ModelGroup {
        self.ec.model_group_mut()
    }

    /// Whether change notifications for `object` are being discarded.
    pub fn is_ignored(&self, object: ObjectId) -> bool {
        self.ignored_objects.contains(&object)
    }

    pub fn object(&self, object: ObjectId) -> Option<&EnterpriseObject> {
        self.ec.object(object)
    }

    fn create_permanent_global_fake_id(&mut self, entity_name: &str) -> GlobalId {
        self.global_fake_id += 1;
        GlobalId::permanent(entity_name, self.global_fake_id)
    }

    /// Resolves the entity for a type: an entity named like the type wins,
    /// then the type's declared entity name.
    pub fn resolve_entity_name(&self, object_type: Option<&EoType>) -> Result<String, EoError> {
        let object_type = object_type.ok_or(EoError::NullClassDescriptor)?;
        let simple_name = object_type.simple_name();

        if self.ec.model_group().entity_named(simple_name).is_some() {
            return Ok(simple_name.to_string());
        }

        object_type
            .entity_name()
            .map(str::to_string)
            .ok_or_else(|| EoError::UnresolvableClass {
                class_name: simple_name.to_string(),
            })
    }

    /// Creates a saved object of the entity resolved for `object_type`.
    ///
    /// # Errors
    /// `NullClassDescriptor` for `None`, `UnresolvableClass` when no entity
    /// can be found for the type, otherwise as [`Self::create_saved_object`].
    pub fn create_saved_object_of(&mut self, object_type: Option<&EoType>) -> Result<ObjectId, EoError> {
        let entity_name = self.resolve_entity_name(object_type)?;
        self.create_saved_object(&entity_name)
    }

    /// Typed form of [`Self::create_saved_object_of`].
    pub fn create_saved<T: EoClass>(&mut self) -> Result<T, EoError> {
        let object = self.create_saved_object_of(Some(&EoType::of::<T>()))?;
        Ok(T::from_object(object))
    }

    /// Creates an object of `entity_name` that looks as if it had already
    /// been saved.
    ///
    /// # Errors
    /// `NullEntityName` for a blank name and `ClassDescriptionNotFound` for
    /// an entity no loaded model defines.
    pub fn create_saved_object(&mut self, entity_name: &str) -> Result<ObjectId, EoError> {
        if entity_name.trim().is_empty() {
            return Err(EoError::NullEntityName);
        }

        let object = self.ec.instantiate(entity_name)?;
        self.insert_saved_object(object)?;
        Ok(object)
    }

    /// Creates a bare instance of `entity_name` owned by this context but not
    /// yet registered in it.
    pub fn instantiate(&mut self, entity_name: &str) -> Result<ObjectId, EoError> {
        self.ec.instantiate(entity_name)
    }

    /// Registers `object` under a fabricated permanent global id, as if it had
    /// been fetched. Changes to the object are not tracked.
    pub fn insert_saved_object(&mut self, object: ObjectId) -> Result<(), EoError> {
        let description = self.ec.class_description_for_object(object)?;

        self.ignored_objects.insert(object);

        let global_id = self.create_permanent_global_fake_id(description.entity_name());
        self.ec.record_object(object, global_id.clone())?;

        // awake hooks see a fresh object, so they run under a temporary id
        let temporary = self.ec.new_temporary_global_id();
        self.ec.assign_global_id(object, temporary)?;
        if let Err(error) = description.awake_object_from_insertion(self, object) {
            self.ignored_objects.remove(&object);
            self.ec.forget_object(object);
            return Err(error);
        }

        self.ec.assign_global_id(object, global_id.clone())?;

        tracing::debug!("Inserted saved object {} as {}", object, global_id);
        Ok(())
    }
}

impl ObjectEditor for MockEditingContext {
    fn value_for_key(&self, object: ObjectId, key: &str) -> Result<Value, EoError> {
        self.ec.value_for_key(object, key)
    }

    fn take_value_for_key(&mut self, object: ObjectId, key: &str, value: Value) -> Result<(), EoError> {
        let value = self
            .ec
            .class_description_for_object(object)?
            .validate_value(key, value)?;
        self.object_will_change(object);
        self.ec.take_stored_value_for_key(object, key, value)
    }

    fn object_will_change(&mut self, object: ObjectId) {
        if !self.ignored_objects.contains(&object) {
            self.ec.object_will_change(object);
        }
    }
}

impl ObjectContext for MockEditingContext {
    fn model_group(&self) -> &ModelGroup {
        self.ec.model_group()
    }

    fn create_and_insert_instance(&mut self, entity_name: &str) -> Result<ObjectId, EoError> {
        self.ec.create_and_insert_instance(entity_name)
    }

    fn insert_object(&mut self, object: ObjectId) -> Result<(), EoError> {
        self.ec.insert_object(object)
    }

    fn delete_object(&mut self, object: ObjectId) -> Result<(), EoError> {
        self.ec.delete_object(object)
    }

    fn global_id_for_object(&self, object: ObjectId) -> Option<&GlobalId> {
        self.ec.global_id_for_object(object)
    }

    fn object_for_global_id(&self, global_id: &GlobalId) -> Option<ObjectId> {
        self.ec.object_for_global_id(global_id)
    }

    /// Answers the fetch from the registered objects; the store is never
    /// queried.
    fn objects_with_fetch_specification(
        &mut self,
        fetch_specification: &FetchSpecification,
    ) -> Result<Vec<ObjectId>, EoError> {
        let entity_name = fetch_specification.entity_name();

        let mut qualifier = Qualifier::is(ENTITY_NAME_KEY, entity_name);
        if fetch_specification.is_deep() {
            for sub_entity in self.ec.model_group().sub_entities(entity_name)? {
                qualifier = qualifier.or(Qualifier::is(ENTITY_NAME_KEY, sub_entity.name.as_str()));
            }
        }
        if let Some(spec_qualifier) = fetch_specification.qualifier() {
            qualifier = qualifier.and(spec_qualifier.clone());
        }

        let deleted: BTreeSet<ObjectId> = self.ec.deleted_objects().into_iter().collect();
        let mut available: Vec<(ObjectId, &EnterpriseObject)> = self
            .ec
            .registered_objects()
            .into_iter()
            .filter(|object| !deleted.contains(object))
            .filter_map(|object| self.ec.object(object).map(|instance| (object, instance)))
            .filter(|(_, instance)| qualifier.evaluate_with_object(*instance))
            .collect();

        sort_by_orderings(&mut available, fetch_specification.sort_orderings(), |entry| entry.1);

        if fetch_specification.fetch_limit() > 0 {
            available.truncate(fetch_specification.fetch_limit());
        }

        tracing::debug!(
            "Fetched {} '{}' objects from memory (qualifier: {})",
            available.len(),
            entity_name,
            qualifier
        );
        Ok(available.into_iter().map(|(object, _)| object).collect())
    }

    /// Saves through the wrapped context, then gives every newly inserted
    /// object a fabricated permanent id.
    fn save_changes(&mut self) -> Result<(), EoError> {
        let deleted: BTreeSet<ObjectId> = self.ec.deleted_objects().into_iter().collect();
        let inserted: Vec<ObjectId> = self
            .ec
            .inserted_objects()
            .into_iter()
            .filter(|object| !deleted.contains(object))
            .collect();

        self.ec.save_changes()?;

        for object in inserted {
            let entity_name = self.ec.entity_name_for_object(object)?.to_string();
            self.ec.forget_object(object);
            let global_id = self.create_permanent_global_fake_id(&entity_name);
            self.ec.record_object(object, global_id)?;
        }
        Ok(())
    }

    fn has_changes(&self) -> bool {
        self.ec.has_changes()
    }
}

impl TestRule for MockEditingContext {
    fn before(&mut self, target: &mut dyn TestTarget) -> Result<(), EoError> {
        self.ec.reset();
        tracing::debug!(
            "Mock editing context ready with models: {}",
            self.ec
                .model_group()
                .models()
                .iter()
                .map(|model| model.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        for mut field in target.fixture_fields() {
            let factory = self.factories.for_marker(field.marker());
            let object = factory
                .create(self, &field.declared_type())
                .map_err(|source| EoError::FixtureFailed {
                    field: field.name().to_string(),
                    source: Box::new(source),
                })?;
            field.fill(object);
            tracing::debug!("Populated fixture field '{}' with {}", field.name(), object);
        }
        Ok(())
    }

    fn after(&mut self, target: &mut dyn TestTarget) {
        self.ignored_objects.clear();
        for mut field in target.fixture_fields() {
            field.clear();
        }
        self.ec.reset();
    }
}
