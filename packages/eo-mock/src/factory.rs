//! Factories creating fixture objects.

use std::fmt;

use eo_core::{EoError, ObjectContext, ObjectId};

use crate::fixture::EoType;
use crate::mock_context::MockEditingContext;

/// Produces an object of a given type in a mock editing context.
pub trait EnterpriseObjectFactory: fmt::Debug {
    fn create(&self, context: &mut MockEditingContext, object_type: &EoType) -> Result<ObjectId, EoError>;
}

/// Creates objects that are already saved: permanent global id, no pending
/// changes, changes made during setup are not tracked.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyFactory;

impl EnterpriseObjectFactory for DummyFactory {
    fn create(&self, context: &mut MockEditingContext, object_type: &EoType) -> Result<ObjectId, EoError> {
        context.create_saved_object_of(Some(object_type))
    }
}

/// Creates fresh inserted objects that still have to be saved, as a
/// throwaway editing context would.
#[derive(Debug, Default, Clone, Copy)]
pub struct InsertedObjectFactory;

impl EnterpriseObjectFactory for InsertedObjectFactory {
    fn create(&self, context: &mut MockEditingContext, object_type: &EoType) -> Result<ObjectId, EoError> {
        let entity_name = context.resolve_entity_name(Some(object_type))?;
        context.create_and_insert_instance(&entity_name)
    }
}
