//! Object store interface behind an editing context.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::EoError;
use crate::fetch::FetchSpecification;
use crate::global_id::GlobalId;
use crate::value::Value;

/// State of one object as exchanged with a store.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSnapshot {
    pub global_id: GlobalId,
    pub entity_name: String,
    pub values: BTreeMap<String, Value>,
}

/// Pending changes handed to a store on save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// New objects, identified by temporary global ids
    pub inserted: Vec<ObjectSnapshot>,
    pub updated: Vec<ObjectSnapshot>,
    pub deleted: Vec<GlobalId>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

/// Backing store of an editing context.
pub trait ObjectStore: fmt::Debug {
    /// Returns snapshots of the objects matching the fetch specification.
    fn objects_with_fetch_specification(
        &mut self,
        fetch_specification: &FetchSpecification,
    ) -> Result<Vec<ObjectSnapshot>, EoError>;

    /// Commits the changes. Returns the permanent global id assigned to each
    /// inserted object, keyed by its temporary id.
    fn save_changes(&mut self, changes: &ChangeSet) -> Result<HashMap<GlobalId, GlobalId>, EoError>;
}
