//! Object store that never reaches a database.

use std::collections::HashMap;

use eo_core::{ChangeSet, EoError, FetchSpecification, GlobalId, ObjectSnapshot, ObjectStore};

/// Coordinator with no backing database.
///
/// It exists so a mock editing context has a store to delegate to. Fetches are
/// never delegated by the mock and fail if attempted; saves are acknowledged
/// without assigning permanent ids, which the mock fabricates itself.
#[derive(Debug, Default)]
pub struct MockObjectStoreCoordinator {
    saves: usize,
}

impl MockObjectStoreCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of save requests acknowledged.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ObjectStore for MockObjectStoreCoordinator {
    fn objects_with_fetch_specification(
        &mut self,
        fetch_specification: &FetchSpecification,
    ) -> Result<Vec<ObjectSnapshot>, EoError> {
        tracing::warn!(
            "Fetch of '{}' reached the mock coordinator",
            fetch_specification.entity_name()
        );
        Err(EoError::StoreUnavailable { operation: "fetch" })
    }

    fn save_changes(&mut self, changes: &ChangeSet) -> Result<HashMap<GlobalId, GlobalId>, EoError> {
        self.saves += 1;
        tracing::debug!(
            "Mock coordinator acknowledged save: {} inserted, {} updated, {} deleted",
            changes.inserted.len(),
            changes.updated.len(),
            changes.deleted.len()
        );
        Ok(HashMap::new())
    }
}
