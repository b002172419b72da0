//! Fetch specifications.

use serde::{Deserialize, Serialize};

use crate::qualifier::Qualifier;
use crate::sort::SortOrdering;

/// Declarative query: target entity, qualifier, sort order and limit.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSpecification {
    entity_name: String,
    qualifier: Option<Qualifier>,
    sort_orderings: Vec<SortOrdering>,
    is_deep: bool,
    fetch_limit: usize,
}

impl FetchSpecification {
    /// Creates a deep, unlimited, unqualified fetch of `entity_name`.
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            qualifier: None,
            sort_orderings: Vec::new(),
            is_deep: true,
            fetch_limit: 0,
        }
    }

    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    pub fn with_sort_orderings(mut self, sort_orderings: Vec<SortOrdering>) -> Self {
        self.sort_orderings = sort_orderings;
        self
    }

    pub fn with_deep(mut self, is_deep: bool) -> Self {
        self.is_deep = is_deep;
        self
    }

    /// Sets the maximum number of objects returned; 0 means unlimited.
    pub fn with_fetch_limit(mut self, fetch_limit: usize) -> Self {
        self.fetch_limit = fetch_limit;
        self
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }

    pub fn sort_orderings(&self) -> &[SortOrdering] {
        &self.sort_orderings
    }

    /// Whether sub-entities of the target entity are included.
    pub fn is_deep(&self) -> bool {
        self.is_deep
    }

    pub fn fetch_limit(&self) -> usize {
        self.fetch_limit
    }
}

/// Named fetch specification as stored in a model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFetchSpecification {
    #[serde(default)]
    pub qualifier: Option<Qualifier>,
    #[serde(default)]
    pub sort_orderings: Vec<SortOrdering>,
    #[serde(default = "default_deep")]
    pub deep: bool,
    #[serde(default)]
    pub fetch_limit: usize,
}

fn default_deep() -> bool {
    true
}

impl StoredFetchSpecification {
    /// Binds the stored specification to an entity.
    pub fn to_fetch_specification(&self, entity_name: &str) -> FetchSpecification {
        FetchSpecification {
            entity_name: entity_name.to_string(),
            qualifier: self.qualifier.clone(),
            sort_orderings: self.sort_orderings.clone(),
            is_deep: self.deep,
            fetch_limit: self.fetch_limit,
        }
    }
}
