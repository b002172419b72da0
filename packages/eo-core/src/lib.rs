//! Object framework for enterprise objects.
//!
//! Provides models and model groups, class descriptions, key-value coding,
//! qualifiers, sort orderings, fetch specifications and an editing context
//! that tracks changes over a pluggable object store.

pub mod class_description;
pub mod config;
pub mod context;
pub mod editing_context;
pub mod error;
pub mod fetch;
pub mod global_id;
pub mod model;
pub mod object;
pub mod qualifier;
pub mod sort;
pub mod store;
pub mod value;

pub use class_description::{AwakeFromInsertion, ClassDescription};
pub use config::EoConfig;
pub use context::{ObjectContext, ObjectEditor};
pub use editing_context::EditingContext;
pub use error::EoError;
pub use fetch::FetchSpecification;
pub use global_id::GlobalId;
pub use model::{Attribute, AttributeType, Entity, Model, ModelGroup};
pub use object::{EnterpriseObject, KeyValueCoding, ObjectId, ENTITY_NAME_KEY};
pub use qualifier::{Qualifier, Selector};
pub use sort::{sort_by_orderings, SortOrdering, SortSelector};
pub use store::{ChangeSet, ObjectSnapshot, ObjectStore};
pub use value::Value;
