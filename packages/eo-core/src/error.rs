//! Object framework error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::object::ObjectId;

/// Errors raised by models, editing contexts and their collaborators.
#[derive(Error, Debug, Clone)]
pub enum EoError {
    /// Model file could not be located in any search path
    #[error("Model '{model}' not found (searched: {})", display_paths(.searched))]
    ModelNotFound { model: String, searched: Vec<PathBuf> },

    /// Model file could not be read or parsed
    #[error("Failed to parse model '{model}': {message}")]
    ModelParse { model: String, message: String },

    /// Model parsed but is internally inconsistent
    #[error("Invalid model '{model}': {message}")]
    InvalidModel { model: String, message: String },

    /// Entity defined by more than one loaded model
    #[error("Entity '{entity}' in model '{model}' is already defined by model '{existing}'")]
    DuplicateEntity {
        entity: String,
        model: String,
        existing: String,
    },

    /// Entity not found in the model group
    #[error("Entity '{entity}' not found")]
    EntityNotFound { entity: String },

    /// Null class descriptor passed where a type was required
    #[error("Cannot create an instance for a null class.")]
    NullClassDescriptor,

    /// Type matches no entity and declares no entity name
    #[error("Cannot create an instance based on the class '{class_name}'. Please, provide an entity name instead.")]
    UnresolvableClass { class_name: String },

    /// Null or blank entity name
    #[error("Cannot create an instance for a null entity name.")]
    NullEntityName,

    /// No class description registered for the entity name
    #[error("Could not find class description for entity name '{entity}'.")]
    ClassDescriptionNotFound { entity: String },

    /// Key is not an attribute of the entity
    #[error("Entity '{entity}' has no attribute '{key}'")]
    UnknownKey { entity: String, key: String },

    /// Value type does not match the attribute type
    #[error("Type mismatch for '{entity}.{key}': expected {expected}, got {got}")]
    TypeMismatch {
        entity: String,
        key: String,
        expected: String,
        got: String,
    },

    /// Object failed validation before save
    #[error("Validation failed for '{entity}.{key}': {message}")]
    ValidationFailed {
        entity: String,
        key: String,
        message: String,
    },

    /// Object is not owned by this editing context
    #[error("Object {object} not found in editing context")]
    ObjectNotFound { object: ObjectId },

    /// Object store cannot service the operation
    #[error("Object store does not support {operation}")]
    StoreUnavailable { operation: &'static str },

    /// Fixture field could not be populated
    #[error("Failed to populate fixture field '{field}': {source}")]
    FixtureFailed {
        field: String,
        #[source]
        source: Box<EoError>,
    },
}

impl EoError {
    /// Returns true for errors caused by bad arguments to object creation.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            EoError::NullClassDescriptor
                | EoError::UnresolvableClass { .. }
                | EoError::NullEntityName
                | EoError::ClassDescriptionNotFound { .. }
        )
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
