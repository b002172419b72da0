//! Models: named collections of entities loaded from model files.

mod entity;
mod model_group;

use std::collections::HashSet;
use std::fs;

use serde::{Deserialize, Serialize};

use crate::config::EoConfig;
use crate::error::EoError;

pub use entity::{Attribute, AttributeType, Entity};
pub use model_group::ModelGroup;

/// Supported model file version.
pub const MODEL_FILE_VERSION: u32 = 1;

/// Model file format.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelFile {
    /// Model file version
    pub version: u32,
    /// Declared model name, informational
    #[serde(default)]
    pub name: Option<String>,
    /// Entity definitions
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// A named set of entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    entities: Vec<Entity>,
}

impl Model {
    /// Builds a model from entity definitions, validating it.
    pub fn new(name: impl Into<String>, entities: Vec<Entity>) -> Result<Self, EoError> {
        let model = Self {
            name: name.into(),
            entities,
        };
        model.validate()?;
        Ok(model)
    }

    /// Parses a model from JSON.
    pub fn from_json_str(name: &str, json: &str) -> Result<Self, EoError> {
        let file: ModelFile = serde_json::from_str(json).map_err(|e| EoError::ModelParse {
            model: name.to_string(),
            message: e.to_string(),
        })?;

        if file.version != MODEL_FILE_VERSION {
            return Err(EoError::ModelParse {
                model: name.to_string(),
                message: format!("Unsupported model version: {}", file.version),
            });
        }

        if let Some(declared) = file.name.as_deref() {
            if declared != name {
                tracing::warn!(
                    "Model file for '{}' declares name '{}'; using '{}'",
                    name,
                    declared,
                    name
                );
            }
        }

        Self::new(name, file.entities)
    }

    /// Locates `<name>.<extension>` in the configured search paths and loads
    /// the first match.
    pub fn load(config: &EoConfig, name: &str) -> Result<Self, EoError> {
        let candidates = config.model_file_candidates(name);

        let path = candidates
            .iter()
            .find(|path| path.is_file())
            .ok_or_else(|| EoError::ModelNotFound {
                model: name.to_string(),
                searched: config.model_search_paths.clone(),
            })?;

        tracing::debug!("Loading model '{}' from {}", name, path.display());

        let contents = fs::read_to_string(path).map_err(|e| EoError::ModelParse {
            model: name.to_string(),
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;

        Self::from_json_str(name, &contents)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_named(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.name == name)
    }

    /// Checks rules that hold within a single model.
    fn validate(&self) -> Result<(), EoError> {
        let invalid = |message: String| EoError::InvalidModel {
            model: self.name.clone(),
            message,
        };

        let mut entity_names = HashSet::new();
        for entity in &self.entities {
            if entity.name.trim().is_empty() {
                return Err(invalid("entity with empty name".to_string()));
            }
            if !entity_names.insert(entity.name.as_str()) {
                return Err(invalid(format!("entity '{}' defined twice", entity.name)));
            }

            let mut attribute_names = HashSet::new();
            for attribute in &entity.attributes {
                if !attribute_names.insert(attribute.name.as_str()) {
                    return Err(invalid(format!(
                        "attribute '{}.{}' defined twice",
                        entity.name, attribute.name
                    )));
                }
                if let Some(default) = &attribute.default {
                    if attribute.attribute_type.coerce(default.clone()).is_none() {
                        return Err(invalid(format!(
                            "default of '{}.{}' is {}, expected {}",
                            entity.name,
                            attribute.name,
                            default.type_name(),
                            attribute.attribute_type.name()
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
