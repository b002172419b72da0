//! Model group: the set of models visible to an editing context.

use std::collections::{HashMap, HashSet};

use super::{Attribute, Entity, Model};
use crate::class_description::{AwakeFromInsertion, ClassDescription};
use crate::config::EoConfig;
use crate::error::EoError;
use crate::fetch::FetchSpecification;

/// Loaded models plus per-entity behavior.
///
/// Entity names are unique across the group; adding a model that redefines
/// an entity is rejected.
#[derive(Debug, Clone, Default)]
pub struct ModelGroup {
    models: Vec<Model>,
    /// Entity name to (model index, entity index)
    entity_index: HashMap<String, (usize, usize)>,
    awake_hooks: HashMap<String, AwakeFromInsertion>,
}

impl ModelGroup {
    /// Creates an empty model group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the named models from the configured search paths and validates
    /// the resulting group.
    pub fn load<S: AsRef<str>>(config: &EoConfig, model_names: &[S]) -> Result<Self, EoError> {
        let mut group = Self::new();
        for name in model_names {
            let name = name.as_ref();
            if group.model_named(name).is_some() {
                continue;
            }
            group.add_model(Model::load(config, name)?)?;
        }
        group.validate()?;
        Ok(group)
    }

    /// Adds a model. Fails if one of its entities is already defined.
    pub fn add_model(&mut self, model: Model) -> Result<(), EoError> {
        for entity in model.entities() {
            if let Some(&(existing, _)) = self.entity_index.get(&entity.name) {
                return Err(EoError::DuplicateEntity {
                    entity: entity.name.clone(),
                    model: model.name().to_string(),
                    existing: self.models[existing].name().to_string(),
                });
            }
        }

        let model_index = self.models.len();
        for (entity_index, entity) in model.entities().iter().enumerate() {
            self.entity_index
                .insert(entity.name.clone(), (model_index, entity_index));
        }
        tracing::debug!(
            "Added model '{}' with {} entities",
            model.name(),
            model.entities().len()
        );
        self.models.push(model);
        Ok(())
    }

    /// Checks cross-model rules: parents exist and inheritance is acyclic.
    pub fn validate(&self) -> Result<(), EoError> {
        for model in &self.models {
            for entity in model.entities() {
                if let Some(parent) = &entity.parent {
                    if !self.entity_index.contains_key(parent) {
                        return Err(EoError::InvalidModel {
                            model: model.name().to_string(),
                            message: format!(
                                "entity '{}' inherits from unknown entity '{}'",
                                entity.name, parent
                            ),
                        });
                    }
                }
                self.ancestry(&entity.name)?;
            }
        }
        Ok(())
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn model_named(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|model| model.name() == name)
    }

    pub fn entity_named(&self, name: &str) -> Option<&Entity> {
        let &(model, entity) = self.entity_index.get(name)?;
        self.models[model].entities().get(entity)
    }

    /// Model defining the entity.
    pub fn model_for_entity(&self, name: &str) -> Option<&Model> {
        let &(model, _) = self.entity_index.get(name)?;
        self.models.get(model)
    }

    /// All entities in load order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.models.iter().flat_map(|model| model.entities().iter())
    }

    /// Direct sub-entities in load order.
    pub fn sub_entities(&self, name: &str) -> Result<Vec<&Entity>, EoError> {
        self.require_entity(name)?;
        Ok(self
            .entities()
            .filter(|entity| entity.parent.as_deref() == Some(name))
            .collect())
    }

    /// Names of every entity inheriting from `name`, directly or not,
    /// depth first.
    pub fn all_sub_entity_names(&self, name: &str) -> Result<Vec<String>, EoError> {
        let mut names = Vec::new();
        let mut visited = HashSet::from([name.to_string()]);
        self.collect_sub_entities(name, &mut names, &mut visited)?;
        Ok(names)
    }

    fn collect_sub_entities(
        &self,
        name: &str,
        names: &mut Vec<String>,
        visited: &mut HashSet<String>,
    ) -> Result<(), EoError> {
        for sub_entity in self.sub_entities(name)? {
            if visited.insert(sub_entity.name.clone()) {
                names.push(sub_entity.name.clone());
                self.collect_sub_entities(&sub_entity.name, names, visited)?;
            }
        }
        Ok(())
    }

    /// The entity followed by its ancestors, nearest first.
    fn ancestry(&self, name: &str) -> Result<Vec<&Entity>, EoError> {
        let mut chain = vec![self.require_entity(name)?];
        let mut seen = HashSet::from([name]);

        while let Some(parent) = chain.last().copied().and_then(|entity| entity.parent.as_deref()) {
            if !seen.insert(parent) {
                let model = self
                    .model_for_entity(name)
                    .map(|model| model.name().to_string())
                    .unwrap_or_default();
                return Err(EoError::InvalidModel {
                    model,
                    message: format!("inheritance cycle through entity '{}'", parent),
                });
            }
            chain.push(self.require_entity(parent)?);
        }

        Ok(chain)
    }

    /// Attributes of an entity including inherited ones. Inherited attributes
    /// come first; a redeclared attribute replaces the inherited one in place.
    pub fn attributes_for(&self, name: &str) -> Result<Vec<Attribute>, EoError> {
        let mut attributes: Vec<Attribute> = Vec::new();
        for entity in self.ancestry(name)?.into_iter().rev() {
            for attribute in &entity.attributes {
                match attributes.iter_mut().find(|a| a.name == attribute.name) {
                    Some(existing) => *existing = attribute.clone(),
                    None => attributes.push(attribute.clone()),
                }
            }
        }
        Ok(attributes)
    }

    /// Builds the class description used to instantiate and validate
    /// objects of an entity.
    pub fn class_description_for_entity_name(&self, name: &str) -> Option<ClassDescription> {
        let attributes = self.attributes_for(name).ok()?;
        // nearest registered hook wins, so sub-entities inherit behavior
        let awake = self
            .ancestry(name)
            .ok()?
            .into_iter()
            .find_map(|entity| self.awake_hooks.get(&entity.name).copied());
        Some(ClassDescription::new(name, attributes, awake))
    }

    /// Registers initialization code run when objects of `entity_name` are
    /// inserted, after attribute defaults are applied.
    pub fn set_awake_from_insertion(
        &mut self,
        entity_name: &str,
        hook: AwakeFromInsertion,
    ) -> Result<(), EoError> {
        self.require_entity(entity_name)?;
        self.awake_hooks.insert(entity_name.to_string(), hook);
        Ok(())
    }

    /// Named fetch specification declared on an entity.
    pub fn fetch_specification_named(
        &self,
        spec_name: &str,
        entity_name: &str,
    ) -> Option<FetchSpecification> {
        self.entity_named(entity_name)?
            .fetch_specifications
            .get(spec_name)
            .map(|stored| stored.to_fetch_specification(entity_name))
    }

    fn require_entity(&self, name: &str) -> Result<&Entity, EoError> {
        self.entity_named(name).ok_or_else(|| EoError::EntityNotFound {
            entity: name.to_string(),
        })
    }
}
