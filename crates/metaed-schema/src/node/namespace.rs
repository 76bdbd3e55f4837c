use crate::{
    data::ExtensionBag,
    node::{Entity, EntityId, NamespaceId, NodeError},
    types::ModelType,
};
use serde::Serialize;
use std::collections::BTreeMap;

///
/// Namespace
///
/// A named scope of entities. Core namespaces carry no project extension;
/// extension namespaces build on one or more dependencies.
///

#[derive(Debug, Serialize)]
pub struct Namespace {
    pub namespace_name: String,
    pub project_name: String,
    pub project_version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_extension: String,

    pub is_extension: bool,

    /// Declared dependency names, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependency_names: Vec<String>,

    #[serde(skip)]
    pub(crate) id: NamespaceId,

    #[serde(skip)]
    pub(crate) dependencies: Vec<NamespaceId>,

    entities: Vec<Entity>,

    #[serde(skip)]
    entity_index: BTreeMap<ModelType, BTreeMap<String, EntityId>>,

    #[serde(skip)]
    pub data: ExtensionBag,
}

impl Namespace {
    #[must_use]
    pub fn new(namespace_name: impl Into<String>) -> Self {
        Self {
            namespace_name: namespace_name.into(),
            project_name: String::new(),
            project_version: String::new(),
            project_extension: String::new(),
            is_extension: false,
            dependency_names: Vec::new(),
            id: NamespaceId(0),
            dependencies: Vec::new(),
            entities: Vec::new(),
            entity_index: BTreeMap::new(),
            data: ExtensionBag::new(),
        }
    }

    /// An extension namespace with its project extension prefix.
    #[must_use]
    pub fn extension(namespace_name: impl Into<String>, project_extension: impl Into<String>) -> Self {
        Self {
            project_extension: project_extension.into(),
            is_extension: true,
            ..Self::new(namespace_name)
        }
    }

    #[must_use]
    pub const fn id(&self) -> NamespaceId {
        self.id
    }

    /// Resolved direct dependencies, in declaration order.
    /// Empty until the schema's namespaces are initialised.
    #[must_use]
    pub fn dependencies(&self) -> &[NamespaceId] {
        &self.dependencies
    }

    /// Register an entity. Names are unique per model type.
    pub fn add_entity(&mut self, mut entity: Entity) -> Result<EntityId, NodeError> {
        let by_name = self.entity_index.entry(entity.model_type).or_default();
        if by_name.contains_key(&entity.meta_ed_name) {
            return Err(NodeError::DuplicateEntity {
                namespace: self.namespace_name.clone(),
                model_type: entity.model_type,
                name: entity.meta_ed_name,
            });
        }

        let id = EntityId(self.entities.len());
        by_name.insert(entity.meta_ed_name.clone(), id);
        entity.namespace = self.id;
        self.entities.push(entity);

        Ok(id)
    }

    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0)
    }

    #[must_use]
    pub fn lookup(&self, model_type: ModelType, name: &str) -> Option<EntityId> {
        self.entity_index.get(&model_type)?.get(name).copied()
    }

    /// All entities in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId(i), e))
    }

    /// Entities of one kind in declaration order.
    pub fn entities_of(&self, model_type: ModelType) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities().filter(move |(_, e)| e.model_type == model_type)
    }

    pub(crate) fn entities_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.entities
            .iter_mut()
            .enumerate()
            .map(|(i, e)| (EntityId(i), e))
    }

    #[must_use]
    pub const fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

///
/// TESTS
///
