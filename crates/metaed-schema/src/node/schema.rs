use crate::{
    node::{Entity, EntityRef, Namespace, NamespaceId, NodeError, Property, PropertyRef},
    types::{ModelType, PropertyType},
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// NamespaceError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum NamespaceError {
    #[error("namespace '{namespace}' depends on unknown namespace '{dependency}'")]
    UnknownDependency {
        namespace: String,
        dependency: String,
    },

    #[error("namespace dependency cycle: {0}")]
    Cycle(String),
}

///
/// PropertyIndex
///
/// Every property in the schema grouped by property type. Rebuilt whenever
/// namespaces are initialised.
///

#[derive(Clone, Debug, Default)]
pub struct PropertyIndex {
    by_type: BTreeMap<PropertyType, Vec<PropertyRef>>,
}

impl PropertyIndex {
    #[must_use]
    pub fn get(&self, property_type: PropertyType) -> &[PropertyRef] {
        self.by_type
            .get(&property_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropertyType, &[PropertyRef])> {
        self.by_type.iter().map(|(ty, refs)| (*ty, refs.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

///
/// Schema
///
/// The namespace graph plus schema-wide indexes.
///

#[derive(Debug, Default)]
pub struct Schema {
    namespaces: Vec<Namespace>,
    by_name: BTreeMap<String, NamespaceId>,
    dependency_order: Vec<NamespaceId>,
    property_index: PropertyIndex,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_namespace(&mut self, mut namespace: Namespace) -> Result<NamespaceId, NodeError> {
        if self.by_name.contains_key(&namespace.namespace_name) {
            return Err(NodeError::DuplicateNamespace(namespace.namespace_name));
        }

        let id = NamespaceId(self.namespaces.len());
        namespace.id = id;
        for (_, entity) in namespace.entities_mut() {
            entity.namespace = id;
        }
        self.by_name.insert(namespace.namespace_name.clone(), id);
        self.namespaces.push(namespace);

        Ok(id)
    }

    #[must_use]
    pub fn namespace(&self, id: NamespaceId) -> Option<&Namespace> {
        self.namespaces.get(id.0)
    }

    pub fn namespace_mut(&mut self, id: NamespaceId) -> Option<&mut Namespace> {
        self.namespaces.get_mut(id.0)
    }

    #[must_use]
    pub fn namespace_id(&self, name: &str) -> Option<NamespaceId> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn namespace_by_name(&self, name: &str) -> Option<&Namespace> {
        self.namespace_id(name).and_then(|id| self.namespace(id))
    }

    /// Namespaces in load order.
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.iter()
    }

    pub fn namespaces_mut(&mut self) -> impl Iterator<Item = &mut Namespace> {
        self.namespaces.iter_mut()
    }

    #[must_use]
    pub const fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    /// Namespaces ordered so that dependencies precede dependents.
    /// Empty until [`Self::initialize_namespaces`] succeeds.
    #[must_use]
    pub fn dependency_order(&self) -> &[NamespaceId] {
        &self.dependency_order
    }

    #[must_use]
    pub fn entity(&self, r: EntityRef) -> Option<&Entity> {
        self.namespace(r.namespace)?.entity(r.entity)
    }

    pub fn entity_mut(&mut self, r: EntityRef) -> Option<&mut Entity> {
        self.namespace_mut(r.namespace)?.entity_mut(r.entity)
    }

    #[must_use]
    pub fn property(&self, r: PropertyRef) -> Option<&Property> {
        self.entity(r.entity)?.properties.get(r.index)
    }

    pub fn property_mut(&mut self, r: PropertyRef) -> Option<&mut Property> {
        self.entity_mut(r.entity)?.properties.get_mut(r.index)
    }

    /// Every entity, namespace by namespace in load order, then in
    /// declaration order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityRef, &Entity)> {
        self.namespaces.iter().flat_map(|ns| {
            ns.entities()
                .map(move |(id, entity)| (EntityRef::new(ns.id, id), entity))
        })
    }

    pub fn entities_of(&self, model_type: ModelType) -> impl Iterator<Item = (EntityRef, &Entity)> {
        self.entities()
            .filter(move |(_, entity)| entity.model_type == model_type)
    }

    /// Every property with its handle, in entity order then declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (PropertyRef, &Property)> {
        self.entities().flat_map(|(entity_ref, entity)| {
            entity
                .properties
                .iter()
                .enumerate()
                .map(move |(i, p)| (PropertyRef::new(entity_ref, i), p))
        })
    }

    #[must_use]
    pub const fn property_index(&self) -> &PropertyIndex {
        &self.property_index
    }

    /// Resolve declared dependencies, reject unknown ones and cycles, fix
    /// the dependency order and rebuild the property index.
    pub fn initialize_namespaces(&mut self) -> Result<(), NamespaceError> {
        // Phase 1: resolve dependency names.
        let mut resolved = Vec::with_capacity(self.namespaces.len());
        for ns in &self.namespaces {
            let mut deps = Vec::with_capacity(ns.dependency_names.len());
            for name in &ns.dependency_names {
                let id = self.namespace_id(name).ok_or_else(|| {
                    NamespaceError::UnknownDependency {
                        namespace: ns.namespace_name.clone(),
                        dependency: name.clone(),
                    }
                })?;
                if !deps.contains(&id) {
                    deps.push(id);
                }
            }
            resolved.push(deps);
        }

        // Phase 2: cycle detection and topological order.
        let order = self.topological_order(&resolved)?;

        for (ns, deps) in self.namespaces.iter_mut().zip(resolved) {
            ns.dependencies = deps;
        }
        self.dependency_order = order;
        self.rebuild_property_index();

        Ok(())
    }

    // Depth-first post-order over namespaces in load order.
    fn topological_order(&self, deps: &[Vec<NamespaceId>]) -> Result<Vec<NamespaceId>, NamespaceError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            Active,
            Done,
        }

        fn visit(
            schema: &Schema,
            deps: &[Vec<NamespaceId>],
            id: NamespaceId,
            marks: &mut [Mark],
            stack: &mut Vec<NamespaceId>,
            order: &mut Vec<NamespaceId>,
        ) -> Result<(), NamespaceError> {
            match marks[id.0] {
                Mark::Done => return Ok(()),
                Mark::Active => {
                    let start = stack.iter().position(|s| *s == id).unwrap_or(0);
                    let path: Vec<&str> = stack[start..]
                        .iter()
                        .chain(std::iter::once(&id))
                        .map(|s| schema.namespaces[s.0].namespace_name.as_str())
                        .collect();

                    return Err(NamespaceError::Cycle(path.join(" -> ")));
                }
                Mark::Unvisited => {}
            }

            marks[id.0] = Mark::Active;
            stack.push(id);
            for dep in &deps[id.0] {
                visit(schema, deps, *dep, marks, stack, order)?;
            }
            stack.pop();
            marks[id.0] = Mark::Done;
            order.push(id);

            Ok(())
        }

        let mut marks = vec![Mark::Unvisited; self.namespaces.len()];
        let mut stack = Vec::new();
        let mut order = Vec::with_capacity(self.namespaces.len());
        for i in 0..self.namespaces.len() {
            visit(self, deps, NamespaceId(i), &mut marks, &mut stack, &mut order)?;
        }

        Ok(order)
    }

    pub fn rebuild_property_index(&mut self) {
        let mut by_type: BTreeMap<PropertyType, Vec<PropertyRef>> = BTreeMap::new();
        for (r, property) in self.properties() {
            by_type.entry(property.property_type).or_default().push(r);
        }

        self.property_index = PropertyIndex { by_type };
    }

    /// Set the dependency list of a namespace from configuration before
    /// initialisation.
    pub fn set_dependency_names(&mut self, id: NamespaceId, names: Vec<String>) -> Result<(), NodeError> {
        let ns = self
            .namespace_mut(id)
            .ok_or(NodeError::NamespaceOutOfRange(id))?;
        ns.dependency_names = names;

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn namespace(name: &str, deps: &[&str]) -> Namespace {
        let mut ns = Namespace::new(name);
        ns.dependency_names = deps.iter().map(ToString::to_string).collect();
        ns
    }

    fn schema(layout: &[(&str, &[&str])]) -> Schema {
        let mut schema = Schema::new();
        for (name, deps) in layout {
            schema.add_namespace(namespace(name, deps)).unwrap();
        }
        schema
    }

    #[test]
    fn duplicate_namespace_names_are_rejected() {
        let mut schema = Schema::new();
        schema.add_namespace(Namespace::new("EdFi")).unwrap();

        assert_eq!(
            schema.add_namespace(Namespace::new("EdFi")),
            Err(NodeError::DuplicateNamespace("EdFi".into()))
        );
    }

    #[test]
    fn dependencies_resolve_in_declared_order() {
        let mut schema = schema(&[("EdFi", &[]), ("TPDM", &["EdFi"]), ("Sample", &["TPDM", "EdFi"])]);
        schema.initialize_namespaces().unwrap();

        let sample = schema.namespace_by_name("Sample").unwrap();
        assert_eq!(sample.dependencies(), &[NamespaceId(1), NamespaceId(0)]);
    }

    #[test]
    fn dependency_order_puts_dependencies_first() {
        let mut schema = schema(&[("Sample", &["EdFi"]), ("EdFi", &[])]);
        schema.initialize_namespaces().unwrap();

        assert_eq!(schema.dependency_order(), &[NamespaceId(1), NamespaceId(0)]);
    }

    #[test]
    fn unknown_dependency_is_reported() {
        let mut schema = schema(&[("Sample", &["EdFi"])]);

        assert_eq!(
            schema.initialize_namespaces(),
            Err(NamespaceError::UnknownDependency {
                namespace: "Sample".into(),
                dependency: "EdFi".into(),
            })
        );
    }

    #[test]
    fn cycles_are_reported_with_their_path() {
        let mut schema = schema(&[("A", &["B"]), ("B", &["C"]), ("C", &["A"])]);

        assert_eq!(
            schema.initialize_namespaces(),
            Err(NamespaceError::Cycle("A -> B -> C -> A".into()))
        );
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let mut schema = schema(&[("A", &["A"])]);

        assert!(matches!(
            schema.initialize_namespaces(),
            Err(NamespaceError::Cycle(_))
        ));
    }
}
