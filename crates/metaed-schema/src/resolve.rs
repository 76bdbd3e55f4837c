//! Cross-namespace name resolution.
//!
//! Resolution is non-transitive: an entity is visible from its own
//! namespace and from namespaces that list that namespace as a direct
//! dependency. Search order is fixed and first-match-wins, so results are
//! deterministic.

use crate::node::{EntityRef, NamespaceId, Schema};
use crate::types::ModelType;

///
/// Lookup
///
/// Which namespaces a resolution request may search.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Lookup<'a> {
    /// The requesting namespace, then each direct dependency in declared
    /// order.
    Implicit,

    /// The requesting namespace only.
    DeclaringNamespace,

    /// Exactly the named namespace, which must be the requester or one of
    /// its direct dependencies.
    Explicit(&'a str),
}

impl<'a> Lookup<'a> {
    /// Lookup for a property reference. An absent or empty namespace is
    /// implicit.
    #[must_use]
    pub fn for_reference(namespace_name: Option<&'a str>) -> Self {
        match namespace_name {
            Some(name) if !name.is_empty() => Self::Explicit(name),
            _ => Self::Implicit,
        }
    }

    /// Lookup for a base entity. An empty namespace means the declaring
    /// namespace.
    #[must_use]
    pub const fn for_base(namespace_name: &'a str) -> Self {
        if namespace_name.is_empty() {
            Self::DeclaringNamespace
        } else {
            Self::Explicit(namespace_name)
        }
    }
}

impl Schema {
    /// The named namespace if `from` may see it (itself or a direct
    /// dependency).
    #[must_use]
    pub fn visible_namespace(&self, from: NamespaceId, name: &str) -> Option<NamespaceId> {
        let requester = self.namespace(from)?;
        if requester.namespace_name == name {
            return Some(from);
        }

        requester
            .dependencies()
            .iter()
            .copied()
            .find(|dep| self.namespace(*dep).is_some_and(|ns| ns.namespace_name == name))
    }

    /// Namespaces searched for a lookup, in search order.
    #[must_use]
    pub fn search_order(&self, from: NamespaceId, lookup: Lookup<'_>) -> Vec<NamespaceId> {
        match lookup {
            Lookup::Implicit => {
                let mut order = vec![from];
                if let Some(ns) = self.namespace(from) {
                    order.extend(ns.dependencies().iter().filter(|d| **d != from));
                }
                order
            }
            Lookup::DeclaringNamespace => vec![from],
            Lookup::Explicit(name) => self.visible_namespace(from, name).into_iter().collect(),
        }
    }

    /// Resolve a name of one model type.
    #[must_use]
    pub fn resolve(
        &self,
        name: &str,
        model_type: ModelType,
        from: NamespaceId,
        lookup: Lookup<'_>,
    ) -> Option<EntityRef> {
        self.resolve_any(name, &[model_type], from, lookup)
    }

    /// Resolve a name that may be any of several model types. Namespaces
    /// are searched in order; within a namespace, types are tried in the
    /// order given.
    #[must_use]
    pub fn resolve_any(
        &self,
        name: &str,
        model_types: &[ModelType],
        from: NamespaceId,
        lookup: Lookup<'_>,
    ) -> Option<EntityRef> {
        self.search_order(from, lookup).into_iter().find_map(|ns_id| {
            let ns = self.namespace(ns_id)?;
            model_types
                .iter()
                .find_map(|ty| ns.lookup(*ty, name))
                .map(|entity| EntityRef::new(ns_id, entity))
        })
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Entity, Namespace};

    // EdFi <- TPDM <- Sample, with Sample not depending on EdFi directly.
    fn schema() -> Schema {
        let mut schema = Schema::new();

        let mut edfi = Namespace::new("EdFi");
        edfi.add_entity(Entity::new(ModelType::DomainEntity, "Student"))
            .unwrap();
        edfi.add_entity(Entity::new(ModelType::DomainEntity, "School"))
            .unwrap();
        schema.add_namespace(edfi).unwrap();

        let mut tpdm = Namespace::extension("TPDM", "TPDM");
        tpdm.dependency_names = vec!["EdFi".into()];
        tpdm.add_entity(Entity::new(ModelType::DomainEntity, "School"))
            .unwrap();
        schema.add_namespace(tpdm).unwrap();

        let mut sample = Namespace::extension("Sample", "Sample");
        sample.dependency_names = vec!["TPDM".into()];
        sample
            .add_entity(Entity::new(ModelType::DomainEntitySubclass, "Student"))
            .unwrap();
        schema.add_namespace(sample).unwrap();

        schema.initialize_namespaces().unwrap();
        schema
    }

    const EDFI: NamespaceId = NamespaceId(0);
    const TPDM: NamespaceId = NamespaceId(1);
    const SAMPLE: NamespaceId = NamespaceId(2);

    #[test]
    fn implicit_lookup_prefers_requesting_namespace() {
        let schema = schema();
        let found = schema.resolve("School", ModelType::DomainEntity, TPDM, Lookup::Implicit);

        assert_eq!(found.map(|r| r.namespace), Some(TPDM));
    }

    #[test]
    fn implicit_lookup_falls_back_to_direct_dependencies() {
        let schema = schema();
        let found = schema.resolve("Student", ModelType::DomainEntity, TPDM, Lookup::Implicit);

        assert_eq!(found.map(|r| r.namespace), Some(EDFI));
    }

    #[test]
    fn resolution_is_not_transitive() {
        let schema = schema();

        assert_eq!(
            schema.resolve("Student", ModelType::DomainEntity, SAMPLE, Lookup::Implicit),
            None
        );
        assert_eq!(
            schema.resolve(
                "Student",
                ModelType::DomainEntity,
                SAMPLE,
                Lookup::Explicit("EdFi")
            ),
            None
        );
    }

    #[test]
    fn explicit_lookup_targets_one_namespace() {
        let schema = schema();
        let found = schema.resolve("School", ModelType::DomainEntity, TPDM, Lookup::Explicit("EdFi"));

        assert_eq!(found.map(|r| r.namespace), Some(EDFI));
    }

    #[test]
    fn declaring_namespace_lookup_ignores_dependencies() {
        let schema = schema();

        assert_eq!(
            schema.resolve(
                "Student",
                ModelType::DomainEntity,
                TPDM,
                Lookup::DeclaringNamespace
            ),
            None
        );
    }

    #[test]
    fn multi_type_resolution_searches_namespaces_first() {
        let schema = schema();
        let types = [ModelType::DomainEntity, ModelType::DomainEntitySubclass];

        let found = schema.resolve_any("Student", &types, SAMPLE, Lookup::Implicit);
        assert_eq!(found.map(|r| r.namespace), Some(SAMPLE));
    }

    #[test]
    fn lookup_constructors_treat_empty_as_unqualified() {
        assert_eq!(Lookup::for_reference(None), Lookup::Implicit);
        assert_eq!(Lookup::for_reference(Some("")), Lookup::Implicit);
        assert_eq!(Lookup::for_reference(Some("EdFi")), Lookup::Explicit("EdFi"));
        assert_eq!(Lookup::for_base(""), Lookup::DeclaringNamespace);
        assert_eq!(Lookup::for_base("EdFi"), Lookup::Explicit("EdFi"));
    }

    #[test]
    fn resolution_is_repeatable() {
        let schema = schema();
        let first = schema.resolve("School", ModelType::DomainEntity, TPDM, Lookup::Implicit);

        for _ in 0..10 {
            assert_eq!(
                schema.resolve("School", ModelType::DomainEntity, TPDM, Lookup::Implicit),
                first
            );
        }
    }
}
