use crate::{
    data::{IDENTITY, IdentityProperty},
    lineage::base_chain,
};
use metaed_build::plugin::{EnhanceContext, Enhancer, EnhancerError};
use metaed_schema::{
    data::DataSlot,
    node::{Entity, EntityRef, PropertyRef, Schema},
};
use tracing::debug;

const WRITES: &[DataSlot] = &[IDENTITY.slot()];

///
/// IdentityPropertyEnhancer
///
/// Writes the effective identity of every identity-bearing entity.
/// Subclasses inherit their base identity, with a renamed member replacing
/// the base member it names and other identity properties appended.
///

#[derive(Clone, Copy, Debug)]
pub struct IdentityPropertyEnhancer;

impl Enhancer for IdentityPropertyEnhancer {
    fn name(&self) -> &'static str {
        "IdentityPropertyEnhancer"
    }

    fn writes(&self) -> &'static [DataSlot] {
        WRITES
    }

    fn enhance(&self, ctx: &mut EnhanceContext<'_>) -> Result<(), EnhancerError> {
        let schema = &*ctx.schema;
        let identities: Vec<(EntityRef, Vec<IdentityProperty>)> = schema
            .entities()
            .filter(|(_, entity)| entity.model_type.has_identity())
            .map(|(r, entity)| (r, effective_identity(schema, r, entity)))
            .collect();

        debug!(entities = identities.len(), "writing effective identities");

        for (r, identity) in identities {
            if let Some(entity) = ctx.schema.entity_mut(r) {
                entity.data.insert(IDENTITY, identity);
            }
        }

        Ok(())
    }
}

// Root-most base first, then each descendant down to `entity`.
fn effective_identity(schema: &Schema, r: EntityRef, entity: &Entity) -> Vec<IdentityProperty> {
    let mut lineage = base_chain(schema, entity);
    lineage.reverse();
    lineage.push((r, entity));

    let mut identity: Vec<IdentityProperty> = Vec::new();
    for (owner, member) in lineage {
        for (index, property) in member
            .properties
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_part_of_identity)
        {
            let next = IdentityProperty {
                name: property.full_name(),
                property_type: property.property_type,
                source: PropertyRef {
                    entity: owner,
                    index,
                },
                referenced_entity: property.referenced_entity,
            };

            let renamed = property
                .identity_rename
                .as_ref()
                .and_then(|rename| identity.iter().position(|m| m.name == rename.base_key_name));
            match renamed {
                Some(at) => identity[at] = next,
                None => identity.push(next),
            }
        }
    }

    identity
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::tests::enhanced;
    use metaed_schema::prelude::*;

    fn identity_of<'a>(schema: &'a Schema, ty: ModelType, name: &str) -> Vec<&'a str> {
        let ns = schema.namespace_by_name("EdFi").unwrap();
        let entity = ns.entity(ns.lookup(ty, name).unwrap()).unwrap();

        entity
            .data
            .get(IDENTITY)
            .unwrap()
            .iter()
            .map(|m| m.name.as_str())
            .collect()
    }

    #[test]
    fn subclass_renames_replace_base_members() {
        let schema = enhanced(
            &IdentityPropertyEnhancer,
            SchemaBuilder::new().namespace(
                NamespaceBuilder::core("EdFi")
                    .entity(
                        EntityBuilder::abstract_entity("EducationOrganization")
                            .property(PropertyBuilder::integer("EducationOrganizationId").identity())
                            .property(PropertyBuilder::string("NameOfInstitution")),
                    )
                    .entity(
                        EntityBuilder::domain_entity_subclass("School", "EducationOrganization")
                            .property(
                                PropertyBuilder::integer("SchoolId")
                                    .identity_rename("EducationOrganizationId"),
                            ),
                    ),
            ),
        );

        assert_eq!(
            identity_of(&schema, ModelType::DomainEntity, "EducationOrganization"),
            ["EducationOrganizationId"]
        );
        assert_eq!(
            identity_of(&schema, ModelType::DomainEntitySubclass, "School"),
            ["SchoolId"]
        );
    }

    #[test]
    fn role_names_and_references_are_kept() {
        let schema = enhanced(
            &IdentityPropertyEnhancer,
            SchemaBuilder::new().namespace(
                NamespaceBuilder::core("EdFi")
                    .entity(
                        EntityBuilder::domain_entity("Student")
                            .property(PropertyBuilder::string("StudentUniqueId").identity()),
                    )
                    .entity(
                        EntityBuilder::association("StudentSchoolAssociation")
                            .property(PropertyBuilder::domain_entity("Student").identity())
                            .property(PropertyBuilder::date("BeginDate").role_name("Entry").identity()),
                    ),
            ),
        );

        assert_eq!(
            identity_of(&schema, ModelType::Association, "StudentSchoolAssociation"),
            ["Student", "EntryBeginDate"]
        );

        let ns = schema.namespace_by_name("EdFi").unwrap();
        let assoc_id = ns.lookup(ModelType::Association, "StudentSchoolAssociation").unwrap();
        let assoc = ns.entity(assoc_id).unwrap();
        let student = &assoc.data.get(IDENTITY).unwrap()[0];
        assert!(student.referenced_entity.is_some());
    }

    #[test]
    fn kinds_without_identity_get_no_slot() {
        let schema = enhanced(
            &IdentityPropertyEnhancer,
            SchemaBuilder::new()
                .namespace(NamespaceBuilder::core("EdFi").entity(EntityBuilder::descriptor("GradeLevel"))),
        );

        assert!(schema.entities().all(|(_, e)| !e.data.contains(IDENTITY.slot())));
    }
}
