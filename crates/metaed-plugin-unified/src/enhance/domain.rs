use crate::data::{DOMAIN_ENTITIES, SUBDOMAINS};
use metaed_build::plugin::{EnhanceContext, Enhancer, EnhancerError};
use metaed_schema::{
    data::DataSlot,
    node::{EntityDetails, EntityRef},
    resolve::Lookup,
    types::ModelType,
};
use tracing::debug;

const WRITES: &[DataSlot] = &[DOMAIN_ENTITIES.slot(), SUBDOMAINS.slot()];

///
/// DomainItemEnhancer
///
/// Writes the resolved items of each domain and subdomain, and attaches
/// subdomains to their parent domain.
///

#[derive(Clone, Copy, Debug)]
pub struct DomainItemEnhancer;

impl Enhancer for DomainItemEnhancer {
    fn name(&self) -> &'static str {
        "DomainItemEnhancer"
    }

    fn writes(&self) -> &'static [DataSlot] {
        WRITES
    }

    fn enhance(&self, ctx: &mut EnhanceContext<'_>) -> Result<(), EnhancerError> {
        let schema = &*ctx.schema;
        let mut members: Vec<(EntityRef, Vec<EntityRef>)> = Vec::new();
        let mut parents: Vec<(EntityRef, EntityRef)> = Vec::new();

        for model_type in [ModelType::Domain, ModelType::Subdomain] {
            for (r, entity) in schema.entities_of(model_type) {
                let mut resolved: Vec<EntityRef> = Vec::new();
                for target in entity.entity_items().filter_map(|item| item.resolved) {
                    if !resolved.contains(&target) {
                        resolved.push(target);
                    }
                }
                members.push((r, resolved));

                if let EntityDetails::Subdomain {
                    parent_domain_name, ..
                } = &entity.details
                {
                    let parent = schema.resolve(
                        parent_domain_name,
                        ModelType::Domain,
                        r.namespace,
                        Lookup::Implicit,
                    );
                    if let Some(parent) = parent {
                        parents.push((parent, r));
                    }
                }
            }
        }

        debug!(
            domains = members.len(),
            subdomains = parents.len(),
            "writing domain membership"
        );

        for (r, resolved) in members {
            if let Some(entity) = ctx.schema.entity_mut(r) {
                entity.data.insert(DOMAIN_ENTITIES, resolved);
            }
        }
        for (parent, subdomain) in parents {
            if let Some(entity) = ctx.schema.entity_mut(parent) {
                entity.data.update(SUBDOMAINS, |subdomains| subdomains.push(subdomain));
            }
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::tests::enhanced;
    use metaed_schema::prelude::*;

    #[test]
    fn domains_collect_items_and_subdomains() {
        let schema = enhanced(
            &DomainItemEnhancer,
            SchemaBuilder::new().namespace(
                NamespaceBuilder::core("EdFi")
                    .entity(EntityBuilder::domain_entity("Student"))
                    .entity(EntityBuilder::association("StudentSchoolAssociation"))
                    .entity(
                        EntityBuilder::domain("Enrollment")
                            .domain_item(ModelType::DomainEntity, "Student")
                            .domain_item(ModelType::Association, "StudentSchoolAssociation")
                            .domain_item(ModelType::DomainEntity, "Student")
                            .domain_item(ModelType::DomainEntity, "Missing"),
                    )
                    .entity(
                        EntityBuilder::subdomain("Transcript", "Enrollment")
                            .domain_item(ModelType::DomainEntity, "Student"),
                    ),
            ),
        );

        let ns = schema.namespace_by_name("EdFi").unwrap();
        let domain = ns.entity(ns.lookup(ModelType::Domain, "Enrollment").unwrap()).unwrap();

        assert_eq!(domain.data.get(DOMAIN_ENTITIES).map(Vec::len), Some(2));

        let subdomains = domain.data.get(SUBDOMAINS).unwrap();
        assert_eq!(subdomains.len(), 1);
        assert_eq!(schema.entity(subdomains[0]).unwrap().meta_ed_name, "Transcript");
    }

    #[test]
    fn empty_domains_still_get_a_slot() {
        let schema = enhanced(
            &DomainItemEnhancer,
            SchemaBuilder::new().namespace(NamespaceBuilder::core("EdFi").entity(EntityBuilder::domain("Empty"))),
        );

        let ns = schema.namespace_by_name("EdFi").unwrap();
        let domain = ns.entity(ns.lookup(ModelType::Domain, "Empty").unwrap()).unwrap();

        assert_eq!(domain.data.get(DOMAIN_ENTITIES), Some(&Vec::new()));
        assert!(domain.data.get(SUBDOMAINS).is_none());
    }
}
