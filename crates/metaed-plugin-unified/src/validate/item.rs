use crate::validate::ItemSelector;
use metaed_build::plugin::{ValidateContext, Validator};
use metaed_schema::{
    failure::ValidationFailure,
    node::EntityDetails,
    resolve::Lookup,
    types::ModelType,
};

///
/// ItemMustResolve
///
/// Items of a domain, subdomain or interchange name visible entities of
/// their declared kind.
///

#[derive(Clone, Copy, Debug)]
pub struct ItemMustResolve {
    pub name: &'static str,
    pub model_types: &'static [ModelType],

    /// What an item must name, for messages.
    pub expected: &'static str,
    pub select: ItemSelector,
}

impl Validator for ItemMustResolve {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for model_type in self.model_types {
            for (_, entity) in ctx.schema.entities_of(*model_type) {
                for item in (self.select)(entity).iter().filter(|i| i.resolved.is_none()) {
                    failures.push(ValidationFailure::error(
                        self.name,
                        format!(
                            "{} {} item {} does not match any declared {}.",
                            model_type.label(),
                            entity.meta_ed_name,
                            item.meta_ed_name,
                            self.expected
                        ),
                        Some(&item.source_map),
                    ));
                }
            }
        }

        failures
    }
}

///
/// SubdomainParentDomainNameMustMatchADomain
///

#[derive(Clone, Copy, Debug)]
pub struct SubdomainParentMustResolve;

impl Validator for SubdomainParentMustResolve {
    fn name(&self) -> &'static str {
        "SubdomainParentDomainNameMustMatchADomain"
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for (r, entity) in ctx.schema.entities_of(ModelType::Subdomain) {
            let EntityDetails::Subdomain {
                parent_domain_name, ..
            } = &entity.details
            else {
                continue;
            };

            let parent = ctx.schema.resolve(
                parent_domain_name,
                ModelType::Domain,
                r.namespace,
                Lookup::Implicit,
            );
            if parent.is_none() {
                failures.push(ValidationFailure::error(
                    self.name(),
                    format!(
                        "Subdomain {} is part of {parent_domain_name}, which does not match any declared Domain.",
                        entity.meta_ed_name
                    ),
                    Some(&entity.source_map),
                ));
            }
        }

        failures
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{
        domain_items, interchange_identities,
        tests::validate,
    };
    use metaed_schema::prelude::*;

    #[test]
    fn unresolved_domain_items_fail() {
        let failures = validate(
            &ItemMustResolve {
                name: "DomainItemMustMatchTopLevelEntity",
                model_types: &[ModelType::Domain, ModelType::Subdomain],
                expected: "top level entity",
                select: domain_items,
            },
            NamespaceBuilder::core("EdFi")
                .entity(EntityBuilder::domain_entity("Student"))
                .entity(
                    EntityBuilder::domain("Enrollment")
                        .domain_item(ModelType::DomainEntity, "Student")
                        .domain_item(ModelType::Association, "Missing"),
                )
                .entity(
                    EntityBuilder::subdomain("Transcript", "Enrollment")
                        .domain_item(ModelType::Common, "Grade"),
                ),
        );

        let messages: Vec<_> = failures.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "Domain Enrollment item Missing does not match any declared top level entity.",
                "Subdomain Transcript item Grade does not match any declared top level entity.",
            ]
        );
    }

    #[test]
    fn interchange_identity_templates_are_checked() {
        let failures = validate(
            &ItemMustResolve {
                name: "InterchangeIdentityMustMatchADomainEntityOrAssociationOrSubclass",
                model_types: &[ModelType::Interchange],
                expected: "Domain Entity, Association or subclass",
                select: interchange_identities,
            },
            NamespaceBuilder::core("EdFi")
                .entity(EntityBuilder::domain_entity("School"))
                .entity(EntityBuilder::domain_entity_subclass("LocalSchool", "School"))
                .entity(
                    EntityBuilder::interchange("EducationOrganization")
                        .interchange_element(ModelType::DomainEntity, "Nowhere")
                        .identity_template(ModelType::DomainEntity, "LocalSchool"),
                ),
        );

        assert!(failures.is_empty());
    }

    #[test]
    fn subdomain_parent_must_exist() {
        let failures = validate(
            &SubdomainParentMustResolve,
            NamespaceBuilder::core("EdFi")
                .entity(EntityBuilder::domain("Enrollment"))
                .entity(EntityBuilder::subdomain("Transcript", "Enrollment"))
                .entity(EntityBuilder::subdomain("Staffing", "Human")),
        );

        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.starts_with("Subdomain Staffing"));
    }
}
