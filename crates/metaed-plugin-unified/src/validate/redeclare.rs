use crate::lineage::base_chain;
use metaed_build::plugin::{ValidateContext, Validator};
use metaed_schema::{
    failure::ValidationFailure,
    node::{Entity, EntityRef, Property},
    types::{ModelType, PropertyType},
};

///
/// NoRedeclaration
///
/// A subclass or extension may not redeclare a property its base chain
/// already has. Each duplicate gets its own failure, at its own source
/// position, naming every duplicate of the entity.
///

#[derive(Clone, Copy, Debug)]
pub struct NoRedeclaration {
    pub name: &'static str,
    pub model_type: ModelType,
}

impl Validator for NoRedeclaration {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for (_, entity) in ctx.schema.entities_of(self.model_type) {
            let chain = base_chain(ctx.schema, entity);
            let Some((_, base)) = chain.first() else {
                continue;
            };

            let duplicates: Vec<&Property> = entity
                .properties
                .iter()
                .filter(|p| !p.is_extension_override)
                .filter(|p| {
                    let name = p.full_name();
                    chain
                        .iter()
                        .any(|(_, ancestor)| ancestor.properties.iter().any(|bp| bp.full_name() == name))
                })
                .collect();

            if duplicates.is_empty() {
                continue;
            }
            let names = duplicates.iter().map(|p| p.full_name()).collect::<Vec<_>>().join(", ");

            for duplicate in duplicates {
                failures.push(ValidationFailure::error(
                    self.name,
                    format!(
                        "{} {} based on {} redeclares base properties: {names}.",
                        self.model_type.label(),
                        entity.meta_ed_name,
                        base.meta_ed_name,
                    ),
                    Some(&duplicate.source_map),
                ));
            }
        }

        failures
    }
}

///
/// ExtensionOverrideRule
///
/// `common extension` overrides are valid only on domain entity and
/// association extensions, must match a common property of the base and
/// must keep that property's cardinality.
///

#[derive(Clone, Copy, Debug)]
pub struct ExtensionOverrideRule;

impl ExtensionOverrideRule {
    // base_property
    fn base_property<'a>(chain: &[(EntityRef, &'a Entity)], name: &str) -> Option<&'a Property> {
        chain.iter().find_map(|(_, ancestor)| {
            ancestor
                .properties
                .iter()
                .find(|p| p.property_type == PropertyType::Common && p.full_name() == name)
        })
    }
}

impl Validator for ExtensionOverrideRule {
    fn name(&self) -> &'static str {
        "CommonPropertyWithExtensionOverrideRestrictedToDomainEntityAndAssociationExtensionsAndMaintainsCardinality"
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for (_, entity) in ctx.schema.entities() {
            let overrides = entity
                .properties
                .iter()
                .filter(|p| p.is_extension_override && p.property_type == PropertyType::Common);

            for property in overrides {
                let allowed = matches!(
                    entity.model_type,
                    ModelType::DomainEntityExtension | ModelType::AssociationExtension
                );
                if !allowed {
                    failures.push(ValidationFailure::error(
                        self.name(),
                        format!(
                            "'common extension' is only valid for properties on Domain Entity Extension \
                             and Association Extension, not on {} {}.",
                            entity.model_type.label(),
                            entity.meta_ed_name
                        ),
                        Some(&property.source_map),
                    ));
                    continue;
                }

                let chain = base_chain(ctx.schema, entity);
                let Some((_, base)) = chain.first() else {
                    continue;
                };

                let name = property.full_name();
                match Self::base_property(&chain, &name) {
                    None => failures.push(ValidationFailure::error(
                        self.name(),
                        format!(
                            "'common extension' property {name} does not match a common property on base {}.",
                            base.meta_ed_name
                        ),
                        Some(&property.source_map),
                    )),
                    Some(original) if original.cardinality != property.cardinality => {
                        failures.push(ValidationFailure::error(
                            self.name(),
                            format!(
                                "'common extension' property {name} must keep the {} cardinality of \
                                 the property it overrides, but is {}.",
                                original.cardinality.label(),
                                property.cardinality.label()
                            ),
                            Some(&property.source_map),
                        ));
                    }
                    Some(_) => {}
                }
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
    use crate::validate::tests::validate;
    use metaed_schema::prelude::*;

    const SUBCLASS_RULE: NoRedeclaration = NoRedeclaration {
        name: "DomainEntitySubclassMustNotRedeclareProperties",
        model_type: ModelType::DomainEntitySubclass,
    };

    fn core_with(entity: EntityBuilder) -> NamespaceBuilder {
        NamespaceBuilder::core("EdFi")
            .entity(EntityBuilder::common("Address").property(PropertyBuilder::string("City").identity()))
            .entity(
                EntityBuilder::domain_entity("EducationOrganization")
                    .property(PropertyBuilder::integer("EducationOrganizationId").identity())
                    .property(PropertyBuilder::string("NameOfInstitution"))
                    .property(PropertyBuilder::string("WebSite").optional())
                    .property(PropertyBuilder::common("Address").required_collection()),
            )
            .entity(entity)
    }

    #[test]
    fn one_duplicate_fires_once() {
        let failures = validate(
            &SUBCLASS_RULE,
            core_with(
                EntityBuilder::domain_entity_subclass("School", "EducationOrganization")
                    .property(PropertyBuilder::string("NameOfInstitution"))
                    .property(PropertyBuilder::integer("SchoolId")),
            ),
        );

        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures[0].message,
            "Domain Entity Subclass School based on EducationOrganization redeclares base \
             properties: NameOfInstitution."
        );
    }

    #[test]
    fn each_duplicate_fires_at_its_own_position() {
        let failures = validate(
            &SUBCLASS_RULE,
            core_with(
                EntityBuilder::domain_entity_subclass("School", "EducationOrganization")
                    .property(PropertyBuilder::string("NameOfInstitution"))
                    .property(PropertyBuilder::integer("SchoolId"))
                    .property(PropertyBuilder::string("WebSite")),
            ),
        );

        assert_eq!(failures.len(), 2);
        assert!(failures.iter().all(|f| f.message.ends_with("NameOfInstitution, WebSite.")));
        let lines: Vec<_> = failures.iter().map(|f| f.source_map.as_ref().unwrap().line).collect();
        assert!(lines[0] < lines[1]);
    }

    #[test]
    fn extension_duplicates_fire_once_each() {
        let rule = NoRedeclaration {
            name: "DomainEntityExtensionMustNotRedeclareProperties",
            model_type: ModelType::DomainEntityExtension,
        };
        let failures = validate(
            &rule,
            core_with(
                EntityBuilder::domain_entity_extension("EducationOrganization")
                    .property(PropertyBuilder::string("NameOfInstitution"))
                    .property(PropertyBuilder::string("WebSite"))
                    .property(PropertyBuilder::string("Motto")),
            ),
        );

        assert_eq!(failures.len(), 2);
        assert_eq!(
            failures[0].message,
            "Domain Entity Extension EducationOrganization based on EducationOrganization \
             redeclares base properties: NameOfInstitution, WebSite."
        );
    }

    #[test]
    fn role_named_properties_are_distinct() {
        let failures = validate(
            &SUBCLASS_RULE,
            core_with(
                EntityBuilder::domain_entity_subclass("School", "EducationOrganization")
                    .property(PropertyBuilder::string("WebSite").role_name("Secondary")),
            ),
        );

        assert!(failures.is_empty());
    }

    #[test]
    fn override_keeping_cardinality_passes() {
        let failures = validate(
            &ExtensionOverrideRule,
            core_with(
                EntityBuilder::domain_entity_extension("EducationOrganization").property(
                    PropertyBuilder::common("Address")
                        .extension_override()
                        .required_collection(),
                ),
            ),
        );

        assert!(failures.is_empty());
    }

    #[test]
    fn override_changing_cardinality_reports_cardinality() {
        let failures = validate(
            &ExtensionOverrideRule,
            core_with(
                EntityBuilder::domain_entity_extension("EducationOrganization")
                    .property(PropertyBuilder::common("Address").extension_override().optional()),
            ),
        );

        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures[0].message,
            "'common extension' property Address must keep the required collection cardinality \
             of the property it overrides, but is optional."
        );
    }

    #[test]
    fn override_without_base_property_reports_missing_base() {
        let failures = validate(
            &ExtensionOverrideRule,
            core_with(
                EntityBuilder::domain_entity_extension("EducationOrganization")
                    .property(PropertyBuilder::common("Address").role_name("Home").extension_override()),
            ),
        );

        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.contains("does not match a common property"));
    }

    #[test]
    fn override_outside_extensions_fails() {
        let failures = validate(
            &ExtensionOverrideRule,
            core_with(
                EntityBuilder::domain_entity("Course")
                    .property(PropertyBuilder::common("Address").extension_override()),
            ),
        );

        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.starts_with("'common extension' is only valid"));
    }
}
