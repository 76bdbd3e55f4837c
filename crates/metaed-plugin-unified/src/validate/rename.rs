use metaed_build::plugin::{ValidateContext, Validator};
use metaed_schema::{
    failure::ValidationFailure,
    node::{Entity, Property},
    types::ModelType,
};

// renaming_properties
fn renaming_properties(entity: &Entity) -> impl Iterator<Item = &Property> {
    entity.properties.iter().filter(|p| p.identity_rename.is_some())
}

///
/// RenameAtMostOnce
///

#[derive(Clone, Copy, Debug)]
pub struct RenameAtMostOnce {
    pub name: &'static str,
    pub model_type: ModelType,
}

impl Validator for RenameAtMostOnce {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for (_, entity) in ctx.schema.entities_of(self.model_type) {
            let renames: Vec<&Property> = renaming_properties(entity).collect();
            if renames.len() < 2 {
                continue;
            }

            let names: Vec<String> = renames.iter().map(|p| p.full_name()).collect();
            failures.push(ValidationFailure::error(
                self.name,
                format!(
                    "{} {} has more than one identity rename: {}.",
                    self.model_type.label(),
                    entity.meta_ed_name,
                    names.join(", ")
                ),
                Some(&renames[1].source_map),
            ));
        }

        failures
    }
}

///
/// RenameMustMatchBaseIdentity
///
/// The renamed base key is a declared, not itself renamed, identity
/// property of the resolved base.
///

#[derive(Clone, Copy, Debug)]
pub struct RenameMustMatchBaseIdentity {
    pub name: &'static str,
    pub model_type: ModelType,
}

impl Validator for RenameMustMatchBaseIdentity {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for (_, entity) in ctx.schema.entities_of(self.model_type) {
            let Some(base) = entity.base_entity().and_then(|r| ctx.schema.entity(r)) else {
                continue;
            };

            for property in renaming_properties(entity) {
                let Some(rename) = &property.identity_rename else {
                    continue;
                };

                let genuine = base
                    .identity_properties()
                    .any(|bp| bp.identity_rename.is_none() && bp.full_name() == rename.base_key_name);
                if genuine {
                    continue;
                }

                failures.push(ValidationFailure::error(
                    self.name,
                    format!(
                        "{} {} renames {}, which is not an identity property of {} {}.",
                        self.model_type.label(),
                        entity.meta_ed_name,
                        rename.base_key_name,
                        base.model_type.label(),
                        base.meta_ed_name
                    ),
                    Some(&rename.source_map),
                ));
            }
        }

        failures
    }
}

///
/// DomainEntitySubclassIdentityRenameMustNotExistForMultiPropertyIdentity
///

#[derive(Clone, Copy, Debug)]
pub struct NoRenameOfMultiPropertyIdentity;

impl Validator for NoRenameOfMultiPropertyIdentity {
    fn name(&self) -> &'static str {
        "DomainEntitySubclassIdentityRenameMustNotExistForMultiPropertyIdentity"
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for (_, entity) in ctx.schema.entities_of(ModelType::DomainEntitySubclass) {
            let Some(base) = entity.base_entity().and_then(|r| ctx.schema.entity(r)) else {
                continue;
            };
            if base.identity_properties().count() < 2 {
                continue;
            }

            for property in renaming_properties(entity) {
                failures.push(ValidationFailure::error(
                    self.name(),
                    format!(
                        "Domain Entity Subclass {} renames an identity property, but base {} has a \
                         multi-property identity.",
                        entity.meta_ed_name, base.meta_ed_name
                    ),
                    Some(&property.source_map),
                ));
            }
        }

        failures
    }
}

///
/// IdentityRenameExistsOnlyIfIdentityRenameIsAllowed
///

#[derive(Clone, Copy, Debug)]
pub struct RenameOnlyWhereAllowed;

impl Validator for RenameOnlyWhereAllowed {
    fn name(&self) -> &'static str {
        "IdentityRenameExistsOnlyIfIdentityRenameIsAllowed"
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for (_, entity) in ctx.schema.entities() {
            if matches!(
                entity.model_type,
                ModelType::DomainEntitySubclass | ModelType::AssociationSubclass
            ) {
                continue;
            }

            for property in renaming_properties(entity) {
                failures.push(ValidationFailure::error(
                    self.name(),
                    format!(
                        "'renames identity property' is invalid for property {} on {} {}; \
                         only subclasses may rename.",
                        property.full_name(),
                        entity.model_type.label(),
                        entity.meta_ed_name
                    ),
                    Some(&property.source_map),
                ));
            }
        }

        failures
    }
}

///
/// TESTS
///
