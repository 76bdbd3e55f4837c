use metaed_build::plugin::{ValidateContext, Validator};
use metaed_schema::{failure::ValidationFailure, types::ModelType};

///
/// IdentityRequired
///
/// Every entity of one kind declares at least one identity property.
///

#[derive(Clone, Copy, Debug)]
pub struct IdentityRequired {
    pub name: &'static str,
    pub model_type: ModelType,
}

impl Validator for IdentityRequired {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        ctx.schema
            .entities_of(self.model_type)
            .filter(|(_, entity)| entity.identity_properties().next().is_none())
            .map(|(_, entity)| {
                ValidationFailure::error(
                    self.name,
                    format!(
                        "{} {} does not have an identity property.",
                        self.model_type.label(),
                        entity.meta_ed_name
                    ),
                    Some(&entity.source_map),
                )
            })
            .collect()
    }
}

///
/// IdentityExistsOnlyIfIdentityIsAllowed
///

#[derive(Clone, Copy, Debug)]
pub struct IdentityOnlyWhereAllowed;

impl Validator for IdentityOnlyWhereAllowed {
    fn name(&self) -> &'static str {
        "IdentityExistsOnlyIfIdentityIsAllowed"
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for (_, entity) in ctx.schema.entities() {
            if entity.model_type.has_identity() {
                continue;
            }
            for property in entity.identity_properties() {
                failures.push(ValidationFailure::error(
                    self.name(),
                    format!(
                        "'is part of identity' is not valid for property {} on {} {}.",
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
