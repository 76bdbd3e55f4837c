use crate::lineage::namespace_of;
use metaed_build::plugin::{ValidateContext, Validator};
use metaed_schema::{failure::ValidationFailure, types::ModelType};

///
/// BaseMustResolve
///
/// A subclass or extension names a base that linking could resolve.
///

#[derive(Clone, Copy, Debug)]
pub struct BaseMustResolve {
    pub name: &'static str,
    pub model_type: ModelType,

    /// What the base must be, for messages.
    pub expected: &'static str,
}

impl Validator for BaseMustResolve {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for (_, entity) in ctx.schema.entities_of(self.model_type) {
            let Some(base) = &entity.base else {
                continue;
            };
            if base.resolved.is_some() {
                continue;
            }

            let searched = if base.base_entity_namespace_name.is_empty() {
                namespace_of(ctx.schema, entity)
            } else {
                base.base_entity_namespace_name.as_str()
            };
            failures.push(ValidationFailure::error(
                self.name,
                format!(
                    "{} {} based on {} does not match any declared {} in namespace {searched}.",
                    self.model_type.label(),
                    entity.meta_ed_name,
                    base.base_entity_name,
                    self.expected,
                ),
                Some(&base.source_map),
            ));
        }

        failures
    }
}

///
/// AbstractEntityMustNotBeExtended
///

#[derive(Clone, Copy, Debug)]
pub struct AbstractEntityMustNotBeExtended;

impl Validator for AbstractEntityMustNotBeExtended {
    fn name(&self) -> &'static str {
        "AbstractEntityMustNotBeExtended"
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        ctx.schema
            .entities_of(ModelType::DomainEntityExtension)
            .filter(|(_, entity)| {
                entity
                    .base_entity()
                    .and_then(|r| ctx.schema.entity(r))
                    .is_some_and(|base| base.is_abstract())
            })
            .map(|(_, entity)| {
                ValidationFailure::error(
                    self.name(),
                    format!(
                        "Abstract Entity {} is not a valid extension target.",
                        entity.meta_ed_name
                    ),
                    Some(&entity.source_map),
                )
            })
            .collect()
    }
}

///
/// TESTS
///
