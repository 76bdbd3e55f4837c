use metaed_build::plugin::{ValidateContext, Validator};
use metaed_schema::{
    failure::ValidationFailure,
    resolve::Lookup,
    types::ModelType,
};

const DESCRIPTOR_SUFFIX: &str = "Descriptor";

const SHARED_SIMPLE_TYPES: [ModelType; 3] = [
    ModelType::SharedDecimal,
    ModelType::SharedInteger,
    ModelType::SharedString,
];

///
/// DescriptorNameCannotEndInDescriptor
///

#[derive(Clone, Copy, Debug)]
pub struct DescriptorSuffix;

impl Validator for DescriptorSuffix {
    fn name(&self) -> &'static str {
        "DescriptorNameCannotEndInDescriptor"
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        ctx.schema
            .entities_of(ModelType::Descriptor)
            .filter(|(_, entity)| entity.meta_ed_name.ends_with(DESCRIPTOR_SUFFIX))
            .map(|(_, entity)| {
                ValidationFailure::error(
                    self.name(),
                    format!(
                        "Descriptor {} ends in '{DESCRIPTOR_SUFFIX}', which is appended automatically.",
                        entity.meta_ed_name
                    ),
                    Some(&entity.source_map),
                )
            })
            .collect()
    }
}

///
/// SimplePropertyMustNotMatchASharedSimpleType
///
/// A plain simple property named like a visible shared simple type is
/// probably meant to reference it.
///

#[derive(Clone, Copy, Debug)]
pub struct SimplePropertyShadowsSharedType;

impl Validator for SimplePropertyShadowsSharedType {
    fn name(&self) -> &'static str {
        "SimplePropertyMustNotMatchASharedSimpleType"
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let schema = ctx.schema;
        let mut failures = Vec::new();

        for (r, property) in schema.properties() {
            if property.is_reference() {
                continue;
            }

            let shared = schema
                .resolve_any(&property.meta_ed_name, &SHARED_SIMPLE_TYPES, r.entity.namespace, Lookup::Implicit)
                .and_then(|found| schema.entity(found));
            let Some(shared) = shared else {
                continue;
            };

            failures.push(ValidationFailure::warning(
                self.name(),
                format!(
                    "{} property {} has the same name as {} {}. Did you mean to reference it?",
                    property.property_type.label(),
                    property.meta_ed_name,
                    shared.model_type.label(),
                    shared.meta_ed_name
                ),
                Some(&property.source_map),
            ));
        }

        failures
    }
}

///
/// TESTS
///
