use metaed_build::plugin::{ValidateContext, Validator};
use metaed_schema::{
    failure::ValidationFailure,
    node::{EntityDetails, NamespaceId, Property, Schema},
    resolve::Lookup,
    types::{ModelType, PropertyType},
};

// Names of the namespaces a property's reference was searched in.
fn searched_namespaces(schema: &Schema, from: NamespaceId, property: &Property) -> String {
    schema
        .search_order(from, Lookup::for_reference(property.referenced_namespace_name.as_deref()))
        .into_iter()
        .filter_map(|id| schema.namespace(id))
        .map(|ns| ns.namespace_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// An explicit namespace the declaring namespace cannot see. Reported by
// `PropertiesMustReferToValidNamespace` alone.
fn has_invalid_namespace(schema: &Schema, from: NamespaceId, property: &Property) -> bool {
    property
        .referenced_namespace_name
        .as_deref()
        .filter(|ns| !ns.is_empty())
        .is_some_and(|ns| schema.visible_namespace(from, ns).is_none())
}

///
/// ReferenceMustResolve
///
/// Every property of one referential type points at a visible entity of
/// the matching kind.
///

#[derive(Clone, Copy, Debug)]
pub struct ReferenceMustResolve {
    pub name: &'static str,
    pub property_type: PropertyType,

    /// What the reference must name, for messages.
    pub expected: &'static str,
}

impl ReferenceMustResolve {
    // Shared integers and shared shorts share one model type.
    fn kind_matches(&self, details: &EntityDetails) -> bool {
        match (self.property_type, details) {
            (PropertyType::SharedInteger, EntityDetails::SharedInteger { is_short, .. }) => !is_short,
            (PropertyType::SharedShort, EntityDetails::SharedInteger { is_short, .. }) => *is_short,
            _ => true,
        }
    }
}

impl Validator for ReferenceMustResolve {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let schema = ctx.schema;
        let mut failures = Vec::new();

        for r in schema.property_index().get(self.property_type) {
            let Some(property) = schema.property(*r) else {
                continue;
            };
            if property.is_extension_override && self.property_type == PropertyType::Common {
                continue;
            }
            let from = r.entity.namespace;
            if has_invalid_namespace(schema, from, property) {
                continue;
            }

            let matched = property
                .referenced_entity
                .and_then(|target| schema.entity(target))
                .is_some_and(|target| self.kind_matches(&target.details));
            if matched {
                continue;
            }

            failures.push(ValidationFailure::error(
                self.name,
                format!(
                    "{} property {} does not match any declared {} in namespace {}.",
                    self.property_type.label(),
                    property.referenced_name(),
                    self.expected,
                    searched_namespaces(schema, from, property)
                ),
                Some(&property.source_map),
            ));
        }

        failures
    }
}

///
/// CommonPropertyWithExtensionOverrideMustReferenceCommonTypeExtension
///

#[derive(Clone, Copy, Debug)]
pub struct OverrideMustReferenceCommonExtension;

impl Validator for OverrideMustReferenceCommonExtension {
    fn name(&self) -> &'static str {
        "CommonPropertyWithExtensionOverrideMustReferenceCommonTypeExtension"
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let schema = ctx.schema;
        let mut failures = Vec::new();

        for r in schema.property_index().get(PropertyType::Common) {
            let Some(property) = schema.property(*r).filter(|p| p.is_extension_override) else {
                continue;
            };
            let from = r.entity.namespace;
            if has_invalid_namespace(schema, from, property) {
                continue;
            }

            let is_extension = property
                .referenced_entity
                .and_then(|target| schema.entity(target))
                .is_some_and(|target| target.model_type == ModelType::CommonExtension);
            if is_extension {
                continue;
            }

            failures.push(ValidationFailure::error(
                self.name(),
                format!(
                    "'common extension' property {} does not match any declared Common Extension in \
                     namespace {}.",
                    property.referenced_name(),
                    searched_namespaces(schema, from, property)
                ),
                Some(&property.source_map),
            ));
        }

        failures
    }
}

///
/// PropertiesMustReferToValidNamespace
///

#[derive(Clone, Copy, Debug)]
pub struct ValidReferenceNamespace;

impl Validator for ValidReferenceNamespace {
    fn name(&self) -> &'static str {
        "PropertiesMustReferToValidNamespace"
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let schema = ctx.schema;

        schema
            .properties()
            .filter(|(r, p)| has_invalid_namespace(schema, r.entity.namespace, p))
            .map(|(r, property)| {
                let declaring = schema
                    .namespace(r.entity.namespace)
                    .map_or("", |ns| ns.namespace_name.as_str());

                ValidationFailure::error(
                    self.name(),
                    format!(
                        "Property {} refers to namespace {}, which is neither {declaring} nor one of \
                         its dependencies.",
                        property.full_name(),
                        property.referenced_namespace_name.as_deref().unwrap_or_default()
                    ),
                    Some(&property.source_map),
                )
            })
            .collect()
    }
}

///
/// TESTS
///
