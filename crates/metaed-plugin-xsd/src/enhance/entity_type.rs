use crate::{
    data::ENTITY_TYPES,
    model::{ComplexType, Element, EntityTypes, Facet, SimpleType},
};
use metaed_build::plugin::{EnhanceContext, Enhancer, EnhancerError};
use metaed_schema::{
    data::DataSlot,
    node::{Entity, EntityDetails, EntityRef, Property, Schema},
    types::{ModelType, PropertyType},
};
use tracing::debug;

const WRITES: &[DataSlot] = &[ENTITY_TYPES.slot()];

/// Deepest chain of inline commons flattened into one type.
const MAX_DEPTH: usize = 16;

///
/// EntityTypeEnhancer
///
/// Derives the schema types of every entity: a complex type for
/// structured entities, a simple type for enumerations and shared
/// simple types, and identity plus reference types for entities that
/// can be referenced. Inline commons and choices flatten into their
/// owner.
///

#[derive(Clone, Copy, Debug)]
pub struct EntityTypeEnhancer;

impl Enhancer for EntityTypeEnhancer {
    fn name(&self) -> &'static str {
        "EntityTypeEnhancer"
    }

    fn writes(&self) -> &'static [DataSlot] {
        WRITES
    }

    fn enhance(&self, ctx: &mut EnhanceContext<'_>) -> Result<(), EnhancerError> {
        let schema = &*ctx.schema;
        let mut planned: Vec<(EntityRef, EntityTypes)> = Vec::new();

        for (r, entity) in schema.entities() {
            let project_extension = schema
                .namespace(r.namespace)
                .map(|ns| ns.project_extension.as_str())
                .unwrap_or_default();

            planned.push((r, entity_types(schema, entity, project_extension)?));
        }

        debug!(entities = planned.len(), "derived schema types");

        for (r, types) in planned {
            if let Some(entity) = ctx.schema.entity_mut(r) {
                entity.data.insert(ENTITY_TYPES, types);
            }
        }

        Ok(())
    }
}

fn entity_types(schema: &Schema, entity: &Entity, project_extension: &str) -> Result<EntityTypes, EnhancerError> {
    let name = entity.meta_ed_name.as_str();
    let base_name = entity.base.as_ref().map(|b| b.base_entity_name.clone());
    let mut types = EntityTypes::default();

    let complex = match entity.model_type {
        ModelType::Association | ModelType::DomainEntity => {
            let mut complex = ComplexType::new(name).based_on("ComplexObjectType");
            complex.is_abstract = entity.is_abstract();
            Some(complex)
        }
        ModelType::AssociationSubclass | ModelType::CommonSubclass | ModelType::DomainEntitySubclass => {
            Some(ComplexType::new(name).based_on(base_name.unwrap_or_default()))
        }
        ModelType::AssociationExtension | ModelType::CommonExtension | ModelType::DomainEntityExtension => Some(
            ComplexType::new(extension_type_name(project_extension, name)).based_on(base_name.unwrap_or_default()),
        ),
        ModelType::Common => Some(ComplexType::new(name)),
        ModelType::Descriptor => Some(ComplexType::new(format!("{name}Descriptor")).based_on("DescriptorType")),
        _ => None,
    };

    if let Some(mut complex) = complex {
        complex.documentation.clone_from(&entity.documentation);
        push_elements(schema, &entity.properties, &mut complex.elements, 0)?;
        types.complex_type = Some(complex);
    }

    if matches!(
        entity.model_type,
        ModelType::Association
            | ModelType::AssociationSubclass
            | ModelType::DomainEntity
            | ModelType::DomainEntitySubclass
    ) && entity.identity_properties().next().is_some()
    {
        let mut identity_type = ComplexType::new(format!("{name}IdentityType"))
            .documented(format!("Identity of a {}.", entity.model_type.label()));
        for property in entity.identity_properties() {
            identity_type.elements.push(element(schema, property));
        }

        types.identity_type = Some(identity_type);
        types.reference_type = Some(
            ComplexType::new(format!("{name}ReferenceType"))
                .based_on("ReferenceType")
                .documented(format!("Provides alternative references for {name}."))
                .element(Element::new(format!("{name}Identity"), format!("{name}IdentityType")).optional()),
        );
    }

    types.simple_type = simple_type(entity);

    Ok(types)
}

/// Type name of an extension of `name` in a project.
#[must_use]
pub fn extension_type_name(project_extension: &str, name: &str) -> String {
    let prefix = if project_extension.is_empty() {
        "EXTENSION"
    } else {
        project_extension
    };

    format!("{prefix}-{name}Extension")
}

fn simple_type(entity: &Entity) -> Option<SimpleType> {
    let name = entity.meta_ed_name.as_str();

    let simple = match &entity.details {
        EntityDetails::Enumeration { items } => items.iter().fold(
            SimpleType::new(format!("{name}Type"), "xs:token"),
            |t, item| t.facet(Facet::Enumeration(item.short_description.clone())),
        ),
        EntityDetails::SharedString(bounds) => {
            let mut simple = SimpleType::new(name, "xs:string");
            simple.facets.extend(bounds.min_length.map(Facet::MinLength));
            simple.facets.extend(bounds.max_length.map(Facet::MaxLength));
            simple
        }
        EntityDetails::SharedInteger { bounds, is_short } => {
            let mut simple = SimpleType::new(name, if *is_short { "xs:short" } else { "xs:int" });
            simple.facets.extend(bounds.min_value.map(|v| Facet::MinInclusive(v.to_string())));
            simple.facets.extend(bounds.max_value.map(|v| Facet::MaxInclusive(v.to_string())));
            simple
        }
        EntityDetails::SharedDecimal(bounds) => {
            let mut simple = SimpleType::new(name, "xs:decimal");
            simple.facets.extend(bounds.total_digits.map(Facet::TotalDigits));
            simple.facets.extend(bounds.decimal_places.map(Facet::FractionDigits));
            simple
        }
        _ if entity.model_type == ModelType::SchoolYearEnumeration => SimpleType::new("SchoolYearType", "xs:token"),
        _ => return None,
    };

    Some(simple)
}

// Inline commons and choices contribute their own properties in place.
fn push_elements(
    schema: &Schema,
    properties: &[Property],
    elements: &mut Vec<Element>,
    depth: usize,
) -> Result<(), EnhancerError> {
    for property in properties {
        let inlined = matches!(property.property_type, PropertyType::InlineCommon | PropertyType::Choice)
            .then(|| property.referenced_entity.and_then(|r| schema.entity(r)))
            .flatten();

        match inlined {
            Some(inline) => {
                if depth >= MAX_DEPTH {
                    return Err(EnhancerError::Failed(format!(
                        "property {} nests more than {MAX_DEPTH} levels deep",
                        property.full_name()
                    )));
                }
                push_elements(schema, &inline.properties, elements, depth + 1)?;
            }
            None => elements.push(element(schema, property)),
        }
    }

    Ok(())
}

fn element(schema: &Schema, property: &Property) -> Element {
    let mut element = Element::new(property.full_name(), element_type(schema, property));
    if !property.cardinality.is_required() {
        element.min_occurs = 0;
    }
    element.unbounded = property.cardinality.is_collection();

    element
}

fn element_type(schema: &Schema, property: &Property) -> String {
    let referenced = property
        .referenced_entity
        .and_then(|r| schema.entity(r))
        .map_or_else(|| property.referenced_name(), |e| e.meta_ed_name.as_str());

    match property.property_type {
        PropertyType::Association | PropertyType::DomainEntity => format!("{referenced}ReferenceType"),
        PropertyType::Boolean => "xs:boolean".into(),
        PropertyType::Currency => "Currency".into(),
        PropertyType::Date => "xs:date".into(),
        PropertyType::Datetime => "xs:dateTime".into(),
        PropertyType::Decimal => "xs:decimal".into(),
        PropertyType::Descriptor => format!("{referenced}DescriptorReferenceType"),
        PropertyType::Duration => "TimeInterval".into(),
        PropertyType::Enumeration => format!("{referenced}Type"),
        PropertyType::Integer => "xs:int".into(),
        PropertyType::Percent => "Percent".into(),
        PropertyType::SchoolYearEnumeration => "SchoolYearType".into(),
        PropertyType::Short => "xs:short".into(),
        PropertyType::String => "xs:string".into(),
        PropertyType::Time => "xs:time".into(),
        PropertyType::Year => "xs:gYear".into(),
        PropertyType::Choice
        | PropertyType::Common
        | PropertyType::InlineCommon
        | PropertyType::SharedDecimal
        | PropertyType::SharedInteger
        | PropertyType::SharedShort
        | PropertyType::SharedString => referenced.to_string(),
    }
}

///
/// TESTS
///
