use crate::{
    V2_ONLY, V3_OR_GREATER,
    data::{ENTITY_TYPES, SCHEMA_CONTAINER},
    model::{ComplexType, Element, EntityTypes, Facet, SchemaContainer, SchemaSection, SimpleType},
};
use metaed_build::plugin::{EnhanceContext, Enhancer, EnhancerError};
use metaed_schema::{
    data::DataSlot,
    node::{Namespace, NamespaceId, Schema},
    types::ModelType,
    version::SemVer,
};
use tracing::debug;

const READS: &[DataSlot] = &[ENTITY_TYPES.slot()];
const WRITES: &[DataSlot] = &[SCHEMA_CONTAINER.slot()];

/// Name of the base descriptor reference type.
pub const DESCRIPTOR_REFERENCE_TYPE: &str = "DescriptorReferenceType";

///
/// DescriptorReferences
///
/// How descriptor references are typed.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum DescriptorReferences {
    Complex,
    Simple,
}

///
/// SchemaContainerEnhancer
///
/// Assembles each namespace schema for 3.0 and later targets.
///

#[derive(Clone, Copy, Debug)]
pub struct SchemaContainerEnhancer;

impl Enhancer for SchemaContainerEnhancer {
    fn name(&self) -> &'static str {
        "SchemaContainerEnhancer"
    }

    fn target_versions(&self) -> &'static str {
        V3_OR_GREATER
    }

    fn reads(&self) -> &'static [DataSlot] {
        READS
    }

    fn writes(&self) -> &'static [DataSlot] {
        WRITES
    }

    fn enhance(&self, ctx: &mut EnhanceContext<'_>) -> Result<(), EnhancerError> {
        assemble(ctx, DescriptorReferences::Simple);

        Ok(())
    }
}

///
/// SchemaContainerEnhancerV2
///
/// Assembles each namespace schema for 2.x targets.
///

#[derive(Clone, Copy, Debug)]
pub struct SchemaContainerEnhancerV2;

impl Enhancer for SchemaContainerEnhancerV2 {
    fn name(&self) -> &'static str {
        "SchemaContainerEnhancerV2"
    }

    fn target_versions(&self) -> &'static str {
        V2_ONLY
    }

    fn reads(&self) -> &'static [DataSlot] {
        READS
    }

    fn writes(&self) -> &'static [DataSlot] {
        WRITES
    }

    fn enhance(&self, ctx: &mut EnhanceContext<'_>) -> Result<(), EnhancerError> {
        assemble(ctx, DescriptorReferences::Complex);

        Ok(())
    }
}

fn assemble(ctx: &mut EnhanceContext<'_>, references: DescriptorReferences) {
    let schema = &*ctx.schema;
    let containers: Vec<(NamespaceId, SchemaContainer)> = schema
        .namespaces()
        .map(|ns| (ns.id(), container(schema, ns, ctx.target_version, references)))
        .collect();

    for (id, container) in containers {
        if let Some(ns) = ctx.schema.namespace_mut(id) {
            debug!(
                namespace = %ns.namespace_name,
                sections = container.sections.iter().filter(|s| !s.is_empty()).count(),
                "assembled schema"
            );
            ns.data.insert(SCHEMA_CONTAINER, container);
        }
    }
}

fn container(
    schema: &Schema,
    ns: &Namespace,
    target_version: SemVer,
    references: DescriptorReferences,
) -> SchemaContainer {
    let complex = |model_types: &[ModelType]| {
        sorted_complex(types_of(schema, ns.id(), model_types).into_iter().filter_map(|t| t.complex_type.clone()))
    };
    let simple = |model_types: &[ModelType]| -> Vec<SimpleType> {
        types_of(schema, ns.id(), model_types)
            .into_iter()
            .filter_map(|t| t.simple_type.clone())
            .collect()
    };

    let mut sections = Vec::new();

    sections.push(SchemaSection {
        complex_types: complex(&[
            ModelType::DomainEntity,
            ModelType::DomainEntityExtension,
            ModelType::DomainEntitySubclass,
        ]),
        ..SchemaSection::new("===== Domain Entities =====")
    });
    sections.push(SchemaSection {
        complex_types: complex(&[ModelType::Descriptor]),
        ..SchemaSection::new("===== Descriptors =====")
    });
    sections.push(SchemaSection {
        complex_types: complex(&[
            ModelType::Association,
            ModelType::AssociationExtension,
            ModelType::AssociationSubclass,
        ]),
        ..SchemaSection::new("===== Associations =====")
    });

    if !ns.is_extension {
        sections.push(base_types(references));
    }

    let referenceable = types_of(schema, ns.id(), &[
        ModelType::Association,
        ModelType::AssociationSubclass,
        ModelType::DomainEntity,
        ModelType::DomainEntitySubclass,
    ]);
    sections.push(SchemaSection {
        complex_types: sorted_complex(
            referenceable
                .iter()
                .flat_map(|t| [t.identity_type.clone(), t.reference_type.clone()])
                .flatten(),
        ),
        ..SchemaSection::new("===== Extended Reference Types =====")
    });

    let descriptors: Vec<String> = schema
        .entities_of(ModelType::Descriptor)
        .filter(|(r, _)| r.namespace == ns.id())
        .map(|(_, e)| format!("{}{DESCRIPTOR_REFERENCE_TYPE}", e.meta_ed_name))
        .collect();
    let mut descriptor_references = SchemaSection::new("===== Extended Descriptor Reference Types =====");
    match references {
        DescriptorReferences::Simple => {
            descriptor_references.simple_types = sorted_simple(
                descriptors
                    .into_iter()
                    .map(|name| SimpleType::new(name, DESCRIPTOR_REFERENCE_TYPE)),
            );
        }
        DescriptorReferences::Complex => {
            descriptor_references.complex_types = sorted_complex(
                descriptors
                    .into_iter()
                    .map(|name| ComplexType::new(name).based_on(DESCRIPTOR_REFERENCE_TYPE)),
            );
        }
    }
    sections.push(descriptor_references);

    sections.push(SchemaSection {
        complex_types: complex(&[ModelType::Common, ModelType::CommonExtension, ModelType::CommonSubclass]),
        ..SchemaSection::new("===== Common Types =====")
    });

    sections.push(SchemaSection {
        simple_types: sorted_simple(simple(&[ModelType::Enumeration, ModelType::SchoolYearEnumeration])),
        ..SchemaSection::new("===== Enumerations and Enumerated Collections =====")
    });

    let mut strings = simple(&[ModelType::SharedString]);
    let mut numbers = simple(&[ModelType::SharedDecimal, ModelType::SharedInteger]);
    if !ns.is_extension {
        strings.push(SimpleType::new("CodeValue", "xs:string").facet(Facet::MaxLength(50)));
        strings.push(SimpleType::new("TimeInterval", "xs:string").facet(Facet::MaxLength(30)));
        if references == DescriptorReferences::Simple {
            strings.push(SimpleType::new(DESCRIPTOR_REFERENCE_TYPE, "xs:string").facet(Facet::MaxLength(306)));
        }

        numbers.push(
            SimpleType::new("Currency", "xs:decimal")
                .facet(Facet::TotalDigits(19))
                .facet(Facet::FractionDigits(4)),
        );
        numbers.push(
            SimpleType::new("Percent", "xs:decimal")
                .facet(Facet::TotalDigits(5))
                .facet(Facet::FractionDigits(4)),
        );
    }

    sections.push(SchemaSection {
        simple_types: sorted_simple(strings),
        ..SchemaSection::new("===== String Simple Types =====")
    });
    sections.push(SchemaSection {
        simple_types: sorted_simple(numbers),
        ..SchemaSection::new("===== Numeric Simple Types =====")
    });

    let documentation = if ns.is_extension {
        format!("===== Ed-Fi {target_version} Extensions =====")
    } else {
        format!("===== Ed-Fi-Core Version {target_version} ====")
    };

    SchemaContainer {
        is_extension: ns.is_extension,
        documentation,
        sections,
    }
}

fn types_of<'a>(schema: &'a Schema, ns: NamespaceId, model_types: &[ModelType]) -> Vec<&'a EntityTypes> {
    schema
        .entities()
        .filter(|(r, e)| r.namespace == ns && model_types.contains(&e.model_type))
        .filter_map(|(_, e)| e.data.get(ENTITY_TYPES))
        .collect()
}

// Types every core schema carries.
fn base_types(references: DescriptorReferences) -> SchemaSection {
    let prior_descriptor = Element::new("PriorDescriptor", DESCRIPTOR_REFERENCE_TYPE).optional();

    let mut section = SchemaSection::new("===== Base Types =====");
    section.complex_types.push(
        ComplexType {
            is_abstract: true,
            ..ComplexType::new("ComplexObjectType")
        }
        .documented("Base type of every entity element.")
        .attribute("id", "xs:ID"),
    );
    section.complex_types.push(
        ComplexType {
            is_abstract: true,
            ..ComplexType::new("DescriptorType")
        }
        .based_on("ComplexObjectType")
        .documented("Base type of every descriptor.")
        .element(Element::new("CodeValue", "CodeValue"))
        .element(Element::new("ShortDescription", "ShortDescription"))
        .element(Element::new("Description", "Description").optional())
        .element(Element::new("EffectiveBeginDate", "xs:date").optional())
        .element(Element::new("EffectiveEndDate", "xs:date").optional())
        .element(prior_descriptor)
        .element(Element::new("Namespace", "URI")),
    );
    section.complex_types.push(
        ComplexType::new("ReferenceType")
            .documented("Base type of association references.")
            .attribute("id", "xs:ID")
            .attribute("ref", "xs:IDREF"),
    );

    if references == DescriptorReferences::Complex {
        section.complex_types.push(
            ComplexType::new(DESCRIPTOR_REFERENCE_TYPE)
                .based_on("ReferenceType")
                .documented("Reference to a descriptor by code value and namespace.")
                .element(Element::new("CodeValue", "CodeValue"))
                .element(Element::new("Namespace", "URI").optional()),
        );
    }

    section
}

fn sorted_complex(types: impl IntoIterator<Item = ComplexType>) -> Vec<ComplexType> {
    let mut types: Vec<_> = types.into_iter().collect();
    types.sort_by(|a, b| a.name.cmp(&b.name));
    types
}

fn sorted_simple(types: impl IntoIterator<Item = SimpleType>) -> Vec<SimpleType> {
    let mut types: Vec<_> = types.into_iter().collect();
    types.sort_by(|a, b| a.name.cmp(&b.name));
    types
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::{
        EntityTypeEnhancer,
        tests::{enhanced, sample},
    };
    use metaed_schema::prelude::*;

    fn container<'a>(schema: &'a Schema, namespace: &str) -> &'a SchemaContainer {
        schema.namespace_by_name(namespace).and_then(|ns| ns.data.get(SCHEMA_CONTAINER)).unwrap()
    }

    #[test]
    fn current_targets_use_simple_descriptor_references() {
        let schema = enhanced(sample(), SemVer::new(3, 1, 0), &[&EntityTypeEnhancer, &SchemaContainerEnhancer]);
        let core = container(&schema, "EdFi");

        let sex = core.simple_type("SexDescriptorReferenceType").unwrap();
        assert_eq!(sex.base_type, DESCRIPTOR_REFERENCE_TYPE);
        assert!(core.simple_type(DESCRIPTOR_REFERENCE_TYPE).is_some());
        assert!(core.complex_type(DESCRIPTOR_REFERENCE_TYPE).is_none());
        assert!(core.complex_type("SexDescriptorReferenceType").is_none());
        assert_eq!(core.documentation, "===== Ed-Fi-Core Version 3.1.0 ====");
    }

    #[test]
    fn v2_targets_use_complex_descriptor_references() {
        let schema = enhanced(sample(), SemVer::new(2, 0, 0), &[&EntityTypeEnhancer, &SchemaContainerEnhancerV2]);
        let core = container(&schema, "EdFi");

        let sex = core.complex_type("SexDescriptorReferenceType").unwrap();
        assert_eq!(sex.base_type.as_deref(), Some(DESCRIPTOR_REFERENCE_TYPE));
        assert_eq!(
            core.complex_type(DESCRIPTOR_REFERENCE_TYPE).and_then(|t| t.base_type.as_deref()),
            Some("ReferenceType")
        );
        assert!(core.simple_type(DESCRIPTOR_REFERENCE_TYPE).is_none());
    }

    #[test]
    fn each_target_enables_exactly_one_assembler() {
        for (version, current, legacy) in [("3.1.0", true, false), ("2.0.0", false, true), ("1.0.0", false, false)] {
            let version = SemVer::parse(version).unwrap();

            assert_eq!(satisfies(&version, SchemaContainerEnhancer.target_versions()), current);
            assert_eq!(satisfies(&version, SchemaContainerEnhancerV2.target_versions()), legacy);
        }
    }

    #[test]
    fn sections_are_sorted_and_ordered() {
        let schema = enhanced(sample(), SemVer::new(3, 1, 0), &[&EntityTypeEnhancer, &SchemaContainerEnhancer]);
        let core = container(&schema, "EdFi");

        assert_eq!(core.sections[0].documentation, "===== Domain Entities =====");
        let entities: Vec<_> = core.sections[0].complex_types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(entities, ["School", "Student"]);

        let references: Vec<_> = core.sections[4].complex_types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            references,
            [
                "SchoolIdentityType",
                "SchoolReferenceType",
                "StudentIdentityType",
                "StudentReferenceType",
                "StudentSchoolAssociationIdentityType",
                "StudentSchoolAssociationReferenceType",
            ]
        );

        let strings: Vec<_> = core.sections[8].simple_types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(strings, ["CodeValue", DESCRIPTOR_REFERENCE_TYPE, "TimeInterval", "Url"]);
    }

    #[test]
    fn extensions_skip_base_and_builtin_types() {
        let schema = enhanced(sample(), SemVer::new(3, 1, 0), &[&EntityTypeEnhancer, &SchemaContainerEnhancer]);
        let sample = container(&schema, "Sample");

        assert!(sample.is_extension);
        assert!(sample.complex_type("ComplexObjectType").is_none());
        assert!(sample.simple_type("CodeValue").is_none());
        assert!(sample.complex_type("Sample-StudentExtension").is_some());
        assert_eq!(sample.documentation, "===== Ed-Fi 3.1.0 Extensions =====");
    }
}
