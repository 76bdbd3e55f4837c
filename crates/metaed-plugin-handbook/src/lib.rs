//! Markdown data handbook: one page per namespace describing its entities.

use metaed_build::{
    output::{GeneratedOutput, OutputContent},
    plugin::{GenerateContext, Generator, GeneratorError, PluginManifest},
};
use metaed_plugin_unified::data::{EXTENDED_BY, SUBCLASSED_BY};
use metaed_schema::{
    data::{DataSlot, PluginId},
    node::{Entity, EntityRef, Namespace, Schema},
    types::ModelType,
    version::SemVer,
};
use metaed_utils::case::{to_snake, to_title};
use std::fmt::Write as _;
use tracing::debug;

const READS: &[DataSlot] = &[SUBCLASSED_BY.slot(), EXTENDED_BY.slot()];

/// Kinds with a handbook section, in page order.
const SECTIONS: [ModelType; 12] = [
    ModelType::DomainEntity,
    ModelType::DomainEntitySubclass,
    ModelType::DomainEntityExtension,
    ModelType::Association,
    ModelType::AssociationSubclass,
    ModelType::AssociationExtension,
    ModelType::Common,
    ModelType::CommonExtension,
    ModelType::InlineCommon,
    ModelType::Choice,
    ModelType::Descriptor,
    ModelType::Enumeration,
];

/// Handbook plugin manifest for a target version.
#[must_use]
pub fn manifest(target_version: SemVer) -> PluginManifest {
    PluginManifest::new(PluginId::Handbook, target_version).generator(HandbookGenerator)
}

///
/// HandbookGenerator
///

#[derive(Clone, Copy, Debug)]
pub struct HandbookGenerator;

impl Generator for HandbookGenerator {
    fn name(&self) -> &'static str {
        "HandbookGenerator"
    }

    fn reads(&self) -> &'static [DataSlot] {
        READS
    }

    fn generate(&self, ctx: &GenerateContext<'_>) -> Result<Vec<GeneratedOutput>, GeneratorError> {
        let mut outputs = Vec::new();

        for ns in ctx.schema.namespaces() {
            let page = render_namespace(ctx.schema, ns)?;
            debug!(namespace = %ns.namespace_name, bytes = page.len(), "rendered handbook page");

            outputs.push(GeneratedOutput {
                name: "Handbook".into(),
                namespace: ns.namespace_name.clone(),
                folder_name: "Documentation/Handbook".into(),
                file_name: format!("{}-handbook.md", to_snake(&ns.namespace_name)),
                content: OutputContent::Text(page),
            });
        }

        Ok(outputs)
    }
}

// render_namespace
fn render_namespace(schema: &Schema, ns: &Namespace) -> Result<String, GeneratorError> {
    let mut md = String::new();
    writeln!(md, "# {} Data Handbook", ns.namespace_name)?;
    if !ns.project_name.is_empty() {
        writeln!(md)?;
        writeln!(md, "Project {} {}", ns.project_name, ns.project_version)?;
    }

    for kind in SECTIONS {
        let mut entities: Vec<&Entity> = ns.entities_of(kind).map(|(_, e)| e).collect();
        if entities.is_empty() {
            continue;
        }
        entities.sort_by(|a, b| a.meta_ed_name.cmp(&b.meta_ed_name));

        writeln!(md)?;
        writeln!(md, "## {}", plural(kind.label()))?;
        for entity in entities {
            render_entity(&mut md, schema, entity)?;
        }
    }

    Ok(md)
}

fn render_entity(md: &mut String, schema: &Schema, entity: &Entity) -> Result<(), GeneratorError> {
    writeln!(md)?;
    writeln!(md, "### {}", to_title(&entity.meta_ed_name))?;
    writeln!(md)?;
    writeln!(md, "<a id=\"{}\"></a>", to_snake(&entity.meta_ed_name))?;
    if let Some(base) = &entity.base {
        writeln!(md, "Based on `{}`.", base.base_entity_name)?;
    }
    if !entity.documentation.is_empty() {
        writeln!(md)?;
        writeln!(md, "{}", entity.documentation)?;
    }

    if !entity.properties.is_empty() {
        writeln!(md)?;
        writeln!(md, "| Property | Type | Cardinality | Identity |")?;
        writeln!(md, "|---|---|---|---|")?;
        for property in &entity.properties {
            writeln!(
                md,
                "| {} | {} | {} | {} |",
                property.full_name(),
                property.property_type.label(),
                property.cardinality.label(),
                if property.is_part_of_identity { "yes" } else { "" }
            )?;
        }
    }

    for item in entity.enumeration_items() {
        writeln!(md, "- {}", item.short_description)?;
    }

    for (label, key) in [("Subclassed by", SUBCLASSED_BY), ("Extended by", EXTENDED_BY)] {
        let names = names_of(schema, entity.data.get(key).map(Vec::as_slice).unwrap_or_default());
        if !names.is_empty() {
            writeln!(md)?;
            writeln!(md, "{label}: {}", names.join(", "))?;
        }
    }

    Ok(())
}

// Qualified names, since extensions live in other namespaces.
fn names_of(schema: &Schema, refs: &[EntityRef]) -> Vec<String> {
    refs.iter()
        .filter_map(|r| {
            let ns = schema.namespace(r.namespace)?;
            let entity = schema.entity(*r)?;

            Some(format!("{}.{}", ns.namespace_name, entity.meta_ed_name))
        })
        .collect()
}

fn plural(label: &str) -> String {
    match label.strip_suffix('y') {
        Some(stem) => format!("{stem}ies"),
        None => format!("{label}s"),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use metaed_build::{
        link::link_schema,
        plugin::{EnhanceContext, Enhancer},
    };
    use metaed_plugin_unified::enhance::SubclassInverseReferenceEnhancer;
    use metaed_schema::prelude::*;

    fn pages(builder: SchemaBuilder) -> Vec<GeneratedOutput> {
        let mut schema = builder.build().unwrap();
        schema.initialize_namespaces().unwrap();
        link_schema(&mut schema);
        let mut ctx = EnhanceContext {
            schema: &mut schema,
            plugin: PluginId::Unified,
            target_version: SemVer::new(3, 1, 0),
        };
        SubclassInverseReferenceEnhancer.enhance(&mut ctx).unwrap();

        let ctx = GenerateContext {
            schema: &schema,
            plugin: PluginId::Handbook,
            target_version: SemVer::new(3, 1, 0),
            prior: &[],
        };

        HandbookGenerator.generate(&ctx).unwrap()
    }

    #[test]
    fn one_page_per_namespace() {
        let outputs = pages(
            SchemaBuilder::new()
                .namespace(
                    NamespaceBuilder::core("EdFi").entity(
                        EntityBuilder::domain_entity("Student")
                            .documentation("A person enrolled in a school.")
                            .property(PropertyBuilder::string("StudentUniqueId").identity()),
                    ),
                )
                .namespace(
                    NamespaceBuilder::extension("Sample", "Sample")
                        .dependency("EdFi")
                        .entity(
                            EntityBuilder::domain_entity_extension("Student")
                                .base_namespace("EdFi")
                                .property(PropertyBuilder::boolean("IsVeteran").optional()),
                        ),
                ),
        );

        let paths: Vec<_> = outputs.iter().map(GeneratedOutput::relative_path).collect();
        assert_eq!(
            paths,
            [
                "Documentation/Handbook/ed_fi-handbook.md",
                "Documentation/Handbook/sample-handbook.md",
            ]
        );

        let edfi = outputs[0].content.as_text().unwrap();
        assert!(edfi.contains("## Domain Entities\n\n### Student\n"));
        assert!(edfi.contains("A person enrolled in a school."));
        assert!(edfi.contains("| StudentUniqueId | String | required | yes |"));
        assert!(edfi.contains("Extended by: Sample.Student"));
    }

    #[test]
    fn sections_follow_page_order() {
        let outputs = pages(
            SchemaBuilder::new().namespace(
                NamespaceBuilder::core("EdFi")
                    .entity(EntityBuilder::enumeration("Term").enumeration_item("Fall"))
                    .entity(EntityBuilder::association("StudentSchoolAssociation"))
                    .entity(EntityBuilder::domain_entity("School")),
            ),
        );
        let page = outputs[0].content.as_text().unwrap();

        let entities = page.find("## Domain Entities").unwrap();
        let associations = page.find("## Associations").unwrap();
        let enumerations = page.find("## Enumerations").unwrap();
        assert!(entities < associations && associations < enumerations);
        assert!(page.contains("- Fall"));
    }

    #[test]
    fn labels_pluralise() {
        assert_eq!(plural("Domain Entity"), "Domain Entities");
        assert_eq!(plural("Common"), "Commons");
    }
}
