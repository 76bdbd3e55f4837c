mod manifest;
mod schema;
mod table;

pub use manifest::{ManifestEntry, ManifestGenerator};
pub use schema::SchemaGenerator;
pub use table::TableGenerator;

///
/// TESTS
///

#[cfg(test)]
pub(crate) mod tests {
    use metaed_build::{
        link::link_schema,
        output::GeneratedOutput,
        plugin::{EnhanceContext, Enhancer, GenerateContext, Generator},
    };
    use metaed_plugin_relational::enhance::{NamespaceSchemaNameEnhancer, TableEnhancer};
    use metaed_plugin_unified::enhance::IdentityPropertyEnhancer;
    use metaed_schema::prelude::*;

    // Linked and enhanced the way a full build leaves it.
    pub(crate) fn enhanced(builder: SchemaBuilder) -> Schema {
        let mut schema = builder.build().unwrap();
        schema.initialize_namespaces().unwrap();
        link_schema(&mut schema);

        let mut ctx = EnhanceContext {
            schema: &mut schema,
            plugin: PluginId::Relational,
            target_version: SemVer::new(3, 1, 0),
        };
        let enhancers: [&dyn Enhancer; 3] = [&IdentityPropertyEnhancer, &NamespaceSchemaNameEnhancer, &TableEnhancer];
        for enhancer in enhancers {
            enhancer.enhance(&mut ctx).unwrap();
        }

        schema
    }

    pub(crate) fn generate(generator: &dyn Generator, schema: &Schema, target_version: SemVer) -> Vec<GeneratedOutput> {
        let ctx = GenerateContext {
            schema,
            plugin: PluginId::SqlServer,
            target_version,
            prior: &[],
        };

        generator.generate(&ctx).unwrap()
    }

    pub(crate) fn sample() -> SchemaBuilder {
        SchemaBuilder::new()
            .namespace(
                NamespaceBuilder::core("EdFi")
                    .entity(
                        EntityBuilder::domain_entity("Student")
                            .property(PropertyBuilder::string("StudentUniqueId").identity().string_bounds(None, Some(32)))
                            .property(PropertyBuilder::datetime("LastModified").optional()),
                    )
                    .entity(
                        EntityBuilder::domain_entity("School").property(PropertyBuilder::integer("SchoolId").identity()),
                    )
                    .entity(
                        EntityBuilder::association("StudentSchoolAssociation")
                            .property(PropertyBuilder::domain_entity("Student").identity())
                            .property(PropertyBuilder::domain_entity("School").identity()),
                    ),
            )
            .namespace(
                NamespaceBuilder::extension("Sample", "Sample")
                    .dependency("EdFi")
                    .entity(
                        EntityBuilder::domain_entity("Bus")
                            .property(PropertyBuilder::string("BusId").identity().string_bounds(None, Some(60))),
                    ),
            )
    }
}
