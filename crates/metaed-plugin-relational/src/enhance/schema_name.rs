use crate::data::SCHEMA_NAME;
use metaed_build::plugin::{EnhanceContext, Enhancer, EnhancerError};
use metaed_schema::data::DataSlot;
use tracing::debug;

const WRITES: &[DataSlot] = &[SCHEMA_NAME.slot()];

///
/// NamespaceSchemaNameEnhancer
///
/// A namespace's database schema is its name in lower case.
///

#[derive(Clone, Copy, Debug)]
pub struct NamespaceSchemaNameEnhancer;

impl Enhancer for NamespaceSchemaNameEnhancer {
    fn name(&self) -> &'static str {
        "NamespaceSchemaNameEnhancer"
    }

    fn writes(&self) -> &'static [DataSlot] {
        WRITES
    }

    fn enhance(&self, ctx: &mut EnhanceContext<'_>) -> Result<(), EnhancerError> {
        for ns in ctx.schema.namespaces_mut() {
            let schema_name = ns.namespace_name.to_lowercase();
            debug!(namespace = %ns.namespace_name, schema = %schema_name, "schema name");

            ns.data.insert(SCHEMA_NAME, schema_name);
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use metaed_schema::prelude::*;

    #[test]
    fn schema_names_are_lower_case() {
        let mut schema = SchemaBuilder::new()
            .namespace(NamespaceBuilder::core("EdFi"))
            .namespace(NamespaceBuilder::extension("TPDM", "TPDM").dependency("EdFi"))
            .build()
            .unwrap();

        let mut ctx = EnhanceContext {
            schema: &mut schema,
            plugin: PluginId::Relational,
            target_version: SemVer::new(3, 1, 0),
        };
        NamespaceSchemaNameEnhancer.enhance(&mut ctx).unwrap();

        let names: Vec<_> = schema
            .namespaces()
            .filter_map(|ns| ns.data.get(SCHEMA_NAME).cloned())
            .collect();
        assert_eq!(names, ["edfi", "tpdm"]);
    }
}
