use crate::{STRUCTURE_FOLDER, sql::ident};
use metaed_build::{
    output::{GeneratedOutput, OutputContent},
    plugin::{GenerateContext, Generator, GeneratorError},
};
use metaed_plugin_relational::data::SCHEMA_NAME;
use metaed_schema::data::DataSlot;
use std::fmt::Write as _;

const READS: &[DataSlot] = &[SCHEMA_NAME.slot()];

///
/// SchemaGenerator
///

#[derive(Clone, Copy, Debug)]
pub struct SchemaGenerator;

impl Generator for SchemaGenerator {
    fn name(&self) -> &'static str {
        "SchemaGenerator"
    }

    fn reads(&self) -> &'static [DataSlot] {
        READS
    }

    fn generate(&self, ctx: &GenerateContext<'_>) -> Result<Vec<GeneratedOutput>, GeneratorError> {
        let mut outputs = Vec::new();

        for ns in ctx.schema.namespaces() {
            let Some(schema_name) = ns.data.get(SCHEMA_NAME) else {
                continue;
            };

            let mut sql = String::new();
            writeln!(sql, "CREATE SCHEMA IF NOT EXISTS {};", ident(schema_name))?;

            outputs.push(GeneratedOutput {
                name: "Schemas".into(),
                namespace: ns.namespace_name.clone(),
                folder_name: STRUCTURE_FOLDER.into(),
                file_name: "0010-Schemas.sql".into(),
                content: OutputContent::Text(sql),
            });
        }

        Ok(outputs)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::tests::{enhanced, generate, sample};

    #[test]
    fn one_script_per_namespace() {
        let schema = enhanced(sample());
        let outputs = generate(&SchemaGenerator, &schema);

        let scripts: Vec<_> = outputs.iter().filter_map(|o| o.content.as_text()).collect();
        assert_eq!(
            scripts,
            ["CREATE SCHEMA IF NOT EXISTS edfi;\n", "CREATE SCHEMA IF NOT EXISTS sample;\n"]
        );
        assert_eq!(
            outputs[1].relative_path(),
            "Database/PostgreSQL/ODS/Structure/0010-Schemas.sql"
        );
    }
}
