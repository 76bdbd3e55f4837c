use crate::{
    STRUCTURE_FOLDER,
    sql::{column_type, ident, qualified},
};
use metaed_build::{
    output::{GeneratedOutput, OutputContent},
    plugin::{GenerateContext, Generator, GeneratorError},
};
use metaed_plugin_relational::{
    data::{SCHEMA_NAME, TABLES},
    model::Table,
};
use metaed_schema::data::DataSlot;
use std::{collections::BTreeMap, fmt::Write as _};
use tracing::debug;

const READS: &[DataSlot] = &[SCHEMA_NAME.slot(), TABLES.slot()];

///
/// TableGenerator
///
/// Per namespace, a `CREATE TABLE` script and a foreign key script.
/// Identifiers are unquoted.
///

#[derive(Clone, Copy, Debug)]
pub struct TableGenerator;

impl Generator for TableGenerator {
    fn name(&self) -> &'static str {
        "TableGenerator"
    }

    fn reads(&self) -> &'static [DataSlot] {
        READS
    }

    fn generate(&self, ctx: &GenerateContext<'_>) -> Result<Vec<GeneratedOutput>, GeneratorError> {
        let mut outputs = Vec::new();

        for ns in ctx.schema.namespaces() {
            let tables: Vec<&Table> = ns
                .entities()
                .filter_map(|(_, entity)| entity.data.get(TABLES))
                .flatten()
                .collect();
            if tables.is_empty() {
                continue;
            }

            debug!(namespace = %ns.namespace_name, tables = tables.len(), "rendering postgres tables");

            let output = |file_name: &str, name: &str, sql: String| GeneratedOutput {
                name: name.into(),
                namespace: ns.namespace_name.clone(),
                folder_name: STRUCTURE_FOLDER.into(),
                file_name: file_name.into(),
                content: OutputContent::Text(sql),
            };

            outputs.push(output("0020-Tables.sql", "Tables", create_tables(&tables)?));

            let foreign_keys = foreign_keys(&tables)?;
            if !foreign_keys.is_empty() {
                outputs.push(output("0030-ForeignKeys.sql", "ForeignKeys", foreign_keys));
            }
        }

        Ok(outputs)
    }
}

fn create_tables(tables: &[&Table]) -> Result<String, GeneratorError> {
    let mut sql = String::new();

    for table in tables {
        writeln!(sql, "CREATE TABLE {} (", qualified(&table.schema, &table.name))?;
        for column in &table.columns {
            writeln!(
                sql,
                "    {} {} {},",
                ident(&column.name),
                column_type(column.column_type),
                if column.is_nullable { "NULL" } else { "NOT NULL" }
            )?;
        }

        let key: Vec<String> = table.primary_key().map(|c| ident(&c.name)).collect();
        writeln!(
            sql,
            "    CONSTRAINT {} PRIMARY KEY ({})",
            ident(&format!("{}_PK", table.name)),
            key.join(", ")
        )?;
        writeln!(sql, ");")?;
        writeln!(sql)?;
    }

    Ok(sql)
}

fn foreign_keys(tables: &[&Table]) -> Result<String, GeneratorError> {
    let mut sql = String::new();

    for table in tables {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();

        for fk in &table.foreign_keys {
            let count = seen.entry(fk.foreign_table.as_str()).or_default();
            *count += 1;
            let name = match *count {
                1 => format!("FK_{}_{}", table.name, fk.foreign_table),
                n => format!("FK_{}_{}{n}", table.name, fk.foreign_table),
            };

            let columns = |names: &[String]| names.iter().map(|n| ident(n)).collect::<Vec<_>>().join(", ");

            writeln!(
                sql,
                "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({})",
                qualified(&table.schema, &table.name),
                ident(&name),
                columns(&fk.columns)
            )?;
            writeln!(
                sql,
                "REFERENCES {} ({});",
                qualified(&fk.foreign_schema, &fk.foreign_table),
                columns(&fk.foreign_columns)
            )?;
            writeln!(sql)?;
        }
    }

    Ok(sql)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::tests::{enhanced, generate, sample};
    use metaed_schema::prelude::*;

    fn script<'a>(outputs: &'a [GeneratedOutput], namespace: &str, file_name: &str) -> Option<&'a str> {
        outputs
            .iter()
            .find(|o| o.namespace == namespace && o.file_name == file_name)
            .and_then(|o| o.content.as_text())
    }

    #[test]
    fn tables_render_with_keys() {
        let schema = enhanced(sample());
        let outputs = generate(&TableGenerator, &schema);

        let tables = script(&outputs, "EdFi", "0020-Tables.sql").unwrap();
        assert!(tables.starts_with(
            "CREATE TABLE edfi.Student (\n    \
             StudentUniqueId VARCHAR(32) NOT NULL,\n    \
             LastModified TIMESTAMP NULL,\n    \
             CONSTRAINT Student_PK PRIMARY KEY (StudentUniqueId)\n);\n"
        ));
    }

    #[test]
    fn foreign_keys_reference_key_columns() {
        let schema = enhanced(sample());
        let outputs = generate(&TableGenerator, &schema);

        let fks = script(&outputs, "EdFi", "0030-ForeignKeys.sql").unwrap();
        assert!(fks.contains(
            "ALTER TABLE edfi.StudentSchoolAssociation ADD CONSTRAINT \
             FK_StudentSchoolAssociation_School FOREIGN KEY (SchoolId)\n\
             REFERENCES edfi.School (SchoolId);\n"
        ));
    }

    #[test]
    fn namespaces_without_tables_are_skipped() {
        let schema = enhanced(sample());
        let outputs = generate(&TableGenerator, &schema);

        assert_eq!(script(&outputs, "Sample", "0020-Tables.sql"), None);
    }

    #[test]
    fn long_table_names_fit_the_identifier_limit() {
        let name = "StudentSpecialEducationProgramAssociationServiceProviderDisabilityDesignation";
        let schema = enhanced(SchemaBuilder::new().namespace(
            NamespaceBuilder::core("EdFi")
                .entity(EntityBuilder::domain_entity(name).property(PropertyBuilder::integer("Id").identity())),
        ));
        let outputs = generate(&TableGenerator, &schema);

        let tables = script(&outputs, "EdFi", "0020-Tables.sql").unwrap();
        let first = tables.lines().next().unwrap();
        let table = first.trim_start_matches("CREATE TABLE edfi.").trim_end_matches(" (");
        assert_eq!(table.len(), crate::sql::MAX_IDENTIFIER_LENGTH);
        assert!(!tables.contains(name));
    }
}
