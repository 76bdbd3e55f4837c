use crate::{
    STRUCTURE_FOLDER,
    sql::{column_type, qualified, quote},
};
use metaed_build::{
    output::{GeneratedOutput, OutputContent},
    plugin::{GenerateContext, Generator, GeneratorError},
};
use metaed_plugin_relational::{
    data::{SCHEMA_NAME, TABLES},
    model::Table,
};
use metaed_schema::{data::DataSlot, version::SemVer};
use std::{collections::BTreeMap, fmt::Write as _};
use tracing::debug;

const READS: &[DataSlot] = &[SCHEMA_NAME.slot(), TABLES.slot()];

///
/// TableGenerator
///
/// Per namespace, a `CREATE TABLE` script and a foreign key script.
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

            debug!(namespace = %ns.namespace_name, tables = tables.len(), "rendering tables");

            let output = |file_name: &str, name: &str, sql: String| GeneratedOutput {
                name: name.into(),
                namespace: ns.namespace_name.clone(),
                folder_name: STRUCTURE_FOLDER.into(),
                file_name: file_name.into(),
                content: OutputContent::Text(sql),
            };

            outputs.push(output(
                "0020-Tables.sql",
                "Tables",
                create_tables(&tables, &ctx.target_version)?,
            ));

            let foreign_keys = foreign_keys(&tables)?;
            if !foreign_keys.is_empty() {
                outputs.push(output("0030-ForeignKeys.sql", "ForeignKeys", foreign_keys));
            }
        }

        Ok(outputs)
    }
}

// create_tables
fn create_tables(tables: &[&Table], target_version: &SemVer) -> Result<String, GeneratorError> {
    let mut sql = String::new();

    for table in tables {
        writeln!(sql, "CREATE TABLE {} (", qualified(&table.schema, &table.name))?;
        for column in &table.columns {
            writeln!(
                sql,
                "    {} {} {},",
                quote(&column.name),
                column_type(column.column_type, target_version),
                if column.is_nullable { "NULL" } else { "NOT NULL" }
            )?;
        }

        let key: Vec<String> = table.primary_key().map(|c| format!("        {} ASC", quote(&c.name))).collect();
        writeln!(
            sql,
            "    CONSTRAINT {} PRIMARY KEY CLUSTERED (",
            quote(&format!("{}_PK", table.name))
        )?;
        writeln!(sql, "{}", key.join(",\n"))?;
        writeln!(sql, "    )")?;
        writeln!(sql, ")")?;
        writeln!(sql, "GO")?;
        writeln!(sql)?;
    }

    Ok(sql)
}

// Constraint names repeat when a table references the same table twice,
// so later ones are numbered.
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

            let columns = |names: &[String]| names.iter().map(|n| quote(n)).collect::<Vec<_>>().join(", ");

            writeln!(
                sql,
                "ALTER TABLE {} WITH CHECK ADD CONSTRAINT {} FOREIGN KEY ({})",
                qualified(&table.schema, &table.name),
                quote(&name),
                columns(&fk.columns)
            )?;
            writeln!(
                sql,
                "REFERENCES {} ({})",
                qualified(&fk.foreign_schema, &fk.foreign_table),
                columns(&fk.foreign_columns)
            )?;
            writeln!(sql, "GO")?;
            writeln!(sql)?;
        }
    }

    Ok(sql)
}

///
/// TESTS
///
