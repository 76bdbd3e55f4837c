use metaed_build::{
    output::{GeneratedOutput, OutputContent},
    plugin::{GenerateContext, Generator, GeneratorError},
};
use metaed_schema::data::PluginId;
use metaed_utils::hash::content_hash;
use serde::Serialize;

///
/// ManifestEntry
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ManifestEntry {
    pub generator: &'static str,
    pub namespace: String,
    pub path: String,
    pub bytes: usize,
    pub hash: String,
}

///
/// Manifest
///

#[derive(Debug, Serialize)]
struct Manifest {
    plugin: PluginId,
    artifacts: Vec<ManifestEntry>,
}

///
/// ManifestGenerator
///
/// Lists every artifact of the earlier generators with a content hash.
/// Must run last.
///

#[derive(Clone, Copy, Debug)]
pub struct ManifestGenerator;

impl Generator for ManifestGenerator {
    fn name(&self) -> &'static str {
        "ManifestGenerator"
    }

    fn generate(&self, ctx: &GenerateContext<'_>) -> Result<Vec<GeneratedOutput>, GeneratorError> {
        let artifacts = ctx
            .prior
            .iter()
            .flat_map(|result| {
                result.outputs.iter().map(|output| ManifestEntry {
                    generator: result.generator_name,
                    namespace: output.namespace.clone(),
                    path: output.relative_path(),
                    bytes: output.content.as_bytes().len(),
                    hash: content_hash(output.content.as_bytes()),
                })
            })
            .collect();

        let manifest = Manifest {
            plugin: ctx.plugin,
            artifacts,
        };
        let json = serde_json::to_string_pretty(&manifest).map_err(|e| GeneratorError::Failed(e.to_string()))?;

        Ok(vec![GeneratedOutput {
            name: "Manifest".into(),
            namespace: String::new(),
            folder_name: String::new(),
            file_name: "manifest.json".into(),
            content: OutputContent::Text(json),
        }])
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use metaed_build::output::GeneratorResult;
    use metaed_schema::prelude::*;

    fn output(namespace: &str, file_name: &str, text: &str) -> GeneratedOutput {
        GeneratedOutput {
            name: "Schemas".into(),
            namespace: namespace.into(),
            folder_name: "Structure".into(),
            file_name: file_name.into(),
            content: OutputContent::Text(text.into()),
        }
    }

    #[test]
    fn manifest_lists_prior_artifacts() {
        let schema = Schema::new();
        let prior = [
            GeneratorResult {
                generator_name: "SchemaGenerator",
                plugin: PluginId::SqlServer,
                outputs: vec![
                    output("EdFi", "0010-Schemas.sql", "CREATE SCHEMA [edfi]"),
                    output("Sample", "0010-Schemas.sql", "CREATE SCHEMA [sample]"),
                ],
                diagnostic: None,
            },
            GeneratorResult {
                generator_name: "TableGenerator",
                plugin: PluginId::SqlServer,
                outputs: Vec::new(),
                diagnostic: None,
            },
        ];
        let ctx = GenerateContext {
            schema: &schema,
            plugin: PluginId::SqlServer,
            target_version: SemVer::new(3, 1, 0),
            prior: &prior,
        };

        let outputs = ManifestGenerator.generate(&ctx).unwrap();
        let json: serde_json::Value = serde_json::from_str(outputs[0].content.as_text().unwrap()).unwrap();

        assert_eq!(json["plugin"], "edfiOdsSqlServer");
        assert_eq!(json["artifacts"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["artifacts"][1]["path"], "Structure/0010-Schemas.sql");
        assert_eq!(json["artifacts"][1]["namespace"], "Sample");
        assert_eq!(
            json["artifacts"][0]["hash"],
            content_hash(b"CREATE SCHEMA [edfi]").as_str()
        );
    }

    #[test]
    fn empty_builds_still_get_a_manifest() {
        let schema = Schema::new();
        let ctx = GenerateContext {
            schema: &schema,
            plugin: PluginId::SqlServer,
            target_version: SemVer::new(3, 1, 0),
            prior: &[],
        };

        let outputs = ManifestGenerator.generate(&ctx).unwrap();

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].file_name, "manifest.json");
    }
}
