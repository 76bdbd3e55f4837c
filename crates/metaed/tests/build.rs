use metaed::prelude::*;

const CONFIG: &str = r#"
[[projects]]
namespace_name = "EdFi"
project_name = "Ed-Fi"
project_version = "3.1.0"

[[projects]]
namespace_name = "Sample"
project_name = "Sample"
project_version = "1.0.0"
project_extension = "Sample"
dependencies = ["EdFi"]
"#;

fn config() -> BuildConfig {
    BuildConfig::from_toml_str(CONFIG).unwrap()
}

// Builder dependencies are left off; configuration supplies them.
fn model(extension_entity: &str) -> SchemaBuilder {
    SchemaBuilder::new()
        .namespace(
            NamespaceBuilder::core("EdFi").entity(
                EntityBuilder::domain_entity("DomainEntity1")
                    .property(PropertyBuilder::integer("Identifier1").identity()),
            ),
        )
        .namespace(
            NamespaceBuilder::extension("Sample", "Sample").entity(
                EntityBuilder::domain_entity(extension_entity)
                    .property(PropertyBuilder::integer("Identifier2").identity()),
            ),
        )
}

fn output<'a>(state: &'a BuildState, namespace: &str, file_name: &str) -> Option<&'a str> {
    state
        .outputs()
        .find(|o| o.namespace == namespace && o.file_name == file_name)
        .and_then(|o| o.content.as_text())
}

#[test]
fn core_and_extension_build_cleanly() {
    let state = build(config(), model("DomainEntity2")).unwrap();

    assert_eq!(state.phase, BuildPhase::Done);
    assert_eq!(state.errors().count(), 0);
    assert!(state.warnings.is_empty());

    let entities: Vec<_> = state
        .schema
        .entities_of(ModelType::DomainEntity)
        .map(|(r, e)| {
            let ns = state.schema.namespace(r.namespace).unwrap();
            (ns.namespace_name.as_str(), e.meta_ed_name.as_str())
        })
        .collect();
    assert_eq!(entities, [("EdFi", "DomainEntity1"), ("Sample", "DomainEntity2")]);

    assert!(
        output(&state, "Sample", "0020-Tables.sql")
            .unwrap()
            .contains("CREATE TABLE [sample].[DomainEntity2] (")
    );
    assert!(output(&state, "EdFi", "ed_fi-handbook.md").is_some());
    assert_eq!(state.outputs_of(PluginId::Handbook).count(), 2);
    assert_eq!(state.outputs_of(PluginId::Relational).count(), 0);
}

#[test]
fn duplicate_names_across_dependencies_fail_once() {
    let state = build(config(), model("DomainEntity1")).unwrap();

    assert_eq!(state.validation_failures.len(), 1);
    let failure = &state.validation_failures[0];
    assert_eq!(failure.validator_name, "EntitiesCannotDuplicateNamesInDependencyNamespaces");
    assert_eq!(failure.category, FailureCategory::Error);
    assert!(failure.message.contains("DomainEntity1"));
    assert!(failure.message.contains("EdFi"));

    // errors stop the build before any plugin runs
    assert_eq!(state.phase, BuildPhase::Done);
    assert!(state.enhancer_results.is_empty());
    assert_eq!(state.outputs().count(), 0);
}

#[test]
fn duplicate_names_only_warn_for_older_targets() {
    let config = config().with_default_plugin_version("2.0.0");
    let state = build(config, model("DomainEntity1")).unwrap();

    assert_eq!(state.validation_failures.len(), 1);
    assert_eq!(state.validation_failures[0].category, FailureCategory::Warning);
    assert!(!state.has_errors());
    assert!(state.outputs().count() > 0);
}

#[test]
fn errors_can_be_built_through() {
    let config = config().with_stop_on_validation_error(false);
    let state = build(config, model("DomainEntity1")).unwrap();

    assert!(state.has_errors());
    assert!(output(&state, "EdFi", "0020-Tables.sql").is_some());
}

#[test]
fn failures_point_at_their_source_file() {
    let state = build(config(), model("DomainEntity1")).unwrap();
    let file_map = state.validation_failures[0].file_map.as_ref().unwrap();

    assert_eq!(file_map.file_path, "Sample/Sample.metaed");
}

#[test]
fn datetime_columns_follow_the_target_version() {
    let model = || {
        SchemaBuilder::new().namespace(
            NamespaceBuilder::core("EdFi").entity(
                EntityBuilder::domain_entity("Session")
                    .property(PropertyBuilder::integer("SessionId").identity())
                    .property(PropertyBuilder::datetime("BeginDateTime")),
            ),
        )
    };

    for (version, column) in [
        ("3.1.0", "[BeginDateTime] DATETIME NOT NULL"),
        ("3.1.1", "[BeginDateTime] DATETIME2(7) NOT NULL"),
    ] {
        let config = config().with_default_plugin_version(version);
        let state = build(config, model()).unwrap();

        assert!(output(&state, "EdFi", "0020-Tables.sql").unwrap().contains(column));
    }
}

#[test]
fn references_outside_direct_dependencies_fail() {
    let config = config().with_project(
        ProjectConfig::extension("Homograph", "Homograph", "1.0.0").depends_on("Sample"),
    );
    let model = model("DomainEntity2").namespace(
        NamespaceBuilder::extension("Homograph", "Homograph").entity(
            EntityBuilder::domain_entity("Name")
                .property(PropertyBuilder::integer("NameId").identity())
                .property(PropertyBuilder::domain_entity("DomainEntity1").in_namespace("EdFi")),
        ),
    );

    let state = build(config, model).unwrap();

    assert!(
        state
            .errors()
            .any(|f| f.validator_name == "PropertiesMustReferToValidNamespace")
    );
}

#[test]
fn plugin_orders_must_satisfy_data_dependencies() {
    let config = config().with_plugin(PluginConfig::new("edfiOdsRelational"));

    let result = build(config, model("DomainEntity2"));

    assert!(matches!(
        result,
        Err(Error::PipelineError(PipelineError::UnsatisfiedDataDependency {
            plugin: PluginId::Relational,
            ..
        }))
    ));
}

#[test]
fn manifest_lists_the_sql_artifacts() {
    let state = build(config(), model("DomainEntity2")).unwrap();
    let manifest = state
        .outputs_of(PluginId::SqlServer)
        .find(|o| o.file_name == "manifest.json")
        .and_then(|o| o.content.as_text())
        .unwrap();

    assert!(manifest.contains("\"generator\": \"SchemaGenerator\""));
    assert!(manifest.contains("\"generator\": \"TableGenerator\""));
}

fn plugin_output<'a>(state: &'a BuildState, plugin: PluginId, namespace: &str, file_name: &str) -> Option<&'a str> {
    state
        .outputs_of(plugin)
        .find(|o| o.namespace == namespace && o.file_name == file_name)
        .and_then(|o| o.content.as_text())
}

#[test]
fn postgresql_scripts_sit_beside_sql_server_scripts() {
    let state = build(config(), model("DomainEntity2")).unwrap();

    let tables = plugin_output(&state, PluginId::PostgreSql, "Sample", "0020-Tables.sql").unwrap();
    assert!(tables.contains("CREATE TABLE sample.DomainEntity2 ("));
    assert!(tables.contains("Identifier2 INT NOT NULL"));

    let paths: Vec<_> = state
        .outputs_of(PluginId::PostgreSql)
        .map(|o| o.relative_path())
        .collect();
    assert!(paths.iter().all(|p| p.starts_with("Database/PostgreSQL/ODS/Structure/")));
}

#[test]
fn xsd_files_follow_the_target_version() {
    let state = build(config(), model("DomainEntity2")).unwrap();

    let core = plugin_output(&state, PluginId::Xsd, "EdFi", "Ed-Fi-Core.xsd").unwrap();
    assert!(core.contains(r#"targetNamespace="http://ed-fi.org/3.1.0""#));
    assert!(core.contains(r#"<xs:complexType name="DomainEntity1">"#));
    assert!(!core.contains(r#"<xs:complexType name="DescriptorReferenceType">"#));

    let extension = plugin_output(&state, PluginId::Xsd, "Sample", "Sample-Ed-Fi-Extended-Core.xsd").unwrap();
    assert!(extension.contains(r#"<xs:include schemaLocation="Ed-Fi-Core.xsd"/>"#));
    assert!(extension.contains(r#"<xs:complexType name="DomainEntity2ReferenceType">"#));

    let legacy = build(config().with_default_plugin_version("2.0.0"), model("DomainEntity2")).unwrap();
    let core = plugin_output(&legacy, PluginId::Xsd, "EdFi", "Ed-Fi-Core.xsd").unwrap();
    assert!(core.contains(r#"<xs:complexType name="DescriptorReferenceType">"#));
}
