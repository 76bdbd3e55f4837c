use metaed_build::{
    pipeline::{PipelineError, configured_plugin_order, negotiate_target_version},
    plugin::PluginManifest,
    state::BuildState,
};
use metaed_config_build::BuildConfig;
use metaed_schema::{data::PluginId, node::Schema, source::FileIndex, version::SemVer};
use tracing::debug;

/// Plugin order used when the configuration names no plugins.
pub const DEFAULT_PLUGIN_ORDER: [PluginId; 6] = [
    PluginId::Unified,
    PluginId::Relational,
    PluginId::SqlServer,
    PluginId::PostgreSql,
    PluginId::Xsd,
    PluginId::Handbook,
];

/// The manifest of one known plugin at a target version.
#[must_use]
pub fn manifest_for(plugin: PluginId, target_version: SemVer) -> PluginManifest {
    match plugin {
        PluginId::Handbook => metaed_plugin_handbook::manifest(target_version),
        PluginId::PostgreSql => metaed_plugin_postgresql::manifest(target_version),
        PluginId::Relational => metaed_plugin_relational::manifest(target_version),
        PluginId::SqlServer => metaed_plugin_sqlserver::manifest(target_version),
        PluginId::Unified => metaed_plugin_unified::manifest(target_version),
        PluginId::Xsd => metaed_plugin_xsd::manifest(target_version),
    }
}

/// Manifests in configured order, each at its negotiated target version.
pub fn plugins(config: &BuildConfig) -> Result<Vec<PluginManifest>, PipelineError> {
    let order = configured_plugin_order(config)?.unwrap_or_else(|| DEFAULT_PLUGIN_ORDER.to_vec());

    order
        .into_iter()
        .map(|plugin| {
            let target_version = negotiate_target_version(config, plugin)?;
            debug!(plugin = %plugin, target_version = %target_version, "plugin registered");

            Ok(manifest_for(plugin, target_version))
        })
        .collect()
}

/// A loaded build, ready for `run_build`.
pub fn build_state(
    config: BuildConfig,
    schema: Schema,
    file_index: FileIndex,
) -> Result<BuildState, PipelineError> {
    let plugins = plugins(&config)?;

    Ok(BuildState::new(config, schema, file_index, plugins))
}

///
/// TESTS
///
