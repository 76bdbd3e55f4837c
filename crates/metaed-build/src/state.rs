use crate::{
    output::{BuildWarning, EnhancerResult, GeneratedOutput, GeneratorResult},
    plugin::PluginManifest,
};
use derive_more::Display;
use metaed_config_build::BuildConfig;
use metaed_schema::{
    data::PluginId,
    failure::ValidationFailure,
    node::Schema,
    source::FileIndex,
};
use std::sync::Arc;

///
/// BuildPhase
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum BuildPhase {
    Loaded,
    NamespacesInitialized,
    Linked,
    Validated,
    #[display("Enhanced({_0})")]
    Enhanced(PluginId),
    #[display("Generated({_0})")]
    Generated(PluginId),
    Done,
}

///
/// BuildState
///
/// Everything one build reads and produces. Moved through the pipeline.
/// The schema is shared with budgeted generator workers during generation.
///

#[derive(Debug)]
pub struct BuildState {
    pub config: BuildConfig,
    pub schema: Arc<Schema>,
    pub file_index: FileIndex,
    pub plugins: Vec<PluginManifest>,
    pub validation_failures: Vec<ValidationFailure>,
    pub enhancer_results: Vec<EnhancerResult>,
    pub generator_results: Vec<GeneratorResult>,
    pub warnings: Vec<BuildWarning>,
    pub phase: BuildPhase,
}

impl BuildState {
    #[must_use]
    pub fn new(
        config: BuildConfig,
        schema: Schema,
        file_index: FileIndex,
        plugins: Vec<PluginManifest>,
    ) -> Self {
        Self {
            config,
            schema: Arc::new(schema),
            file_index,
            plugins,
            validation_failures: Vec::new(),
            enhancer_results: Vec::new(),
            generator_results: Vec::new(),
            warnings: Vec::new(),
            phase: BuildPhase::Loaded,
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.validation_failures.iter().any(ValidationFailure::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationFailure> {
        self.validation_failures.iter().filter(|f| f.is_error())
    }

    #[must_use]
    pub fn plugin(&self, id: PluginId) -> Option<&PluginManifest> {
        self.plugins.iter().find(|p| p.short_name == id)
    }

    /// Every artifact, in plugin order then generator order.
    pub fn outputs(&self) -> impl Iterator<Item = &GeneratedOutput> {
        self.generator_results.iter().flat_map(|r| &r.outputs)
    }

    pub fn outputs_of(&self, plugin: PluginId) -> impl Iterator<Item = &GeneratedOutput> {
        self.generator_results
            .iter()
            .filter(move |r| r.plugin == plugin)
            .flat_map(|r| &r.outputs)
    }
}
