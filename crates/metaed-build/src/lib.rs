//! The MetaEd build pipeline: plugin contracts, the per-build state, core
//! linking, validation and the phase orchestrator.

pub mod link;
pub mod output;
pub mod pipeline;
pub mod plugin;
pub mod state;
pub mod validate;

pub use pipeline::{PipelineError, run_build};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        output::{BuildWarning, EnhancerResult, GeneratedOutput, GeneratorResult, OutputContent},
        pipeline::{PipelineError, negotiate_target_version, run_build},
        plugin::{
            EnhanceContext, Enhancer, EnhancerError, FnValidator, GenerateContext, Generator,
            GeneratorError, PluginManifest, ValidateContext, Validator,
        },
        state::{BuildPhase, BuildState},
    };
    pub use metaed_schema::prelude::*;
}
