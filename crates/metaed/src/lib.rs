//! ## Crate layout
//! - `pipeline`: build state, plugin contracts, validation and phases.
//! - `config`: TOML build configuration.
//! - `schema`: the model, version matcher, resolver and builders.
//! - `utils`: naming and hashing helpers.
//! - `plugins`: the bundled unified, relational, SQL Server, PostgreSQL,
//!   XSD and handbook plugins.
//!
//! [`build`] is the one-call entry point; [`build_state`] plus
//! [`run_build`] split loading from running.

pub use metaed_build as pipeline;
pub use metaed_config_build as config;
pub use metaed_schema as schema;
pub use metaed_utils as utils;

pub mod plugins {
    pub use metaed_plugin_handbook as handbook;
    pub use metaed_plugin_postgresql as postgresql;
    pub use metaed_plugin_relational as relational;
    pub use metaed_plugin_sqlserver as sqlserver;
    pub use metaed_plugin_unified as unified;
    pub use metaed_plugin_xsd as xsd;
}

pub mod registry;

use metaed_build::state::BuildState;
use metaed_config_build::{BuildConfig, ConfigError};
use metaed_schema::build::{BuildError, SchemaBuilder};
use thiserror::Error as ThisError;

pub use metaed_build::{PipelineError, run_build};
pub use registry::{DEFAULT_PLUGIN_ORDER, build_state, manifest_for};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    BuildError(#[from] BuildError),

    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    PipelineError(#[from] PipelineError),
}

/// Build a programmatic model under a configuration and run every
/// registered plugin.
pub fn build(config: BuildConfig, model: SchemaBuilder) -> Result<BuildState, Error> {
    let (schema, file_index) = model.build_with_files()?;
    let state = build_state(config, schema, file_index)?;

    Ok(run_build(state)?)
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{DEFAULT_PLUGIN_ORDER, Error, build, build_state, manifest_for};
    pub use metaed_build::prelude::*;
    pub use metaed_config_build::{BuildConfig, PluginConfig, ProjectConfig};
}
