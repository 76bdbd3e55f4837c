//! Plugin contracts: validators, enhancers and generators, and the
//! manifest bundling them for one plugin.

use crate::output::{GeneratedOutput, GeneratorResult};
use metaed_schema::{
    data::{DataSlot, PluginId},
    failure::ValidationFailure,
    node::Schema,
    version::SemVer,
};
use std::{fmt, sync::Arc, time::Duration};
use thiserror::Error as ThisError;

/// Range matching every target version.
pub const ALL_VERSIONS: &str = "*";

///
/// EnhancerError
///

#[derive(Debug, ThisError)]
pub enum EnhancerError {
    #[error("{0}")]
    Failed(String),

    #[error("{entity} is missing {slot}")]
    MissingData { entity: String, slot: DataSlot },
}

///
/// GeneratorError
///

#[derive(Debug, ThisError)]
pub enum GeneratorError {
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Format(#[from] fmt::Error),
}

///
/// ValidateContext
///

#[derive(Clone, Copy, Debug)]
pub struct ValidateContext<'a> {
    pub schema: &'a Schema,
    pub plugin: PluginId,
    pub target_version: SemVer,
}

///
/// EnhanceContext
///

#[derive(Debug)]
pub struct EnhanceContext<'a> {
    pub schema: &'a mut Schema,
    pub plugin: PluginId,
    pub target_version: SemVer,
}

///
/// GenerateContext
///

#[derive(Clone, Copy, Debug)]
pub struct GenerateContext<'a> {
    pub schema: &'a Schema,
    pub plugin: PluginId,
    pub target_version: SemVer,

    /// Results of this plugin's earlier generators, in run order.
    pub prior: &'a [GeneratorResult],
}

///
/// Validator
///
/// A pure rule over the whole linked schema.
///

pub trait Validator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Target versions this rule applies to.
    fn target_versions(&self) -> &'static str {
        ALL_VERSIONS
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure>;
}

///
/// Enhancer
///
/// Attaches plugin data to the schema. Reads and writes are declared so
/// plugin order can be checked before a build starts.
///

pub trait Enhancer: Send + Sync {
    fn name(&self) -> &'static str;

    fn target_versions(&self) -> &'static str {
        ALL_VERSIONS
    }

    fn reads(&self) -> &'static [DataSlot] {
        &[]
    }

    fn writes(&self) -> &'static [DataSlot] {
        &[]
    }

    fn enhance(&self, ctx: &mut EnhanceContext<'_>) -> Result<(), EnhancerError>;
}

///
/// Generator
///

pub trait Generator: Send + Sync {
    fn name(&self) -> &'static str;

    fn target_versions(&self) -> &'static str {
        ALL_VERSIONS
    }

    fn reads(&self) -> &'static [DataSlot] {
        &[]
    }

    /// Wall-clock budget. A budgeted generator runs on its own worker and
    /// is abandoned once the budget passes; its artifacts are never read.
    fn budget(&self) -> Option<Duration> {
        None
    }

    fn generate(&self, ctx: &GenerateContext<'_>) -> Result<Vec<GeneratedOutput>, GeneratorError>;
}

type RuleFn = dyn Fn(&ValidateContext<'_>) -> Vec<ValidationFailure> + Send + Sync;

///
/// FnValidator
///
/// A validator built from a closure.
///

pub struct FnValidator {
    name: &'static str,
    target_versions: &'static str,
    rule: Box<RuleFn>,
}

impl FnValidator {
    pub fn new<F>(name: &'static str, rule: F) -> Self
    where
        F: Fn(&ValidateContext<'_>) -> Vec<ValidationFailure> + Send + Sync + 'static,
    {
        Self {
            name,
            target_versions: ALL_VERSIONS,
            rule: Box::new(rule),
        }
    }

    #[must_use]
    pub const fn for_versions(mut self, range: &'static str) -> Self {
        self.target_versions = range;
        self
    }
}

impl Validator for FnValidator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn target_versions(&self) -> &'static str {
        self.target_versions
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        (self.rule)(ctx)
    }
}

///
/// PluginManifest
///

pub struct PluginManifest {
    pub short_name: PluginId,
    pub target_version: SemVer,
    pub validators: Vec<Box<dyn Validator>>,
    pub enhancers: Vec<Box<dyn Enhancer>>,
    pub generators: Vec<Arc<dyn Generator>>,
}

impl PluginManifest {
    #[must_use]
    pub const fn new(short_name: PluginId, target_version: SemVer) -> Self {
        Self {
            short_name,
            target_version,
            validators: Vec::new(),
            enhancers: Vec::new(),
            generators: Vec::new(),
        }
    }

    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    #[must_use]
    pub fn enhancer(mut self, enhancer: impl Enhancer + 'static) -> Self {
        self.enhancers.push(Box::new(enhancer));
        self
    }

    #[must_use]
    pub fn generator(mut self, generator: impl Generator + 'static) -> Self {
        self.generators.push(Arc::new(generator));
        self
    }
}

impl fmt::Debug for PluginManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginManifest")
            .field("short_name", &self.short_name)
            .field("target_version", &self.target_version)
            .field(
                "validators",
                &self.validators.iter().map(|v| v.name()).collect::<Vec<_>>(),
            )
            .field(
                "enhancers",
                &self.enhancers.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .field(
                "generators",
                &self.generators.iter().map(|g| g.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
