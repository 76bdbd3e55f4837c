//! The build pipeline.
//!
//! `Loaded -> NamespacesInitialized -> Linked -> Validated ->
//! {Enhanced(plugin) -> Generated(plugin)}* -> Done`
//!
//! Configuration problems are fatal and returned before any phase runs.
//! Validation, enhancer and generator failures are recorded on the state.
//! Budgeted generators run on detached workers with a receive deadline.

use crate::{
    link::link_schema,
    output::{BuildWarning, EnhancerResult, GeneratedOutput, GeneratorResult},
    plugin::{EnhanceContext, GenerateContext, Generator, GeneratorError, PluginManifest},
    state::{BuildPhase, BuildState},
    validate::run_validators,
};
use metaed_config_build::{BuildConfig, ConfigError};
use metaed_schema::{
    data::{DataSlot, PluginId, UnknownPluginError},
    node::{Namespace, NamespaceError, NodeError, Schema},
    version::{SemVer, VersionError, VersionReq, satisfies},
};
use std::{
    collections::BTreeSet,
    sync::{
        Arc,
        mpsc::{self, RecvTimeoutError},
    },
    thread,
    time::{Duration, Instant},
};
use thiserror::Error as ThisError;
use tracing::{debug, info, warn};

///
/// PipelineError
///

#[derive(Debug, ThisError)]
pub enum PipelineError {
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error("plugin {0} is registered more than once")]
    DuplicatePlugin(PluginId),

    #[error("{component} declares an invalid target range: {source}")]
    InvalidComponentRange {
        component: &'static str,
        source: VersionError,
    },

    #[error("no target version available for plugin {0}")]
    MissingTargetVersion(PluginId),

    #[error(transparent)]
    NamespaceError(#[from] NamespaceError),

    #[error(transparent)]
    NodeError(#[from] NodeError),

    #[error("the schema is shared and cannot be prepared for a build")]
    SchemaShared,

    #[error("{plugin} component {component} reads {slot} before anything writes it")]
    UnsatisfiedDataDependency {
        plugin: PluginId,
        component: &'static str,
        slot: DataSlot,
    },

    #[error(transparent)]
    UnknownPluginError(#[from] UnknownPluginError),

    #[error(transparent)]
    VersionError(#[from] VersionError),
}

/// Target version for a plugin: its configured version, else the build
/// default, else the core project's version.
pub fn negotiate_target_version(
    config: &BuildConfig,
    plugin: PluginId,
) -> Result<SemVer, PipelineError> {
    let configured = config
        .plugins
        .iter()
        .find(|p| p.short_name == plugin.short_name())
        .and_then(|p| p.target_version.as_deref());

    let text = configured
        .or(config.default_plugin_version.as_deref())
        .or_else(|| config.core_project_version())
        .ok_or(PipelineError::MissingTargetVersion(plugin))?;

    Ok(SemVer::parse(text)?)
}

/// Plugin order named by configuration, or `None` when the configuration
/// leaves it to the registry.
pub fn configured_plugin_order(config: &BuildConfig) -> Result<Option<Vec<PluginId>>, PipelineError> {
    if config.plugins.is_empty() {
        return Ok(None);
    }

    let order = config
        .plugins
        .iter()
        .map(|p| p.short_name.parse::<PluginId>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(order))
}

/// Run a build to completion.
pub fn run_build(mut state: BuildState) -> Result<BuildState, PipelineError> {
    info!(
        namespaces = state.schema.namespace_count(),
        plugins = state.plugins.len(),
        "build started"
    );

    // Phase 0: fatal configuration checks.
    state.config.check()?;
    check_plugins(&state.plugins)?;

    // Phase 1: namespaces and dependency order.
    let schema = Arc::get_mut(&mut state.schema).ok_or(PipelineError::SchemaShared)?;
    apply_project_config(&state.config, schema)?;
    schema.initialize_namespaces()?;
    enter(&mut state, BuildPhase::NamespacesInitialized);

    // Phase 2: core linking.
    let schema = Arc::get_mut(&mut state.schema).ok_or(PipelineError::SchemaShared)?;
    link_schema(schema);
    enter(&mut state, BuildPhase::Linked);

    // Phase 3: validation.
    state.validation_failures = run_validators(&state.schema, &state.plugins);
    enter(&mut state, BuildPhase::Validated);

    let error_count = state.errors().count();
    info!(
        failures = state.validation_failures.len(),
        errors = error_count,
        "validation finished"
    );

    if state.config.stop_on_validation_error && error_count > 0 {
        info!("validation errors present, skipping enhancement and generation");
        return Ok(finish(state));
    }

    // Phase 4: per plugin, enhancers then generators.
    let BuildState {
        schema,
        plugins,
        enhancer_results,
        generator_results,
        warnings,
        phase,
        ..
    } = &mut state;

    for manifest in plugins.iter() {
        match Arc::get_mut(schema) {
            Some(schema) => run_enhancers(manifest, schema, enhancer_results, warnings),
            None => skip_enhancers(manifest, enhancer_results, warnings),
        }
        *phase = BuildPhase::Enhanced(manifest.short_name);
        info!(phase = %phase, "phase entered");

        run_generators(manifest, schema, generator_results, warnings);
        *phase = BuildPhase::Generated(manifest.short_name);
        info!(phase = %phase, "phase entered");
    }

    Ok(finish(state))
}

fn enter(state: &mut BuildState, phase: BuildPhase) {
    state.phase = phase;
    info!(phase = %phase, "phase entered");
}

fn finish(mut state: BuildState) -> BuildState {
    let BuildState {
        validation_failures,
        file_index,
        ..
    } = &mut state;
    for failure in validation_failures.iter_mut() {
        failure.stamp_file_map(file_index);
    }

    enter(&mut state, BuildPhase::Done);
    info!(
        outputs = state.outputs().count(),
        warnings = state.warnings.len(),
        "build finished"
    );

    state
}

// Duplicate plugins, malformed component ranges and data dependencies that
// the declared plugin order cannot satisfy.
fn check_plugins(plugins: &[PluginManifest]) -> Result<(), PipelineError> {
    let mut seen = BTreeSet::new();
    for manifest in plugins {
        if !seen.insert(manifest.short_name) {
            return Err(PipelineError::DuplicatePlugin(manifest.short_name));
        }
    }

    let ranges = plugins.iter().flat_map(|m| {
        let validators = m.validators.iter().map(|v| (v.name(), v.target_versions()));
        let enhancers = m.enhancers.iter().map(|e| (e.name(), e.target_versions()));
        let generators = m.generators.iter().map(|g| (g.name(), g.target_versions()));

        validators.chain(enhancers).chain(generators)
    });
    for (component, range) in ranges {
        VersionReq::parse(range)
            .map_err(|source| PipelineError::InvalidComponentRange { component, source })?;
    }

    let mut written: BTreeSet<DataSlot> = BTreeSet::new();
    for manifest in plugins {
        let enabled = |range: &str| satisfies(&manifest.target_version, range);

        for enhancer in manifest.enhancers.iter().filter(|e| enabled(e.target_versions())) {
            require_slots(manifest.short_name, enhancer.name(), enhancer.reads(), &written)?;
            written.extend(enhancer.writes().iter().copied());
        }
        for generator in manifest.generators.iter().filter(|g| enabled(g.target_versions())) {
            require_slots(manifest.short_name, generator.name(), generator.reads(), &written)?;
        }
    }

    Ok(())
}

fn require_slots(
    plugin: PluginId,
    component: &'static str,
    reads: &[DataSlot],
    written: &BTreeSet<DataSlot>,
) -> Result<(), PipelineError> {
    match reads.iter().find(|slot| !written.contains(slot)) {
        Some(slot) => Err(PipelineError::UnsatisfiedDataDependency {
            plugin,
            component,
            slot: *slot,
        }),
        None => Ok(()),
    }
}

// Configured projects override the namespace metadata and dependencies the
// front end declared. A project without any entities still becomes a
// namespace.
fn apply_project_config(config: &BuildConfig, schema: &mut Schema) -> Result<(), PipelineError> {
    for project in &config.projects {
        let id = match schema.namespace_id(&project.namespace_name) {
            Some(id) => id,
            None => {
                debug!(namespace = %project.namespace_name, "adding empty project namespace");
                schema.add_namespace(Namespace::new(project.namespace_name.clone()))?
            }
        };

        if let Some(ns) = schema.namespace_mut(id) {
            ns.project_name.clone_from(&project.project_name);
            ns.project_version.clone_from(&project.project_version);
            ns.project_extension.clone_from(&project.project_extension);
            ns.is_extension = project.is_extension();
        }
        schema.set_dependency_names(id, project.dependencies.clone())?;
    }

    Ok(())
}

fn run_enhancers(
    manifest: &PluginManifest,
    schema: &mut Schema,
    results: &mut Vec<EnhancerResult>,
    warnings: &mut Vec<BuildWarning>,
) {
    let plugin = manifest.short_name;

    for enhancer in &manifest.enhancers {
        if !satisfies(&manifest.target_version, enhancer.target_versions()) {
            debug!(
                plugin = %plugin,
                enhancer = enhancer.name(),
                range = enhancer.target_versions(),
                "enhancer skipped for target version"
            );
            continue;
        }

        let mut ctx = EnhanceContext {
            schema: &mut *schema,
            plugin,
            target_version: manifest.target_version,
        };
        let outcome = enhancer.enhance(&mut ctx);

        let message = match outcome {
            Ok(()) => None,
            Err(err) => {
                let message = err.to_string();
                warn!(plugin = %plugin, enhancer = enhancer.name(), "enhancer failed: {message}");
                warnings.push(BuildWarning::EnhancerFailed {
                    plugin,
                    enhancer: enhancer.name(),
                    message: message.clone(),
                });
                Some(message)
            }
        };

        results.push(EnhancerResult {
            enhancer_name: enhancer.name(),
            plugin,
            success: message.is_none(),
            message,
        });
    }
}

// An abandoned generator worker still holds the schema, so nothing can
// write to it.
fn skip_enhancers(
    manifest: &PluginManifest,
    results: &mut Vec<EnhancerResult>,
    warnings: &mut Vec<BuildWarning>,
) {
    let plugin = manifest.short_name;
    let enabled = manifest
        .enhancers
        .iter()
        .filter(|e| satisfies(&manifest.target_version, e.target_versions()));

    for enhancer in enabled {
        let message = "schema is still held by an abandoned generator".to_string();
        warn!(plugin = %plugin, enhancer = enhancer.name(), "enhancer skipped: {message}");
        warnings.push(BuildWarning::EnhancerFailed {
            plugin,
            enhancer: enhancer.name(),
            message: message.clone(),
        });
        results.push(EnhancerResult {
            enhancer_name: enhancer.name(),
            plugin,
            success: false,
            message: Some(message),
        });
    }
}

fn run_generators(
    manifest: &PluginManifest,
    schema: &Arc<Schema>,
    results: &mut Vec<GeneratorResult>,
    warnings: &mut Vec<BuildWarning>,
) {
    let plugin = manifest.short_name;
    let mut produced: Vec<GeneratorResult> = Vec::new();

    for generator in &manifest.generators {
        if !satisfies(&manifest.target_version, generator.target_versions()) {
            debug!(
                plugin = %plugin,
                generator = generator.name(),
                range = generator.target_versions(),
                "generator skipped for target version"
            );
            continue;
        }

        let started = Instant::now();
        let outcome = match generator.budget() {
            Some(budget) => generate_with_deadline(
                generator,
                schema,
                manifest.target_version,
                plugin,
                produced.clone(),
                budget,
            ),
            None => Some(generator.generate(&GenerateContext {
                schema,
                plugin,
                target_version: manifest.target_version,
                prior: &produced,
            })),
        };
        let elapsed = started.elapsed();

        let mut result = GeneratorResult {
            generator_name: generator.name(),
            plugin,
            outputs: Vec::new(),
            diagnostic: None,
        };

        match outcome {
            Some(Ok(outputs)) => {
                debug!(
                    plugin = %plugin,
                    generator = generator.name(),
                    outputs = outputs.len(),
                    ?elapsed,
                    "generator finished"
                );
                result.outputs = outputs;
            }
            Some(Err(err)) => {
                let message = err.to_string();
                warn!(plugin = %plugin, generator = generator.name(), "generator failed: {message}");
                result.diagnostic = Some(message.clone());
                warnings.push(BuildWarning::GeneratorFailed {
                    plugin,
                    generator: generator.name(),
                    message,
                });
            }
            None => {
                let budget = generator.budget().unwrap_or_default();
                warn!(
                    plugin = %plugin,
                    generator = generator.name(),
                    ?elapsed,
                    ?budget,
                    "generator exceeded its budget and was abandoned"
                );
                result.diagnostic = Some(format!(
                    "exceeded budget of {budget:?} (abandoned after {elapsed:?})"
                ));
                warnings.push(BuildWarning::GeneratorOverBudget {
                    plugin,
                    generator: generator.name(),
                    elapsed,
                    budget,
                });
            }
        }

        produced.push(result);
    }

    results.extend(produced);
}

// Runs one generator on a detached worker and waits at most `budget` for
// its result. `None` means the deadline passed; the worker is left to
// finish on its own and whatever it sends is dropped.
fn generate_with_deadline(
    generator: &Arc<dyn Generator>,
    schema: &Arc<Schema>,
    target_version: SemVer,
    plugin: PluginId,
    prior: Vec<GeneratorResult>,
    budget: Duration,
) -> Option<Result<Vec<GeneratedOutput>, GeneratorError>> {
    let (tx, rx) = mpsc::channel();
    let worker = Arc::clone(generator);
    let shared = Arc::clone(schema);

    let spawned = thread::Builder::new()
        .name(format!("generator-{}", generator.name()))
        .spawn(move || {
            let ctx = GenerateContext {
                schema: &shared,
                plugin,
                target_version,
                prior: &prior,
            };
            // the receiver is gone once the deadline has passed
            let _ = tx.send(worker.generate(&ctx));
        });

    if let Err(err) = spawned {
        return Some(Err(GeneratorError::Failed(format!(
            "worker could not be started: {err}"
        ))));
    }

    match rx.recv_timeout(budget) {
        Ok(outcome) => Some(outcome),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => {
            Some(Err(GeneratorError::Failed("generator worker panicked".into())))
        }
    }
}

///
/// TESTS
///
