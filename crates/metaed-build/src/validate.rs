//! The validation engine: every plugin's validators, run once over the
//! linked schema.

use crate::plugin::{PluginManifest, ValidateContext};
use metaed_schema::{failure::ValidationFailure, node::Schema, version::satisfies};
use tracing::debug;

/// Run all applicable validators in plugin order, then declared order.
/// Failures keep the order each validator reports them in.
#[must_use]
pub fn run_validators(schema: &Schema, plugins: &[PluginManifest]) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();

    for manifest in plugins {
        let ctx = ValidateContext {
            schema,
            plugin: manifest.short_name,
            target_version: manifest.target_version,
        };

        for validator in &manifest.validators {
            if !satisfies(&manifest.target_version, validator.target_versions()) {
                debug!(
                    plugin = %manifest.short_name,
                    validator = validator.name(),
                    range = validator.target_versions(),
                    "validator skipped for target version"
                );
                continue;
            }

            failures.extend(validator.validate(&ctx));
        }
    }

    failures
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::FnValidator;
    use metaed_schema::{data::PluginId, version::SemVer};

    fn manifest(version: SemVer) -> PluginManifest {
        PluginManifest::new(PluginId::Unified, version)
            .validator(FnValidator::new("Always", |_| {
                vec![ValidationFailure::error("Always", "always", None)]
            }))
            .validator(
                FnValidator::new("ModernOnly", |_| {
                    vec![ValidationFailure::warning("ModernOnly", "modern", None)]
                })
                .for_versions(">=3.1.0"),
            )
    }

    #[test]
    fn gated_validators_are_skipped() {
        let schema = Schema::new();
        let failures = run_validators(&schema, &[manifest(SemVer::new(3, 0, 0))]);

        let names: Vec<_> = failures.iter().map(|f| f.validator_name).collect();
        assert_eq!(names, ["Always"]);
    }

    #[test]
    fn failures_follow_declared_order() {
        let schema = Schema::new();
        let failures = run_validators(&schema, &[manifest(SemVer::new(3, 1, 0))]);

        let names: Vec<_> = failures.iter().map(|f| f.validator_name).collect();
        assert_eq!(names, ["Always", "ModernOnly"]);
    }
}
