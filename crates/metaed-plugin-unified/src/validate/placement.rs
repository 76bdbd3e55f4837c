use metaed_build::plugin::{ValidateContext, Validator};
use metaed_schema::{failure::ValidationFailure, types::ModelType};

///
/// Placement
///
/// Kinds that belong only to extension namespaces, or only to core.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Placement {
    CoreOnly,
    ExtensionOnly,
}

///
/// PlacementRule
///

#[derive(Clone, Copy, Debug)]
pub struct PlacementRule {
    pub name: &'static str,
    pub model_type: ModelType,
    pub placement: Placement,
}

impl Validator for PlacementRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for ns in ctx.schema.namespaces() {
            let misplaced = match self.placement {
                Placement::CoreOnly => ns.is_extension,
                Placement::ExtensionOnly => !ns.is_extension,
            };
            if !misplaced {
                continue;
            }

            let kind = if ns.is_extension { "extension" } else { "core" };
            for (_, entity) in ns.entities_of(self.model_type) {
                failures.push(ValidationFailure::error(
                    self.name,
                    format!(
                        "{} {} is not valid in {kind} namespace {}.",
                        self.model_type.label(),
                        entity.meta_ed_name,
                        ns.namespace_name
                    ),
                    Some(&entity.source_map),
                ));
            }
        }

        failures
    }
}

///
/// TESTS
///
