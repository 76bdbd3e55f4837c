use metaed_build::plugin::{ValidateContext, Validator};
use metaed_schema::{
    failure::{FailureCategory, SeverityByVersion, ValidationFailure},
    node::{Entity, EntityItem},
    types::{ModelType, NameGroup},
};
use std::collections::{BTreeMap, BTreeSet};

///
/// MostEntitiesCannotHaveSameName
///
/// Within a namespace, kinds sharing a name group may not reuse a name.
///

#[derive(Clone, Copy, Debug)]
pub struct SameNameInNamespace;

impl Validator for SameNameInNamespace {
    fn name(&self) -> &'static str {
        "MostEntitiesCannotHaveSameName"
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for ns in ctx.schema.namespaces() {
            let mut by_name: BTreeMap<(NameGroup, &str), Vec<&Entity>> = BTreeMap::new();
            for (_, entity) in ns.entities() {
                if let Some(group) = entity.model_type.name_group() {
                    by_name
                        .entry((group, entity.meta_ed_name.as_str()))
                        .or_default()
                        .push(entity);
                }
            }

            // report in declaration order
            let mut duplicated: Vec<&Entity> = by_name
                .into_values()
                .filter(|entities| entities.len() > 1)
                .flatten()
                .collect();
            duplicated.sort_by_key(|e| e.source_map.line);

            for entity in duplicated {
                failures.push(ValidationFailure::error(
                    self.name(),
                    format!(
                        "{} named {} is a duplicate declaration of that name in namespace {}.",
                        entity.model_type.label(),
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
/// EntitiesCannotDuplicateNamesInDependencyNamespaces
///
/// A name may not be declared again, in the same name group, by a
/// namespace that can see it through a direct dependency.
///

#[derive(Clone, Copy, Debug)]
pub struct SameNameInDependency {
    pub severity: SeverityByVersion,
}

impl Default for SameNameInDependency {
    fn default() -> Self {
        Self {
            severity: SeverityByVersion::new(">=3.0.0", FailureCategory::Error, FailureCategory::Warning),
        }
    }
}

impl Validator for SameNameInDependency {
    fn name(&self) -> &'static str {
        "EntitiesCannotDuplicateNamesInDependencyNamespaces"
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let schema = ctx.schema;
        let category = self.severity.category(&ctx.target_version);
        let mut failures = Vec::new();

        for ns in schema.namespaces() {
            for (_, entity) in ns.entities() {
                let Some(group) = entity.model_type.name_group() else {
                    continue;
                };

                for dependency in ns.dependencies().iter().filter_map(|id| schema.namespace(*id)) {
                    let collision = dependency
                        .entities()
                        .find(|(_, other)| {
                            other.meta_ed_name == entity.meta_ed_name
                                && other.model_type.name_group() == Some(group)
                        });
                    let Some((_, other)) = collision else {
                        continue;
                    };

                    failures.push(ValidationFailure::new(
                        self.name(),
                        category,
                        format!(
                            "{} {} in namespace {} has the same name as {} {} in dependency namespace {}.",
                            entity.model_type.label(),
                            entity.meta_ed_name,
                            ns.namespace_name,
                            other.model_type.label(),
                            other.meta_ed_name,
                            dependency.namespace_name
                        ),
                        Some(&entity.source_map),
                    ));
                }
            }
        }

        failures
    }
}

///
/// UniqueEnumerationItems
///
/// Enumeration items or descriptor map-type items with unique short
/// descriptions.
///

#[derive(Clone, Copy, Debug)]
pub struct UniqueEnumerationItems {
    pub name: &'static str,
    pub model_type: ModelType,
}

impl Validator for UniqueEnumerationItems {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for (_, entity) in ctx.schema.entities_of(self.model_type) {
            for item in repeated(entity.enumeration_items(), |i| i.short_description.as_str()) {
                failures.push(ValidationFailure::error(
                    self.name,
                    format!(
                        "{} {} declares duplicate item {}.",
                        self.model_type.label(),
                        entity.meta_ed_name,
                        item.short_description
                    ),
                    Some(&item.source_map),
                ));
            }
        }

        failures
    }
}

/// Picks the items of a domain, subdomain or interchange to check.
pub type ItemSelector = fn(&Entity) -> &[EntityItem];

///
/// UniqueEntityItems
///

#[derive(Clone, Copy, Debug)]
pub struct UniqueEntityItems {
    pub name: &'static str,
    pub model_type: ModelType,

    /// Item noun for messages.
    pub noun: &'static str,
    pub select: ItemSelector,
}

impl Validator for UniqueEntityItems {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for (_, entity) in ctx.schema.entities_of(self.model_type) {
            for item in repeated((self.select)(entity), |i| i.meta_ed_name.as_str()) {
                failures.push(ValidationFailure::error(
                    self.name,
                    format!(
                        "{} {} declares duplicate {} {}.",
                        self.model_type.label(),
                        entity.meta_ed_name,
                        self.noun,
                        item.meta_ed_name
                    ),
                    Some(&item.source_map),
                ));
            }
        }

        failures
    }
}

// Every item whose key was already seen earlier in the slice.
fn repeated<'a, T>(items: &'a [T], key: impl Fn(&'a T) -> &'a str) -> Vec<&'a T> {
    let mut seen = BTreeSet::new();

    items.iter().filter(|item| !seen.insert(key(*item))).collect()
}

///
/// TESTS
///
