//! Programmatic schema construction.
//!
//! The builder assigns source positions as if each namespace were one
//! source file: a `Begin Namespace` line, one line per entity, property and
//! item, then an `End Namespace` line. Files are concatenated in the order
//! namespaces are added, which keeps source maps and the [`FileIndex`]
//! consistent.

mod entity;
mod property;

pub use entity::EntityBuilder;
pub use property::PropertyBuilder;

use crate::{
    node::{EntityDetails, Namespace, NodeError, Schema},
    source::{FileIndex, SourceMap},
};
use thiserror::Error as ThisError;

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error(transparent)]
    NodeError(#[from] NodeError),
}

///
/// NamespaceBuilder
///

#[derive(Debug)]
pub struct NamespaceBuilder {
    namespace_name: String,
    project_name: String,
    project_version: String,
    project_extension: String,
    is_extension: bool,
    dependencies: Vec<String>,
    entities: Vec<EntityBuilder>,
}

impl NamespaceBuilder {
    #[must_use]
    pub fn core(namespace_name: impl Into<String>) -> Self {
        Self {
            namespace_name: namespace_name.into(),
            project_name: "Ed-Fi".to_string(),
            project_version: "3.0.0".to_string(),
            project_extension: String::new(),
            is_extension: false,
            dependencies: Vec::new(),
            entities: Vec::new(),
        }
    }

    #[must_use]
    pub fn extension(namespace_name: impl Into<String>, project_extension: impl Into<String>) -> Self {
        let namespace_name = namespace_name.into();

        Self {
            project_name: namespace_name.clone(),
            project_version: "1.0.0".to_string(),
            project_extension: project_extension.into(),
            is_extension: true,
            ..Self::core(namespace_name)
        }
    }

    #[must_use]
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    #[must_use]
    pub fn project_version(mut self, version: impl Into<String>) -> Self {
        self.project_version = version.into();
        self
    }

    #[must_use]
    pub fn dependency(mut self, namespace_name: impl Into<String>) -> Self {
        self.dependencies.push(namespace_name.into());
        self
    }

    #[must_use]
    pub fn entity(mut self, entity: EntityBuilder) -> Self {
        self.entities.push(entity);
        self
    }
}

///
/// SchemaBuilder
///

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    namespaces: Vec<NamespaceBuilder>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn namespace(mut self, namespace: NamespaceBuilder) -> Self {
        self.namespaces.push(namespace);
        self
    }

    /// Build the schema. Namespaces are not yet initialised.
    pub fn build(self) -> Result<Schema, BuildError> {
        self.build_with_files().map(|(schema, _)| schema)
    }

    /// Build the schema and the file index describing its source layout.
    pub fn build_with_files(self) -> Result<(Schema, FileIndex), BuildError> {
        let mut schema = Schema::new();
        let mut files = FileIndex::new();
        let mut cursor = LineCursor::default();

        for builder in self.namespaces {
            let first_line = cursor.next_line();

            let mut namespace = Namespace::new(builder.namespace_name);
            namespace.project_name = builder.project_name;
            namespace.project_version = builder.project_version;
            namespace.project_extension = builder.project_extension;
            namespace.is_extension = builder.is_extension;
            namespace.dependency_names = builder.dependencies;

            for entity in builder.entities {
                namespace.add_entity(entity.finish(&mut cursor))?;
            }

            let last_line = cursor.next_line();
            files.push(
                format!("{0}/{0}.metaed", namespace.namespace_name),
                namespace.namespace_name.clone(),
                last_line - first_line + 1,
            );
            schema.add_namespace(namespace)?;
        }

        Ok((schema, files))
    }
}

///
/// LineCursor
///

#[derive(Debug, Default)]
pub(crate) struct LineCursor {
    line: u32,
}

impl LineCursor {
    pub(crate) const fn next_line(&mut self) -> u32 {
        self.line += 1;
        self.line
    }

    pub(crate) fn next(&mut self, column: u32, token: &str) -> SourceMap {
        SourceMap::new(self.next_line(), column, token)
    }
}

// Source maps for items held in entity details.
pub(crate) fn stamp_details(details: &mut EntityDetails, cursor: &mut LineCursor) {
    match details {
        EntityDetails::Descriptor { map_type_items: items } | EntityDetails::Enumeration { items } => {
            for item in items {
                item.source_map = cursor.next(4, &item.short_description);
            }
        }
        EntityDetails::Domain { items } | EntityDetails::Subdomain { items, .. } => {
            for item in items {
                item.source_map = cursor.next(4, &item.meta_ed_name);
            }
        }
        EntityDetails::Interchange {
            elements,
            identity_templates,
        } => {
            for item in elements.iter_mut().chain(identity_templates.iter_mut()) {
                item.source_map = cursor.next(4, &item.meta_ed_name);
            }
        }
        _ => {}
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModelType;

    #[test]
    fn namespaces_become_consecutive_files() {
        let (schema, files) = SchemaBuilder::new()
            .namespace(
                NamespaceBuilder::core("EdFi")
                    .entity(
                        EntityBuilder::domain_entity("Student")
                            .property(PropertyBuilder::integer("StudentId").identity()),
                    )
                    .entity(EntityBuilder::descriptor("Sex")),
            )
            .namespace(
                NamespaceBuilder::extension("Sample", "Sample")
                    .dependency("EdFi")
                    .entity(EntityBuilder::domain_entity_extension("Student")),
            )
            .build_with_files()
            .unwrap();

        // Begin, Student, StudentId, Sex, End
        assert_eq!(files.segments()[0].line_count, 5);
        assert_eq!(files.segments()[1].start_line, 6);

        let (_, extension) = schema
            .entities_of(ModelType::DomainEntityExtension)
            .next()
            .unwrap();
        let mapped = files.lookup(extension.source_map.line).unwrap();
        assert_eq!(mapped.file_path, "Sample/Sample.metaed");
        assert_eq!(mapped.line, 2);
    }

    #[test]
    fn duplicate_entities_fail_the_build() {
        let result = SchemaBuilder::new()
            .namespace(
                NamespaceBuilder::core("EdFi")
                    .entity(EntityBuilder::domain_entity("Student"))
                    .entity(EntityBuilder::domain_entity("Student")),
            )
            .build();

        assert!(matches!(
            result,
            Err(BuildError::NodeError(NodeError::DuplicateEntity { .. }))
        ));
    }
}
