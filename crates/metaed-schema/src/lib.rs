//! Schema model for MetaEd: namespaces, entities and properties, plus the
//! version matcher, source mapping, cross-namespace resolution and linking
//! that the build pipeline and plugins share.

pub mod build;
pub mod data;
pub mod failure;
pub mod link;
pub mod node;
pub mod resolve;
pub mod source;
pub mod types;
pub mod version;

use crate::{
    build::BuildError,
    data::UnknownPluginError,
    node::{NamespaceError, NodeError},
    version::VersionError,
};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        build::{EntityBuilder, NamespaceBuilder, PropertyBuilder, SchemaBuilder},
        data::{DataKey, DataSlot, ExtensionBag, PluginId},
        failure::{FailureCategory, SeverityByVersion, ValidationFailure},
        node::*,
        resolve::Lookup,
        source::{FileIndex, FileMap, SourceMap},
        types::{Cardinality, ModelType, NameGroup, PropertyType},
        version::{SemVer, VersionReq, satisfies},
    };
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    BuildError(#[from] BuildError),

    #[error(transparent)]
    NamespaceError(#[from] NamespaceError),

    #[error(transparent)]
    NodeError(#[from] NodeError),

    #[error(transparent)]
    UnknownPluginError(#[from] UnknownPluginError),

    #[error(transparent)]
    VersionError(#[from] VersionError),
}
