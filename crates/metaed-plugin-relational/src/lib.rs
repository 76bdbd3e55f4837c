//! Dialect-neutral relational model of a MetaEd schema.
//!
//! Produces no artifacts of its own. Dialect plugins read the tables it
//! attaches to entities and render them.

pub mod data;
pub mod enhance;
pub mod model;

use metaed_build::plugin::PluginManifest;
use metaed_schema::{data::PluginId, version::SemVer};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        data::{SCHEMA_NAME, TABLES},
        model::{Column, ColumnType, ForeignKey, Table},
    };
}

/// Relational plugin manifest for a target version.
#[must_use]
pub fn manifest(target_version: SemVer) -> PluginManifest {
    PluginManifest::new(PluginId::Relational, target_version)
        .enhancer(enhance::NamespaceSchemaNameEnhancer)
        .enhancer(enhance::TableEnhancer)
}
