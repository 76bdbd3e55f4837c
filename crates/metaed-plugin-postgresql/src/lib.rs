//! PostgreSQL DDL for the relational model.

pub mod generate;
pub mod sql;

use metaed_build::plugin::PluginManifest;
use metaed_schema::{data::PluginId, version::SemVer};

/// Folder holding the structure scripts of a namespace.
pub const STRUCTURE_FOLDER: &str = "Database/PostgreSQL/ODS/Structure";

/// PostgreSQL plugin manifest for a target version.
#[must_use]
pub fn manifest(target_version: SemVer) -> PluginManifest {
    PluginManifest::new(PluginId::PostgreSql, target_version)
        .generator(generate::SchemaGenerator)
        .generator(generate::TableGenerator)
}
