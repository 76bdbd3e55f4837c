//! SQL Server DDL for the relational model, plus a manifest of every
//! artifact produced.

pub mod generate;
pub mod sql;

use metaed_build::plugin::PluginManifest;
use metaed_schema::{data::PluginId, version::SemVer};

/// Folder holding the structure scripts of a namespace.
pub const STRUCTURE_FOLDER: &str = "Database/SQLServer/ODS/Structure";

/// SQL Server plugin manifest for a target version.
#[must_use]
pub fn manifest(target_version: SemVer) -> PluginManifest {
    PluginManifest::new(PluginId::SqlServer, target_version)
        .generator(generate::SchemaGenerator)
        .generator(generate::TableGenerator)
        .generator(generate::ManifestGenerator)
}
