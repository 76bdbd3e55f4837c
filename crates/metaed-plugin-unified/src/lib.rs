//! The unified plugin: the structural rule catalog every build runs, plus
//! enhancers deriving model facts other plugins read (inverse base links,
//! effective identities, domain membership).

pub mod data;
pub mod enhance;
pub mod validate;

mod lineage;

use metaed_build::plugin::PluginManifest;
use metaed_schema::{data::PluginId, version::SemVer};

/// Unified plugin manifest for a target version.
#[must_use]
pub fn manifest(target_version: SemVer) -> PluginManifest {
    let mut manifest = PluginManifest::new(PluginId::Unified, target_version);
    manifest.validators = validate::validators();
    manifest.enhancers = enhance::enhancers();

    manifest
}
