//! XML Schema (XSD) for interchange documents: one schema file per
//! namespace.
//!
//! Descriptor references are simple types from 3.0 on and complex types
//! on 2.x targets; everything else is shared between the two.

pub mod data;
pub mod enhance;
pub mod generate;
pub mod model;

use metaed_build::plugin::PluginManifest;
use metaed_schema::{data::PluginId, version::SemVer};

/// Targets with string descriptor references.
pub const V3_OR_GREATER: &str = ">=3.0.0";

/// Targets with complex descriptor references.
pub const V2_ONLY: &str = "2.x";

/// XSD plugin manifest for a target version.
#[must_use]
pub fn manifest(target_version: SemVer) -> PluginManifest {
    PluginManifest::new(PluginId::Xsd, target_version)
        .enhancer(enhance::EntityTypeEnhancer)
        .enhancer(enhance::SchemaContainerEnhancer)
        .enhancer(enhance::SchemaContainerEnhancerV2)
        .generator(generate::XsdGenerator)
}
