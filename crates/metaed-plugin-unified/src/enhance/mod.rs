//! Model-derived facts written to the unified extension bags.

pub mod domain;
pub mod identity;
pub mod subclass;

pub use domain::DomainItemEnhancer;
pub use identity::IdentityPropertyEnhancer;
pub use subclass::SubclassInverseReferenceEnhancer;

use metaed_build::plugin::Enhancer;

/// Unified enhancers in run order.
#[must_use]
pub fn enhancers() -> Vec<Box<dyn Enhancer>> {
    vec![
        Box::new(SubclassInverseReferenceEnhancer),
        Box::new(IdentityPropertyEnhancer),
        Box::new(DomainItemEnhancer),
    ]
}

///
/// TESTS
///

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::validate::tests::linked;
    use metaed_build::plugin::EnhanceContext;
    use metaed_schema::{build::SchemaBuilder, data::PluginId, node::Schema, version::SemVer};

    pub(crate) fn enhanced(enhancer: &dyn Enhancer, builder: SchemaBuilder) -> Schema {
        let mut schema = linked(builder);
        let mut ctx = EnhanceContext {
            schema: &mut schema,
            plugin: PluginId::Unified,
            target_version: SemVer::new(3, 1, 0),
        };
        enhancer.enhance(&mut ctx).unwrap();

        schema
    }

    #[test]
    fn writes_are_declared_once() {
        let mut slots = Vec::new();
        for enhancer in enhancers() {
            slots.extend_from_slice(enhancer.writes());
        }
        let count = slots.len();
        slots.sort();
        slots.dedup();

        assert_eq!(slots.len(), count);
    }
}
