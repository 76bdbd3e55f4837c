mod container;
mod entity_type;

pub use container::{SchemaContainerEnhancer, SchemaContainerEnhancerV2};
pub use entity_type::EntityTypeEnhancer;

///
/// TESTS
///
