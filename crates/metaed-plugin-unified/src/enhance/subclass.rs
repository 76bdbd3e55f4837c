use crate::data::{EXTENDED_BY, SUBCLASSED_BY};
use metaed_build::plugin::{EnhanceContext, Enhancer, EnhancerError};
use metaed_schema::{data::DataSlot, node::EntityRef};
use tracing::debug;

const WRITES: &[DataSlot] = &[SUBCLASSED_BY.slot(), EXTENDED_BY.slot()];

///
/// SubclassInverseReferenceEnhancer
///
/// Records every linked subclass and extension on its base entity.
///

#[derive(Clone, Copy, Debug)]
pub struct SubclassInverseReferenceEnhancer;

impl Enhancer for SubclassInverseReferenceEnhancer {
    fn name(&self) -> &'static str {
        "SubclassInverseReferenceEnhancer"
    }

    fn writes(&self) -> &'static [DataSlot] {
        WRITES
    }

    fn enhance(&self, ctx: &mut EnhanceContext<'_>) -> Result<(), EnhancerError> {
        let links: Vec<(EntityRef, EntityRef, bool)> = ctx
            .schema
            .entities()
            .filter_map(|(r, entity)| {
                let base = entity.base_entity()?;

                Some((base, r, entity.model_type.is_extension()))
            })
            .collect();

        debug!(links = links.len(), "recording inverse base references");

        for (base, child, is_extension) in links {
            let key = if is_extension { EXTENDED_BY } else { SUBCLASSED_BY };
            let entity = ctx.schema.entity_mut(base).ok_or_else(|| {
                EnhancerError::Failed(format!("linked base {base:?} is not in the schema"))
            })?;

            entity.data.update(key, |children| children.push(child));
        }

        Ok(())
    }
}

///
/// TESTS
///
