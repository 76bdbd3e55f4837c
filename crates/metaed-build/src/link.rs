use metaed_schema::{
    link::{LinkReport, link_base_entities, link_entity_items, link_property_references},
    node::Schema,
};
use tracing::debug;

///
/// CoreLinker
///
/// A linking pass run once, before validation, for every build.
///

#[derive(Clone, Copy, Debug)]
pub struct CoreLinker {
    pub name: &'static str,
    pub run: fn(&mut Schema) -> LinkReport,
}

/// Core linking passes in run order.
pub const CORE_LINKERS: [CoreLinker; 3] = [
    CoreLinker {
        name: "BaseEntityLinker",
        run: link_base_entities,
    },
    CoreLinker {
        name: "PropertyReferenceLinker",
        run: link_property_references,
    },
    CoreLinker {
        name: "EntityItemLinker",
        run: link_entity_items,
    },
];

/// Run every core linker. Unresolved names are left for validators.
pub fn link_schema(schema: &mut Schema) {
    for linker in CORE_LINKERS {
        let report = (linker.run)(schema);

        debug!(
            linker = linker.name,
            linked = report.linked,
            unresolved = report.unresolved,
            "core linker finished"
        );
    }
}
