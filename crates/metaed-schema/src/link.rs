//! Linking passes that attach resolved entity handles to the schema.
//!
//! Each pass reads the schema immutably to compute its links, then writes
//! them back. Every pass overwrites previous results, so re-running after a
//! schema change is safe. Unresolvable names are left unlinked; the
//! validation rules report them.

use crate::{
    node::{EntityRef, PropertyRef, Schema},
    resolve::Lookup,
};

///
/// LinkReport
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LinkReport {
    pub linked: usize,
    pub unresolved: usize,
}

impl LinkReport {
    const fn record(&mut self, found: bool) {
        if found {
            self.linked += 1;
        } else {
            self.unresolved += 1;
        }
    }
}

/// Resolve the base entity of every subclass and extension.
pub fn link_base_entities(schema: &mut Schema) -> LinkReport {
    let links: Vec<(EntityRef, Option<EntityRef>)> = schema
        .entities()
        .filter_map(|(r, entity)| {
            let base = entity.base.as_ref()?;
            let found = schema.resolve_any(
                &base.base_entity_name,
                entity.model_type.base_types(),
                r.namespace,
                Lookup::for_base(&base.base_entity_namespace_name),
            );

            Some((r, found))
        })
        .collect();

    let mut report = LinkReport::default();
    for (r, found) in links {
        report.record(found.is_some());
        if let Some(base) = schema.entity_mut(r).and_then(|e| e.base.as_mut()) {
            base.resolved = found;
        }
    }

    report
}

/// Resolve the target of every referential property.
pub fn link_property_references(schema: &mut Schema) -> LinkReport {
    let links: Vec<(PropertyRef, Option<EntityRef>)> = schema
        .properties()
        .filter(|(_, p)| p.is_reference())
        .map(|(r, p)| {
            let found = schema.resolve_any(
                p.referenced_name(),
                p.property_type.referenced_types(p.is_extension_override),
                r.entity.namespace,
                Lookup::for_reference(p.referenced_namespace_name.as_deref()),
            );

            (r, found)
        })
        .collect();

    let mut report = LinkReport::default();
    for (r, found) in links {
        report.record(found.is_some());
        if let Some(property) = schema.property_mut(r) {
            property.referenced_entity = found;
        }
    }

    report
}

/// Resolve domain, subdomain and interchange items.
pub fn link_entity_items(schema: &mut Schema) -> LinkReport {
    let links: Vec<(EntityRef, Vec<Option<EntityRef>>)> = schema
        .entities()
        .map(|(r, entity)| {
            let found = entity
                .entity_items()
                .map(|item| {
                    schema.resolve_any(
                        &item.meta_ed_name,
                        item.model_type.item_candidates(),
                        r.namespace,
                        Lookup::for_reference(item.referenced_namespace_name.as_deref()),
                    )
                })
                .collect::<Vec<_>>();

            (r, found)
        })
        .filter(|(_, found)| !found.is_empty())
        .collect();

    let mut report = LinkReport::default();
    for (r, found) in links {
        let Some(entity) = schema.entity_mut(r) else {
            continue;
        };
        for (item, target) in entity.entity_items_mut().zip(found) {
            report.record(target.is_some());
            item.resolved = target;
        }
    }

    report
}

///
/// TESTS
///
