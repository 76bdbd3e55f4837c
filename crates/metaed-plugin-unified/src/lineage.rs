use metaed_schema::node::{Entity, EntityRef, Schema};

/// Resolved bases of an entity, nearest first. Stops at the first
/// unresolved base or on a repeated entity.
pub(crate) fn base_chain<'a>(schema: &'a Schema, start: &Entity) -> Vec<(EntityRef, &'a Entity)> {
    let mut chain: Vec<(EntityRef, &'a Entity)> = Vec::new();
    let mut next = start.base_entity();

    while let Some(r) = next {
        if chain.iter().any(|(seen, _)| *seen == r) {
            break;
        }
        let Some(base) = schema.entity(r) else {
            break;
        };
        chain.push((r, base));
        next = base.base_entity();
    }

    chain
}

/// Namespace name of an entity, for messages.
pub(crate) fn namespace_of<'a>(schema: &'a Schema, entity: &Entity) -> &'a str {
    schema
        .namespace(entity.namespace)
        .map_or("", |ns| ns.namespace_name.as_str())
}

///
/// TESTS
///
