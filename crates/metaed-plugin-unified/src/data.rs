use metaed_schema::{
    data::{DataKey, PluginId},
    node::{EntityRef, PropertyRef},
    types::PropertyType,
};
use serde::Serialize;

/// Subclasses of an entity, in schema order.
pub const SUBCLASSED_BY: DataKey<Vec<EntityRef>> = DataKey::new(PluginId::Unified, "subclassedBy");

/// Extensions of an entity, in schema order.
pub const EXTENDED_BY: DataKey<Vec<EntityRef>> = DataKey::new(PluginId::Unified, "extendedBy");

/// Effective identity of an identity-bearing entity.
pub const IDENTITY: DataKey<Vec<IdentityProperty>> = DataKey::new(PluginId::Unified, "identityProperties");

/// Resolved top-level entities of a domain or subdomain.
pub const DOMAIN_ENTITIES: DataKey<Vec<EntityRef>> = DataKey::new(PluginId::Unified, "domainEntities");

/// Subdomains of a domain.
pub const SUBDOMAINS: DataKey<Vec<EntityRef>> = DataKey::new(PluginId::Unified, "subdomains");

///
/// IdentityProperty
///
/// One member of an entity's effective identity. `source` is the
/// declaring property, which for inherited members lives on a base entity.
///

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IdentityProperty {
    pub name: String,
    pub property_type: PropertyType,

    #[serde(skip)]
    pub source: PropertyRef,

    #[serde(skip)]
    pub referenced_entity: Option<EntityRef>,
}
