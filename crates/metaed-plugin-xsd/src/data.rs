use crate::model::{EntityTypes, SchemaContainer};
use metaed_schema::data::{DataKey, PluginId};

/// Schema types derived from one entity.
pub const ENTITY_TYPES: DataKey<EntityTypes> = DataKey::new(PluginId::Xsd, "entityTypes");

/// The assembled schema of a namespace.
pub const SCHEMA_CONTAINER: DataKey<SchemaContainer> = DataKey::new(PluginId::Xsd, "schemaContainer");
