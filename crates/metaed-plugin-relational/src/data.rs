use crate::model::Table;
use metaed_schema::data::{DataKey, PluginId};

/// Database schema name of a namespace.
pub const SCHEMA_NAME: DataKey<String> = DataKey::new(PluginId::Relational, "schemaName");

/// Tables derived from an entity: its main table first, then child tables
/// in property order.
pub const TABLES: DataKey<Vec<Table>> = DataKey::new(PluginId::Relational, "tables");
