mod schema_name;
mod table;

pub use schema_name::NamespaceSchemaNameEnhancer;
pub use table::TableEnhancer;
