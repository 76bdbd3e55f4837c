mod schema;
mod table;

pub use schema::SchemaGenerator;
pub use table::TableGenerator;

///
/// TESTS
///
