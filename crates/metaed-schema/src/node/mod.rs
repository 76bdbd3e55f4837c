mod entity;
mod item;
mod namespace;
mod property;
mod schema;

pub use entity::*;
pub use item::*;
pub use namespace::*;
pub use property::*;
pub use schema::*;

use crate::types::ModelType;
use derive_more::Display;
use serde::Serialize;
use thiserror::Error as ThisError;

///
/// NodeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum NodeError {
    #[error("duplicate namespace '{0}'")]
    DuplicateNamespace(String),

    #[error("namespace '{namespace}' already holds {model_type} '{name}'")]
    DuplicateEntity {
        namespace: String,
        model_type: ModelType,
        name: String,
    },

    #[error("namespace id {0} is out of range")]
    NamespaceOutOfRange(NamespaceId),
}

///
/// NamespaceId
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct NamespaceId(pub usize);

///
/// EntityId
///
/// Position of an entity within its namespace, in declaration order.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct EntityId(pub usize);

///
/// EntityRef
///
/// Schema-wide handle to an entity. Stable for the lifetime of a schema.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[display("{namespace}/{entity}")]
pub struct EntityRef {
    pub namespace: NamespaceId,
    pub entity: EntityId,
}

impl EntityRef {
    #[must_use]
    pub const fn new(namespace: NamespaceId, entity: EntityId) -> Self {
        Self { namespace, entity }
    }
}

///
/// PropertyRef
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[display("{entity}#{index}")]
pub struct PropertyRef {
    pub entity: EntityRef,
    pub index: usize,
}

impl PropertyRef {
    #[must_use]
    pub const fn new(entity: EntityRef, index: usize) -> Self {
        Self { entity, index }
    }
}
