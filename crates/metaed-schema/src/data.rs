//! Plugin-owned data attached to schema nodes.
//!
//! Every namespace, entity and property carries an [`ExtensionBag`]. A
//! plugin reads and writes it only through [`DataKey`] constants, which
//! bind a slot name to one concrete value type. Slots declared by a key
//! belong to the key's plugin; pipelines use [`DataSlot`] to describe the
//! data an enhancer or generator reads and writes.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{any::Any, collections::BTreeMap, fmt, marker::PhantomData, str::FromStr};
use thiserror::Error as ThisError;

///
/// UnknownPluginError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unknown plugin '{0}'")]
pub struct UnknownPluginError(pub String);

///
/// PluginId
///
/// Closed set of plugins known to this build of the compiler.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(try_from = "String", into = "String")]
#[remain::sorted]
pub enum PluginId {
    Handbook,
    PostgreSql,
    Relational,
    SqlServer,
    Unified,
    Xsd,
}

impl PluginId {
    pub const ALL: [Self; 6] = [
        Self::Handbook,
        Self::PostgreSql,
        Self::Relational,
        Self::SqlServer,
        Self::Unified,
        Self::Xsd,
    ];

    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Handbook => "edfiHandbook",
            Self::PostgreSql => "edfiOdsPostgresql",
            Self::Relational => "edfiOdsRelational",
            Self::SqlServer => "edfiOdsSqlServer",
            Self::Unified => "edfiUnified",
            Self::Xsd => "edfiXsd",
        }
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for PluginId {
    type Err = UnknownPluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.short_name() == s)
            .ok_or_else(|| UnknownPluginError(s.to_string()))
    }
}

impl TryFrom<String> for PluginId {
    type Error = UnknownPluginError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PluginId> for String {
    fn from(value: PluginId) -> Self {
        value.short_name().to_string()
    }
}

///
/// DataSlot
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{plugin}.{field}")]
pub struct DataSlot {
    pub plugin: PluginId,
    pub field: &'static str,
}

impl DataSlot {
    #[must_use]
    pub const fn new(plugin: PluginId, field: &'static str) -> Self {
        Self { plugin, field }
    }
}

///
/// DataKey
///
/// Typed handle onto one slot of an [`ExtensionBag`].
///

pub struct DataKey<T> {
    slot: DataSlot,
    _marker: PhantomData<fn() -> T>,
}

impl<T> DataKey<T> {
    #[must_use]
    pub const fn new(plugin: PluginId, field: &'static str) -> Self {
        Self {
            slot: DataSlot::new(plugin, field),
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn slot(&self) -> DataSlot {
        self.slot
    }
}

impl<T> Clone for DataKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DataKey<T> {}

impl<T> fmt::Debug for DataKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataKey({})", self.slot)
    }
}

///
/// ExtensionBag
///
/// Slots are created on first write and never removed.
///

#[derive(Default)]
pub struct ExtensionBag {
    values: BTreeMap<DataSlot, Box<dyn Any + Send + Sync>>,
}

impl ExtensionBag {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn get<T: Any>(&self, key: DataKey<T>) -> Option<&T> {
        self.values.get(&key.slot)?.downcast_ref()
    }

    pub fn get_mut<T: Any>(&mut self, key: DataKey<T>) -> Option<&mut T> {
        self.values.get_mut(&key.slot)?.downcast_mut()
    }

    pub fn insert<T: Any + Send + Sync>(&mut self, key: DataKey<T>, value: T) {
        self.values.insert(key.slot, Box::new(value));
    }

    /// Apply `f` to the slot's value, starting from `T::default()` when
    /// the slot is empty.
    pub fn update<T, F>(&mut self, key: DataKey<T>, f: F)
    where
        T: Any + Default + Send + Sync,
        F: FnOnce(&mut T),
    {
        let mut value = self
            .values
            .remove(&key.slot)
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map_or_else(T::default, |boxed| *boxed);

        f(&mut value);
        self.values.insert(key.slot, Box::new(value));
    }

    #[must_use]
    pub fn contains(&self, slot: DataSlot) -> bool {
        self.values.contains_key(&slot)
    }

    pub fn slots(&self) -> impl Iterator<Item = DataSlot> + '_ {
        self.values.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ExtensionBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.values.keys().map(ToString::to_string))
            .finish()
    }
}

///
/// TESTS
///
