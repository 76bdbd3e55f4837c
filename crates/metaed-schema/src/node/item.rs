use crate::{node::EntityRef, source::SourceMap, types::ModelType};
use serde::Serialize;

///
/// EntityItem
///
/// A named reference listed inside a domain, subdomain or interchange.
///

#[derive(Clone, Debug, Serialize)]
pub struct EntityItem {
    pub meta_ed_name: String,
    pub model_type: ModelType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_namespace_name: Option<String>,

    pub source_map: SourceMap,

    #[serde(skip)]
    pub resolved: Option<EntityRef>,
}

impl EntityItem {
    #[must_use]
    pub fn new(model_type: ModelType, meta_ed_name: impl Into<String>) -> Self {
        Self {
            meta_ed_name: meta_ed_name.into(),
            model_type,
            referenced_namespace_name: None,
            source_map: SourceMap::default(),
            resolved: None,
        }
    }
}

///
/// EnumerationItem
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EnumerationItem {
    pub short_description: String,
    pub documentation: String,
    pub source_map: SourceMap,
}

///
/// IntegerBounds
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct IntegerBounds {
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
}

impl IntegerBounds {
    #[must_use]
    pub const fn is_inverted(&self) -> bool {
        matches!((self.min_value, self.max_value), (Some(min), Some(max)) if min > max)
    }
}

///
/// DecimalBounds
///

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DecimalBounds {
    pub total_digits: Option<u32>,
    pub decimal_places: Option<u32>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl DecimalBounds {
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        matches!((self.min_value, self.max_value), (Some(min), Some(max)) if min > max)
    }

    /// More decimal places than total digits.
    #[must_use]
    pub const fn has_excess_places(&self) -> bool {
        matches!((self.total_digits, self.decimal_places), (Some(total), Some(places)) if places > total)
    }
}

///
/// StringBounds
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StringBounds {
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
}

impl StringBounds {
    #[must_use]
    pub const fn is_inverted(&self) -> bool {
        matches!((self.min_length, self.max_length), (Some(min), Some(max)) if min > max)
    }
}
