use crate::{
    data::ExtensionBag,
    node::{DecimalBounds, EntityRef, IntegerBounds, StringBounds},
    source::SourceMap,
    types::{Cardinality, PropertyType},
};
use serde::Serialize;

///
/// PropertyBounds
///

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub enum PropertyBounds {
    #[default]
    None,
    Decimal(DecimalBounds),
    Integer(IntegerBounds),
    String(StringBounds),
}

///
/// IdentityRename
///
/// Marks a property that renames an identity property of the base entity.
///

#[derive(Clone, Debug, Serialize)]
pub struct IdentityRename {
    pub base_key_name: String,
    pub source_map: SourceMap,
}

///
/// Property
///

#[derive(Debug, Serialize)]
pub struct Property {
    pub meta_ed_name: String,
    pub property_type: PropertyType,

    /// Referenced type name when it differs from the property name
    /// (`shared string Foo named Bar`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_type_name: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub documentation: String,

    pub cardinality: Cardinality,
    pub is_part_of_identity: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_rename: Option<IdentityRename>,

    pub is_extension_override: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_namespace_name: Option<String>,

    #[serde(skip)]
    pub referenced_entity: Option<EntityRef>,

    pub bounds: PropertyBounds,
    pub source_map: SourceMap,

    #[serde(skip)]
    pub data: ExtensionBag,
}

impl Property {
    #[must_use]
    pub fn new(property_type: PropertyType, meta_ed_name: impl Into<String>) -> Self {
        Self {
            meta_ed_name: meta_ed_name.into(),
            property_type,
            referenced_type_name: None,
            role_name: String::new(),
            documentation: String::new(),
            cardinality: Cardinality::Required,
            is_part_of_identity: false,
            identity_rename: None,
            is_extension_override: false,
            referenced_namespace_name: None,
            referenced_entity: None,
            bounds: PropertyBounds::None,
            source_map: SourceMap::default(),
            data: ExtensionBag::new(),
        }
    }

    /// Name of the entity this property points at.
    #[must_use]
    pub fn referenced_name(&self) -> &str {
        self.referenced_type_name
            .as_deref()
            .unwrap_or(&self.meta_ed_name)
    }

    /// Role name prefixed to the property name, unless they are equal.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.role_name.is_empty() || self.role_name == self.meta_ed_name {
            self.meta_ed_name.clone()
        } else {
            format!("{}{}", self.role_name, self.meta_ed_name)
        }
    }

    /// True when the property names a namespace other than its own.
    #[must_use]
    pub fn has_explicit_namespace(&self) -> bool {
        self.referenced_namespace_name
            .as_deref()
            .is_some_and(|ns| !ns.is_empty())
    }

    #[must_use]
    pub const fn is_reference(&self) -> bool {
        self.property_type.is_reference()
    }
}

///
/// TESTS
///
