use crate::{
    data::ExtensionBag,
    node::{
        DecimalBounds, EntityItem, EntityRef, EnumerationItem, IntegerBounds, NamespaceId,
        Property, StringBounds,
    },
    source::SourceMap,
    types::ModelType,
};
use serde::Serialize;

///
/// BaseEntity
///
/// The base named by a subclass or extension. An empty namespace name means
/// the declaring namespace.
///

#[derive(Clone, Debug, Serialize)]
pub struct BaseEntity {
    pub base_entity_name: String,
    pub base_entity_namespace_name: String,
    pub source_map: SourceMap,

    #[serde(skip)]
    pub resolved: Option<EntityRef>,
}

impl BaseEntity {
    #[must_use]
    pub fn new(base_entity_name: impl Into<String>) -> Self {
        Self {
            base_entity_name: base_entity_name.into(),
            base_entity_namespace_name: String::new(),
            source_map: SourceMap::default(),
            resolved: None,
        }
    }
}

///
/// EntityDetails
///
/// Kind-specific payload of an entity.
///

#[derive(Clone, Debug, Default, Serialize)]
pub enum EntityDetails {
    #[default]
    None,
    Descriptor {
        map_type_items: Vec<EnumerationItem>,
    },
    Domain {
        items: Vec<EntityItem>,
    },
    DomainEntity {
        is_abstract: bool,
    },
    Enumeration {
        items: Vec<EnumerationItem>,
    },
    Interchange {
        elements: Vec<EntityItem>,
        identity_templates: Vec<EntityItem>,
    },
    SharedDecimal(DecimalBounds),
    SharedInteger {
        bounds: IntegerBounds,
        is_short: bool,
    },
    SharedString(StringBounds),
    Subdomain {
        parent_domain_name: String,
        items: Vec<EntityItem>,
    },
}

///
/// Entity
///

#[derive(Debug, Serialize)]
pub struct Entity {
    pub meta_ed_name: String,
    pub model_type: ModelType,

    #[serde(skip)]
    pub namespace: NamespaceId,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub documentation: String,

    pub source_map: SourceMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<BaseEntity>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,

    pub details: EntityDetails,

    #[serde(skip)]
    pub data: ExtensionBag,
}

impl Entity {
    #[must_use]
    pub fn new(model_type: ModelType, meta_ed_name: impl Into<String>) -> Self {
        Self {
            meta_ed_name: meta_ed_name.into(),
            model_type,
            namespace: NamespaceId(0),
            documentation: String::new(),
            source_map: SourceMap::default(),
            base: None,
            properties: Vec::new(),
            details: EntityDetails::None,
            data: ExtensionBag::new(),
        }
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.meta_ed_name == name)
    }

    pub fn identity_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.is_part_of_identity)
    }

    #[must_use]
    pub const fn is_abstract(&self) -> bool {
        matches!(self.details, EntityDetails::DomainEntity { is_abstract: true })
    }

    /// Resolved base entity, once linking has run.
    #[must_use]
    pub fn base_entity(&self) -> Option<EntityRef> {
        self.base.as_ref().and_then(|b| b.resolved)
    }

    /// Items of a domain, subdomain or interchange (elements first, then
    /// identity templates).
    pub fn entity_items(&self) -> impl Iterator<Item = &EntityItem> {
        let (first, second): (&[EntityItem], &[EntityItem]) = match &self.details {
            EntityDetails::Domain { items } | EntityDetails::Subdomain { items, .. } => {
                (items.as_slice(), Default::default())
            }
            EntityDetails::Interchange {
                elements,
                identity_templates,
            } => (elements.as_slice(), identity_templates.as_slice()),
            _ => Default::default(),
        };

        first.iter().chain(second)
    }

    pub fn entity_items_mut(&mut self) -> impl Iterator<Item = &mut EntityItem> {
        let (first, second): (&mut [EntityItem], &mut [EntityItem]) = match &mut self.details {
            EntityDetails::Domain { items } | EntityDetails::Subdomain { items, .. } => {
                (items.as_mut_slice(), Default::default())
            }
            EntityDetails::Interchange {
                elements,
                identity_templates,
            } => (elements.as_mut_slice(), identity_templates.as_mut_slice()),
            _ => Default::default(),
        };

        first.iter_mut().chain(second)
    }

    /// Enumeration items or descriptor map-type items.
    #[must_use]
    pub fn enumeration_items(&self) -> &[EnumerationItem] {
        match &self.details {
            EntityDetails::Enumeration { items } => items,
            EntityDetails::Descriptor { map_type_items } => map_type_items,
            _ => &[],
        }
    }
}
