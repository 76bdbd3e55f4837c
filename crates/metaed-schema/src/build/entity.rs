use crate::{
    build::{LineCursor, PropertyBuilder, stamp_details},
    node::{
        BaseEntity, DecimalBounds, Entity, EntityDetails, EntityItem, EnumerationItem,
        IntegerBounds, StringBounds,
    },
    source::SourceMap,
    types::ModelType,
};

// width of " based on " between entity and base names
const BASED_ON_GAP: u32 = 10;

///
/// EntityBuilder
///

#[derive(Debug)]
pub struct EntityBuilder {
    model_type: ModelType,
    name: String,
    documentation: String,
    base: Option<BaseEntity>,
    properties: Vec<PropertyBuilder>,
    details: EntityDetails,
}

impl EntityBuilder {
    #[must_use]
    pub fn new(model_type: ModelType, name: impl Into<String>) -> Self {
        let details = match model_type {
            ModelType::Descriptor => EntityDetails::Descriptor {
                map_type_items: Vec::new(),
            },
            ModelType::Domain => EntityDetails::Domain { items: Vec::new() },
            ModelType::DomainEntity => EntityDetails::DomainEntity { is_abstract: false },
            ModelType::Enumeration | ModelType::SchoolYearEnumeration => {
                EntityDetails::Enumeration { items: Vec::new() }
            }
            ModelType::Interchange | ModelType::InterchangeExtension => {
                EntityDetails::Interchange {
                    elements: Vec::new(),
                    identity_templates: Vec::new(),
                }
            }
            ModelType::SharedDecimal => EntityDetails::SharedDecimal(DecimalBounds::default()),
            ModelType::SharedInteger => EntityDetails::SharedInteger {
                bounds: IntegerBounds::default(),
                is_short: false,
            },
            ModelType::SharedString => EntityDetails::SharedString(StringBounds::default()),
            ModelType::Subdomain => EntityDetails::Subdomain {
                parent_domain_name: String::new(),
                items: Vec::new(),
            },
            _ => EntityDetails::None,
        };

        Self {
            model_type,
            name: name.into(),
            documentation: String::new(),
            base: None,
            properties: Vec::new(),
            details,
        }
    }

    // extension kinds take their base's name
    fn extending(model_type: ModelType, base: impl Into<String>) -> Self {
        let base = base.into();

        Self::new(model_type, base.clone()).base(base)
    }

    #[must_use]
    pub fn domain_entity(name: impl Into<String>) -> Self {
        Self::new(ModelType::DomainEntity, name)
    }

    #[must_use]
    pub fn abstract_entity(name: impl Into<String>) -> Self {
        let mut builder = Self::new(ModelType::DomainEntity, name);
        builder.details = EntityDetails::DomainEntity { is_abstract: true };
        builder
    }

    #[must_use]
    pub fn domain_entity_subclass(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self::new(ModelType::DomainEntitySubclass, name).base(base)
    }

    #[must_use]
    pub fn domain_entity_extension(base: impl Into<String>) -> Self {
        Self::extending(ModelType::DomainEntityExtension, base)
    }

    #[must_use]
    pub fn association(name: impl Into<String>) -> Self {
        Self::new(ModelType::Association, name)
    }

    #[must_use]
    pub fn association_subclass(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self::new(ModelType::AssociationSubclass, name).base(base)
    }

    #[must_use]
    pub fn association_extension(base: impl Into<String>) -> Self {
        Self::extending(ModelType::AssociationExtension, base)
    }

    #[must_use]
    pub fn common(name: impl Into<String>) -> Self {
        Self::new(ModelType::Common, name)
    }

    #[must_use]
    pub fn inline_common(name: impl Into<String>) -> Self {
        Self::new(ModelType::InlineCommon, name)
    }

    #[must_use]
    pub fn common_subclass(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self::new(ModelType::CommonSubclass, name).base(base)
    }

    #[must_use]
    pub fn common_extension(base: impl Into<String>) -> Self {
        Self::extending(ModelType::CommonExtension, base)
    }

    #[must_use]
    pub fn choice(name: impl Into<String>) -> Self {
        Self::new(ModelType::Choice, name)
    }

    #[must_use]
    pub fn descriptor(name: impl Into<String>) -> Self {
        Self::new(ModelType::Descriptor, name)
    }

    #[must_use]
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(ModelType::Enumeration, name)
    }

    #[must_use]
    pub fn school_year_enumeration(name: impl Into<String>) -> Self {
        Self::new(ModelType::SchoolYearEnumeration, name)
    }

    #[must_use]
    pub fn domain(name: impl Into<String>) -> Self {
        Self::new(ModelType::Domain, name)
    }

    #[must_use]
    pub fn subdomain(name: impl Into<String>, parent_domain_name: impl Into<String>) -> Self {
        let mut builder = Self::new(ModelType::Subdomain, name);
        if let EntityDetails::Subdomain {
            parent_domain_name: parent,
            ..
        } = &mut builder.details
        {
            *parent = parent_domain_name.into();
        }
        builder
    }

    #[must_use]
    pub fn interchange(name: impl Into<String>) -> Self {
        Self::new(ModelType::Interchange, name)
    }

    #[must_use]
    pub fn interchange_extension(base: impl Into<String>) -> Self {
        Self::extending(ModelType::InterchangeExtension, base)
    }

    #[must_use]
    pub fn shared_decimal(name: impl Into<String>) -> Self {
        Self::new(ModelType::SharedDecimal, name)
    }

    #[must_use]
    pub fn shared_integer(name: impl Into<String>) -> Self {
        Self::new(ModelType::SharedInteger, name)
    }

    #[must_use]
    pub fn shared_short(name: impl Into<String>) -> Self {
        let mut builder = Self::new(ModelType::SharedInteger, name);
        builder.details = EntityDetails::SharedInteger {
            bounds: IntegerBounds::default(),
            is_short: true,
        };
        builder
    }

    #[must_use]
    pub fn shared_string(name: impl Into<String>) -> Self {
        Self::new(ModelType::SharedString, name)
    }

    #[must_use]
    pub fn base(mut self, base_entity_name: impl Into<String>) -> Self {
        self.base = Some(BaseEntity::new(base_entity_name));
        self
    }

    /// Qualify the base entity with its namespace.
    #[must_use]
    pub fn base_namespace(mut self, namespace_name: impl Into<String>) -> Self {
        if let Some(base) = &mut self.base {
            base.base_entity_namespace_name = namespace_name.into();
        }
        self
    }

    #[must_use]
    pub fn documentation(mut self, text: impl Into<String>) -> Self {
        self.documentation = text.into();
        self
    }

    #[must_use]
    pub fn property(mut self, property: PropertyBuilder) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn enumeration_item(mut self, short_description: impl Into<String>) -> Self {
        let item = EnumerationItem {
            short_description: short_description.into(),
            ..EnumerationItem::default()
        };
        match &mut self.details {
            EntityDetails::Enumeration { items }
            | EntityDetails::Descriptor {
                map_type_items: items,
            } => items.push(item),
            _ => {}
        }
        self
    }

    /// Add a domain or subdomain item.
    #[must_use]
    pub fn domain_item(mut self, model_type: ModelType, name: impl Into<String>) -> Self {
        if let EntityDetails::Domain { items } | EntityDetails::Subdomain { items, .. } =
            &mut self.details
        {
            items.push(EntityItem::new(model_type, name));
        }
        self
    }

    #[must_use]
    pub fn interchange_element(mut self, model_type: ModelType, name: impl Into<String>) -> Self {
        if let EntityDetails::Interchange { elements, .. } = &mut self.details {
            elements.push(EntityItem::new(model_type, name));
        }
        self
    }

    #[must_use]
    pub fn identity_template(mut self, model_type: ModelType, name: impl Into<String>) -> Self {
        if let EntityDetails::Interchange {
            identity_templates, ..
        } = &mut self.details
        {
            identity_templates.push(EntityItem::new(model_type, name));
        }
        self
    }

    #[must_use]
    pub fn integer_bounds(mut self, min_value: Option<i64>, max_value: Option<i64>) -> Self {
        if let EntityDetails::SharedInteger { bounds, .. } = &mut self.details {
            *bounds = IntegerBounds {
                min_value,
                max_value,
            };
        }
        self
    }

    #[must_use]
    pub fn decimal_bounds(mut self, bounds: DecimalBounds) -> Self {
        if let EntityDetails::SharedDecimal(current) = &mut self.details {
            *current = bounds;
        }
        self
    }

    #[must_use]
    pub fn string_bounds(mut self, min_length: Option<u32>, max_length: Option<u32>) -> Self {
        if let EntityDetails::SharedString(bounds) = &mut self.details {
            *bounds = StringBounds {
                min_length,
                max_length,
            };
        }
        self
    }

    pub(crate) fn finish(self, cursor: &mut LineCursor) -> Entity {
        let keyword = self.model_type.label();
        let column = u32::try_from(keyword.len() + 1).unwrap_or(u32::MAX);

        let mut entity = Entity::new(self.model_type, self.name);
        entity.documentation = self.documentation;
        entity.source_map = cursor.next(column, &entity.meta_ed_name);

        if let Some(mut base) = self.base {
            let name_len = u32::try_from(entity.meta_ed_name.len()).unwrap_or(0);
            base.source_map = SourceMap::new(
                entity.source_map.line,
                column + name_len + BASED_ON_GAP,
                base.base_entity_name.clone(),
            );
            entity.base = Some(base);
        }

        entity.properties = self
            .properties
            .into_iter()
            .map(|p| p.finish(cursor))
            .collect();

        entity.details = self.details;
        stamp_details(&mut entity.details, cursor);

        entity
    }
}
