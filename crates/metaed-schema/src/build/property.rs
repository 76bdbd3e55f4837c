use crate::{
    build::LineCursor,
    node::{DecimalBounds, IdentityRename, IntegerBounds, Property, PropertyBounds, StringBounds},
    source::SourceMap,
    types::{Cardinality, PropertyType},
};

// properties sit one indent level inside their entity
const PROPERTY_COLUMN: u32 = 4;

///
/// PropertyBuilder
///

#[derive(Debug)]
pub struct PropertyBuilder {
    property: Property,
}

macro_rules! property_constructors {
    ($($fn_name:ident => $ty:ident),* $(,)?) => {
        $(
            #[must_use]
            pub fn $fn_name(name: impl Into<String>) -> Self {
                Self::new(PropertyType::$ty, name)
            }
        )*
    };
}

impl PropertyBuilder {
    #[must_use]
    pub fn new(property_type: PropertyType, name: impl Into<String>) -> Self {
        Self {
            property: Property::new(property_type, name),
        }
    }

    property_constructors! {
        association => Association,
        boolean => Boolean,
        choice => Choice,
        common => Common,
        currency => Currency,
        date => Date,
        datetime => Datetime,
        decimal => Decimal,
        descriptor => Descriptor,
        domain_entity => DomainEntity,
        duration => Duration,
        enumeration => Enumeration,
        inline_common => InlineCommon,
        integer => Integer,
        percent => Percent,
        school_year_enumeration => SchoolYearEnumeration,
        shared_decimal => SharedDecimal,
        shared_integer => SharedInteger,
        shared_short => SharedShort,
        shared_string => SharedString,
        short => Short,
        string => String,
        time => Time,
        year => Year,
    }

    #[must_use]
    pub const fn identity(mut self) -> Self {
        self.property.is_part_of_identity = true;
        self
    }

    /// Rename an identity property inherited from the base entity.
    #[must_use]
    pub fn identity_rename(mut self, base_key_name: impl Into<String>) -> Self {
        self.property.is_part_of_identity = true;
        self.property.identity_rename = Some(IdentityRename {
            base_key_name: base_key_name.into(),
            source_map: SourceMap::default(),
        });
        self
    }

    #[must_use]
    pub const fn cardinality(mut self, cardinality: Cardinality) -> Self {
        self.property.cardinality = cardinality;
        self
    }

    #[must_use]
    pub const fn optional(self) -> Self {
        self.cardinality(Cardinality::Optional)
    }

    #[must_use]
    pub const fn required_collection(self) -> Self {
        self.cardinality(Cardinality::RequiredCollection)
    }

    #[must_use]
    pub const fn optional_collection(self) -> Self {
        self.cardinality(Cardinality::OptionalCollection)
    }

    #[must_use]
    pub fn role_name(mut self, role_name: impl Into<String>) -> Self {
        self.property.role_name = role_name.into();
        self
    }

    /// Qualify the referenced entity with its namespace.
    #[must_use]
    pub fn in_namespace(mut self, namespace_name: impl Into<String>) -> Self {
        self.property.referenced_namespace_name = Some(namespace_name.into());
        self
    }

    #[must_use]
    pub const fn extension_override(mut self) -> Self {
        self.property.is_extension_override = true;
        self
    }

    /// Give the property a name distinct from its referenced type.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let type_name = std::mem::replace(&mut self.property.meta_ed_name, name.into());
        self.property.referenced_type_name = Some(type_name);
        self
    }

    #[must_use]
    pub fn documentation(mut self, text: impl Into<String>) -> Self {
        self.property.documentation = text.into();
        self
    }

    #[must_use]
    pub const fn integer_bounds(mut self, min_value: Option<i64>, max_value: Option<i64>) -> Self {
        self.property.bounds = PropertyBounds::Integer(IntegerBounds {
            min_value,
            max_value,
        });
        self
    }

    #[must_use]
    pub const fn decimal_bounds(mut self, bounds: DecimalBounds) -> Self {
        self.property.bounds = PropertyBounds::Decimal(bounds);
        self
    }

    #[must_use]
    pub const fn string_bounds(mut self, min_length: Option<u32>, max_length: Option<u32>) -> Self {
        self.property.bounds = PropertyBounds::String(StringBounds {
            min_length,
            max_length,
        });
        self
    }

    pub(crate) fn finish(self, cursor: &mut LineCursor) -> Property {
        let mut property = self.property;
        property.source_map = cursor.next(PROPERTY_COLUMN, &property.meta_ed_name);

        if let Some(rename) = &mut property.identity_rename {
            rename.source_map = SourceMap::new(
                property.source_map.line,
                PROPERTY_COLUMN,
                rename.base_key_name.clone(),
            );
        }

        property
    }
}
