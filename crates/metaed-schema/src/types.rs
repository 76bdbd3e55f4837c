use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};

///
/// Cardinality
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, FromStr, Hash, PartialEq, Serialize,
)]
pub enum Cardinality {
    #[default]
    Required,
    Optional,
    RequiredCollection,
    OptionalCollection,
}

impl Cardinality {
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::RequiredCollection | Self::OptionalCollection)
    }

    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Required | Self::RequiredCollection)
    }

    /// Lower-case phrase used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::RequiredCollection => "required collection",
            Self::OptionalCollection => "optional collection",
        }
    }
}

///
/// NameGroup
///
/// Model types whose entity names share one uniqueness scope.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum NameGroup {
    Descriptor,
    Domain,
    Interchange,
    TopLevel,
}

///
/// ModelType
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    FromStr,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[remain::sorted]
pub enum ModelType {
    Association,
    AssociationExtension,
    AssociationSubclass,
    Choice,
    Common,
    CommonExtension,
    CommonSubclass,
    Descriptor,
    Domain,
    DomainEntity,
    DomainEntityExtension,
    DomainEntitySubclass,
    Enumeration,
    InlineCommon,
    Interchange,
    InterchangeExtension,
    SchoolYearEnumeration,
    SharedDecimal,
    SharedInteger,
    SharedString,
    Subdomain,
}

impl ModelType {
    pub const ALL: [Self; 21] = [
        Self::Association,
        Self::AssociationExtension,
        Self::AssociationSubclass,
        Self::Choice,
        Self::Common,
        Self::CommonExtension,
        Self::CommonSubclass,
        Self::Descriptor,
        Self::Domain,
        Self::DomainEntity,
        Self::DomainEntityExtension,
        Self::DomainEntitySubclass,
        Self::Enumeration,
        Self::InlineCommon,
        Self::Interchange,
        Self::InterchangeExtension,
        Self::SchoolYearEnumeration,
        Self::SharedDecimal,
        Self::SharedInteger,
        Self::SharedString,
        Self::Subdomain,
    ];

    /// Human-readable name used in diagnostics and documentation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Association => "Association",
            Self::AssociationExtension => "Association Extension",
            Self::AssociationSubclass => "Association Subclass",
            Self::Choice => "Choice",
            Self::Common => "Common",
            Self::CommonExtension => "Common Extension",
            Self::CommonSubclass => "Common Subclass",
            Self::Descriptor => "Descriptor",
            Self::Domain => "Domain",
            Self::DomainEntity => "Domain Entity",
            Self::DomainEntityExtension => "Domain Entity Extension",
            Self::DomainEntitySubclass => "Domain Entity Subclass",
            Self::Enumeration => "Enumeration",
            Self::InlineCommon => "Inline Common",
            Self::Interchange => "Interchange",
            Self::InterchangeExtension => "Interchange Extension",
            Self::SchoolYearEnumeration => "School Year Enumeration",
            Self::SharedDecimal => "Shared Decimal",
            Self::SharedInteger => "Shared Integer",
            Self::SharedString => "Shared String",
            Self::Subdomain => "Subdomain",
        }
    }

    #[must_use]
    pub const fn is_subclass(self) -> bool {
        matches!(
            self,
            Self::AssociationSubclass | Self::CommonSubclass | Self::DomainEntitySubclass
        )
    }

    #[must_use]
    pub const fn is_extension(self) -> bool {
        matches!(
            self,
            Self::AssociationExtension
                | Self::CommonExtension
                | Self::DomainEntityExtension
                | Self::InterchangeExtension
        )
    }

    /// Types an entity of this kind may name as its base.
    /// Empty for kinds that never declare a base.
    #[must_use]
    pub const fn base_types(self) -> &'static [Self] {
        match self {
            Self::AssociationExtension => &[Self::Association, Self::AssociationSubclass],
            Self::AssociationSubclass => &[Self::Association],
            Self::CommonExtension | Self::CommonSubclass => &[Self::Common],
            Self::DomainEntityExtension => &[Self::DomainEntity, Self::DomainEntitySubclass],
            Self::DomainEntitySubclass => &[Self::DomainEntity],
            Self::InterchangeExtension => &[Self::Interchange],
            _ => &[],
        }
    }

    /// Types accepted when an item (domain item, interchange element)
    /// is declared with this kind.
    #[must_use]
    pub const fn item_candidates(self) -> &'static [Self] {
        match self {
            Self::Association => &[Self::Association, Self::AssociationSubclass],
            Self::Common => &[Self::Common, Self::CommonSubclass],
            Self::DomainEntity => &[Self::DomainEntity, Self::DomainEntitySubclass],
            Self::Descriptor => &[Self::Descriptor],
            Self::InlineCommon => &[Self::InlineCommon],
            Self::Choice => &[Self::Choice],
            _ => &[],
        }
    }

    /// Uniqueness scope for entity names, or `None` for extension kinds
    /// which reuse their base's name.
    #[must_use]
    pub const fn name_group(self) -> Option<NameGroup> {
        match self {
            Self::Descriptor => Some(NameGroup::Descriptor),
            Self::Domain | Self::Subdomain => Some(NameGroup::Domain),
            Self::Interchange => Some(NameGroup::Interchange),
            Self::AssociationExtension
            | Self::CommonExtension
            | Self::DomainEntityExtension
            | Self::InterchangeExtension => None,
            _ => Some(NameGroup::TopLevel),
        }
    }

    /// Kinds that carry properties with identity semantics.
    #[must_use]
    pub const fn has_identity(self) -> bool {
        matches!(
            self,
            Self::Association
                | Self::AssociationSubclass
                | Self::Common
                | Self::CommonSubclass
                | Self::DomainEntity
                | Self::DomainEntitySubclass
                | Self::InlineCommon
        )
    }
}

///
/// PropertyType
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    FromStr,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[remain::sorted]
pub enum PropertyType {
    Association,
    Boolean,
    Choice,
    Common,
    Currency,
    Date,
    Datetime,
    Decimal,
    Descriptor,
    DomainEntity,
    Duration,
    Enumeration,
    InlineCommon,
    Integer,
    Percent,
    SchoolYearEnumeration,
    SharedDecimal,
    SharedInteger,
    SharedShort,
    SharedString,
    Short,
    String,
    Time,
    Year,
}

impl PropertyType {
    pub const ALL: [Self; 24] = [
        Self::Association,
        Self::Boolean,
        Self::Choice,
        Self::Common,
        Self::Currency,
        Self::Date,
        Self::Datetime,
        Self::Decimal,
        Self::Descriptor,
        Self::DomainEntity,
        Self::Duration,
        Self::Enumeration,
        Self::InlineCommon,
        Self::Integer,
        Self::Percent,
        Self::SchoolYearEnumeration,
        Self::SharedDecimal,
        Self::SharedInteger,
        Self::SharedShort,
        Self::SharedString,
        Self::Short,
        Self::String,
        Self::Time,
        Self::Year,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Association => "Association",
            Self::Boolean => "Boolean",
            Self::Choice => "Choice",
            Self::Common => "Common",
            Self::Currency => "Currency",
            Self::Date => "Date",
            Self::Datetime => "Datetime",
            Self::Decimal => "Decimal",
            Self::Descriptor => "Descriptor",
            Self::DomainEntity => "Domain Entity",
            Self::Duration => "Duration",
            Self::Enumeration => "Enumeration",
            Self::InlineCommon => "Inline Common",
            Self::Integer => "Integer",
            Self::Percent => "Percent",
            Self::SchoolYearEnumeration => "School Year Enumeration",
            Self::SharedDecimal => "Shared Decimal",
            Self::SharedInteger => "Shared Integer",
            Self::SharedShort => "Shared Short",
            Self::SharedString => "Shared String",
            Self::Short => "Short",
            Self::String => "String",
            Self::Time => "Time",
            Self::Year => "Year",
        }
    }

    /// Model types a property of this kind may reference.
    /// Empty for simple (non-referential) properties.
    ///
    /// A `common extension` override may also land on a common extension.
    #[must_use]
    pub const fn referenced_types(self, is_extension_override: bool) -> &'static [ModelType] {
        match (self, is_extension_override) {
            (Self::Association, _) => &[ModelType::Association, ModelType::AssociationSubclass],
            (Self::Choice, _) => &[ModelType::Choice],
            (Self::Common, false) => &[ModelType::Common],
            (Self::Common, true) => &[ModelType::Common, ModelType::CommonExtension],
            (Self::Descriptor, _) => &[ModelType::Descriptor],
            (Self::DomainEntity, _) => &[ModelType::DomainEntity, ModelType::DomainEntitySubclass],
            (Self::Enumeration, _) => &[ModelType::Enumeration],
            (Self::InlineCommon, _) => &[ModelType::InlineCommon],
            (Self::SchoolYearEnumeration, _) => &[ModelType::SchoolYearEnumeration],
            (Self::SharedDecimal, _) => &[ModelType::SharedDecimal],
            (Self::SharedInteger | Self::SharedShort, _) => &[ModelType::SharedInteger],
            (Self::SharedString, _) => &[ModelType::SharedString],
            _ => &[],
        }
    }

    #[must_use]
    pub const fn is_reference(self) -> bool {
        !self.referenced_types(false).is_empty()
    }

    /// References to entities that own rows of their own (as opposed to
    /// shared simple types, enumerations and inline commons).
    #[must_use]
    pub const fn is_entity_reference(self) -> bool {
        matches!(self, Self::Association | Self::DomainEntity)
    }

    #[must_use]
    pub const fn is_shared_simple(self) -> bool {
        matches!(
            self,
            Self::SharedDecimal | Self::SharedInteger | Self::SharedShort | Self::SharedString
        )
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_model_types_are_sorted_and_distinct() {
        let mut sorted = ModelType::ALL.to_vec();
        sorted.sort();
        sorted.dedup();

        assert_eq!(sorted, ModelType::ALL.to_vec());
    }

    #[test]
    fn all_property_types_are_sorted_and_distinct() {
        let mut sorted = PropertyType::ALL.to_vec();
        sorted.sort();
        sorted.dedup();

        assert_eq!(sorted, PropertyType::ALL.to_vec());
    }

    #[test]
    fn only_extensions_lack_a_name_group() {
        for ty in ModelType::ALL {
            assert_eq!(ty.name_group().is_none(), ty.is_extension(), "{ty}");
        }
    }

    #[test]
    fn every_subclass_and_extension_has_base_types() {
        for ty in ModelType::ALL {
            let expects_base = ty.is_subclass() || ty.is_extension();
            assert_eq!(!ty.base_types().is_empty(), expects_base, "{ty}");
        }
    }

    #[test]
    fn extension_override_widens_only_common_references() {
        assert!(!PropertyType::Common.referenced_types(false).contains(&ModelType::CommonExtension));
        assert!(PropertyType::Common.referenced_types(true).contains(&ModelType::CommonExtension));

        for ty in [PropertyType::DomainEntity, PropertyType::Association] {
            assert_eq!(ty.referenced_types(true), ty.referenced_types(false));
        }
        assert!(!PropertyType::DomainEntity.referenced_types(true).contains(&ModelType::DomainEntityExtension));
    }

    #[test]
    fn simple_properties_reference_nothing() {
        for ty in [
            PropertyType::Boolean,
            PropertyType::Integer,
            PropertyType::String,
            PropertyType::Year,
        ] {
            assert!(!ty.is_reference(), "{ty}");
        }
    }

    #[test]
    fn cardinality_parses_from_variant_name() {
        assert_eq!(
            "OptionalCollection".parse::<Cardinality>().ok(),
            Some(Cardinality::OptionalCollection)
        );
        assert!(Cardinality::RequiredCollection.is_collection());
        assert!(!Cardinality::Optional.is_required());
    }
}
