//! The structural rule catalog.
//!
//! Most rules are instances of a handful of parameterised templates; the
//! catalog below fixes each rule's name and parameters. Rules report in
//! namespace order, then entity declaration order.

pub mod base;
pub mod bounds;
pub mod duplicate;
pub mod identity;
pub mod item;
pub mod naming;
pub mod placement;
pub mod redeclare;
pub mod reference;
pub mod rename;

use crate::validate::{
    base::{AbstractEntityMustNotBeExtended, BaseMustResolve},
    bounds::{BoundsCheck, PropertyBoundsRule, SharedBoundsRule},
    duplicate::{SameNameInDependency, SameNameInNamespace, UniqueEntityItems, UniqueEnumerationItems},
    identity::{IdentityOnlyWhereAllowed, IdentityRequired},
    item::{ItemMustResolve, SubdomainParentMustResolve},
    naming::{DescriptorSuffix, SimplePropertyShadowsSharedType},
    placement::{Placement, PlacementRule},
    redeclare::{ExtensionOverrideRule, NoRedeclaration},
    reference::{OverrideMustReferenceCommonExtension, ReferenceMustResolve, ValidReferenceNamespace},
    rename::{NoRenameOfMultiPropertyIdentity, RenameAtMostOnce, RenameMustMatchBaseIdentity, RenameOnlyWhereAllowed},
};
use metaed_build::plugin::Validator;
use metaed_schema::{
    node::{Entity, EntityDetails, EntityItem},
    types::{ModelType as M, PropertyType as P},
};

pub use duplicate::ItemSelector;

/// Items of a domain or subdomain.
#[must_use]
pub fn domain_items(entity: &Entity) -> &[EntityItem] {
    match &entity.details {
        EntityDetails::Domain { items } | EntityDetails::Subdomain { items, .. } => items,
        _ => &[],
    }
}

/// Elements of an interchange or interchange extension.
#[must_use]
pub fn interchange_elements(entity: &Entity) -> &[EntityItem] {
    match &entity.details {
        EntityDetails::Interchange { elements, .. } => elements,
        _ => &[],
    }
}

/// Identity templates of an interchange or interchange extension.
#[must_use]
pub fn interchange_identities(entity: &Entity) -> &[EntityItem] {
    match &entity.details {
        EntityDetails::Interchange {
            identity_templates, ..
        } => identity_templates,
        _ => &[],
    }
}

/// Every unified validator, in reporting order.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn validators() -> Vec<Box<dyn Validator>> {
    let mut rules: Vec<Box<dyn Validator>> = Vec::new();

    // identity
    rules.push(Box::new(IdentityRequired {
        name: "DomainEntityMustContainAnIdentity",
        model_type: M::DomainEntity,
    }));
    rules.push(Box::new(IdentityRequired {
        name: "AssociationMustContainAnIdentity",
        model_type: M::Association,
    }));
    rules.push(Box::new(IdentityOnlyWhereAllowed));

    // base and extension resolution
    for (name, model_type, expected) in [
        (
            "DomainEntitySubclassIdentifierMustMatchADomainOrAbstractEntity",
            M::DomainEntitySubclass,
            "Domain Entity or Abstract Entity",
        ),
        (
            "AssociationSubclassIdentifierMustMatchAnAssociation",
            M::AssociationSubclass,
            "Association",
        ),
        ("CommonSubclassIdentifierMustMatchACommon", M::CommonSubclass, "Common"),
        (
            "DomainEntityExtensionIdentifierMustMatchADomainEntityOrDomainEntitySubclass",
            M::DomainEntityExtension,
            "Domain Entity or Domain Entity Subclass",
        ),
        (
            "AssociationExtensionIdentifierMustMatchAnAssociationOrAssociationSubclass",
            M::AssociationExtension,
            "Association or Association Subclass",
        ),
        ("CommonExtensionIdentifierMustMatchACommon", M::CommonExtension, "Common"),
        (
            "InterchangeExtensionIdentifierMustMatchAnInterchange",
            M::InterchangeExtension,
            "Interchange",
        ),
    ] {
        rules.push(Box::new(BaseMustResolve {
            name,
            model_type,
            expected,
        }));
    }
    rules.push(Box::new(AbstractEntityMustNotBeExtended));

    // placement
    for (name, model_type, placement) in [
        (
            "DomainEntityExtensionExistsOnlyInExtensionNamespace",
            M::DomainEntityExtension,
            Placement::ExtensionOnly,
        ),
        (
            "AssociationExtensionExistsOnlyInExtensionNamespace",
            M::AssociationExtension,
            Placement::ExtensionOnly,
        ),
        (
            "CommonExtensionExistsOnlyInExtensionNamespace",
            M::CommonExtension,
            Placement::ExtensionOnly,
        ),
        ("InlineCommonExistsOnlyInCoreNamespace", M::InlineCommon, Placement::CoreOnly),
        ("EnumerationExistsOnlyInCoreNamespace", M::Enumeration, Placement::CoreOnly),
    ] {
        rules.push(Box::new(PlacementRule {
            name,
            model_type,
            placement,
        }));
    }

    // redeclaration
    for (name, model_type) in [
        ("DomainEntitySubclassMustNotRedeclareProperties", M::DomainEntitySubclass),
        ("AssociationSubclassMustNotRedeclareProperties", M::AssociationSubclass),
        ("DomainEntityExtensionMustNotRedeclareProperties", M::DomainEntityExtension),
        ("AssociationExtensionMustNotRedeclareProperties", M::AssociationExtension),
        ("CommonExtensionMustNotRedeclareProperties", M::CommonExtension),
    ] {
        rules.push(Box::new(NoRedeclaration { name, model_type }));
    }
    rules.push(Box::new(ExtensionOverrideRule));

    // identity renames
    for (once, matches, model_type) in [
        (
            "DomainEntitySubclassIdentityRenameMustExistNoMoreThanOnce",
            "DomainEntitySubclassIdentityRenameMustMatchIdentityPropertyInBaseClass",
            M::DomainEntitySubclass,
        ),
        (
            "AssociationSubclassIdentityRenameMustExistNoMoreThanOnce",
            "AssociationSubclassIdentityRenameMustMatchIdentityPropertyInBaseClass",
            M::AssociationSubclass,
        ),
    ] {
        rules.push(Box::new(RenameAtMostOnce {
            name: once,
            model_type,
        }));
        rules.push(Box::new(RenameMustMatchBaseIdentity {
            name: matches,
            model_type,
        }));
    }
    rules.push(Box::new(NoRenameOfMultiPropertyIdentity));
    rules.push(Box::new(RenameOnlyWhereAllowed));

    // references
    for (name, property_type, expected) in [
        (
            "AssociationPropertyMustMatchAnAssociation",
            P::Association,
            "Association or Association Subclass",
        ),
        ("ChoicePropertyMustMatchAChoice", P::Choice, "Choice"),
        ("CommonPropertyMustMatchACommon", P::Common, "Common"),
        (
            "InlineCommonPropertyMustMatchAnInlineCommon",
            P::InlineCommon,
            "Inline Common",
        ),
        ("DescriptorPropertyMustMatchADescriptor", P::Descriptor, "Descriptor"),
        (
            "DomainEntityPropertyMustMatchADomainEntity",
            P::DomainEntity,
            "Domain Entity or Domain Entity Subclass",
        ),
        ("EnumerationPropertyMustMatchAnEnumeration", P::Enumeration, "Enumeration"),
        (
            "SharedDecimalPropertyTypeMustMatchASharedDecimal",
            P::SharedDecimal,
            "Shared Decimal",
        ),
        (
            "SharedIntegerPropertyTypeMustMatchASharedInteger",
            P::SharedInteger,
            "Shared Integer",
        ),
        ("SharedShortPropertyTypeMustMatchASharedShort", P::SharedShort, "Shared Short"),
        (
            "SharedStringPropertyTypeMustMatchASharedString",
            P::SharedString,
            "Shared String",
        ),
    ] {
        rules.push(Box::new(ReferenceMustResolve {
            name,
            property_type,
            expected,
        }));
    }
    rules.push(Box::new(OverrideMustReferenceCommonExtension));
    rules.push(Box::new(ValidReferenceNamespace));

    // duplicate names
    rules.push(Box::new(SameNameInNamespace));
    rules.push(Box::new(SameNameInDependency::default()));
    rules.push(Box::new(UniqueEnumerationItems {
        name: "EnumerationItemsMustBeUnique",
        model_type: M::Enumeration,
    }));
    rules.push(Box::new(UniqueEnumerationItems {
        name: "DescriptorMapTypeItemsMustBeUnique",
        model_type: M::Descriptor,
    }));
    for (name, model_type, noun, select) in [
        (
            "DomainMustNotDuplicateDomainItems",
            M::Domain,
            "domain item",
            domain_items as ItemSelector,
        ),
        (
            "SubdomainMustNotDuplicateDomainItems",
            M::Subdomain,
            "domain item",
            domain_items,
        ),
        (
            "InterchangeMustNotDuplicateInterchangeElementName",
            M::Interchange,
            "element",
            interchange_elements,
        ),
        (
            "InterchangeMustNotDuplicateIdentityName",
            M::Interchange,
            "identity template",
            interchange_identities,
        ),
        (
            "InterchangeExtensionMustNotDuplicateInterchangeElementName",
            M::InterchangeExtension,
            "element",
            interchange_elements,
        ),
        (
            "InterchangeExtensionMustNotDuplicateIdentityName",
            M::InterchangeExtension,
            "identity template",
            interchange_identities,
        ),
    ] {
        rules.push(Box::new(UniqueEntityItems {
            name,
            model_type,
            noun,
            select,
        }));
    }

    // domain and interchange items
    rules.push(Box::new(ItemMustResolve {
        name: "DomainItemMustMatchTopLevelEntity",
        model_types: &[M::Domain, M::Subdomain],
        expected: "top level entity",
        select: domain_items,
    }));
    rules.push(Box::new(SubdomainParentMustResolve));
    rules.push(Box::new(ItemMustResolve {
        name: "InterchangeElementMustMatchADomainEntityOrAssociationOrSubclass",
        model_types: &[M::Interchange, M::InterchangeExtension],
        expected: "Domain Entity, Association or subclass",
        select: interchange_elements,
    }));
    rules.push(Box::new(ItemMustResolve {
        name: "InterchangeIdentityMustMatchADomainEntityOrAssociationOrSubclass",
        model_types: &[M::Interchange, M::InterchangeExtension],
        expected: "Domain Entity, Association or subclass",
        select: interchange_identities,
    }));

    // bounds
    for (name, property_type, check) in [
        (
            "IntegerPropertyMinValueMustNotBeGreaterThanMaxValue",
            P::Integer,
            BoundsCheck::IntegerRange,
        ),
        (
            "ShortPropertyMinValueMustNotBeGreaterThanMaxValue",
            P::Short,
            BoundsCheck::IntegerRange,
        ),
        (
            "DecimalPropertyMinValueMustNotBeGreaterThanMaxValue",
            P::Decimal,
            BoundsCheck::DecimalRange,
        ),
        (
            "DecimalPropertyDecimalPlacesMustNotBeGreaterThanTotalDigits",
            P::Decimal,
            BoundsCheck::DecimalPlaces,
        ),
        (
            "StringPropertyMinLengthMustNotBeGreaterThanMaxLength",
            P::String,
            BoundsCheck::StringLength,
        ),
    ] {
        rules.push(Box::new(PropertyBoundsRule {
            name,
            property_type,
            check,
        }));
    }
    for (name, model_type, check) in [
        (
            "SharedIntegerMinValueMustNotBeGreaterThanMaxValue",
            M::SharedInteger,
            BoundsCheck::IntegerRange,
        ),
        (
            "SharedDecimalMinValueMustNotBeGreaterThanMaxValue",
            M::SharedDecimal,
            BoundsCheck::DecimalRange,
        ),
        (
            "SharedDecimalDecimalPlacesMustNotBeGreaterThanTotalDigits",
            M::SharedDecimal,
            BoundsCheck::DecimalPlaces,
        ),
        (
            "SharedStringMinLengthMustNotBeGreaterThanMaxLength",
            M::SharedString,
            BoundsCheck::StringLength,
        ),
    ] {
        rules.push(Box::new(SharedBoundsRule {
            name,
            model_type,
            check,
        }));
    }

    // naming
    rules.push(Box::new(DescriptorSuffix));
    rules.push(Box::new(SimplePropertyShadowsSharedType));

    rules
}

///
/// TESTS
///
