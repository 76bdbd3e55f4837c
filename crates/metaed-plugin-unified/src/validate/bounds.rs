use metaed_build::plugin::{ValidateContext, Validator};
use metaed_schema::{
    failure::ValidationFailure,
    node::{EntityDetails, PropertyBounds},
    types::{ModelType, PropertyType},
};

///
/// BoundsCheck
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundsCheck {
    DecimalPlaces,
    DecimalRange,
    IntegerRange,
    StringLength,
}

impl BoundsCheck {
    #[must_use]
    pub fn violated_by(self, bounds: &PropertyBounds) -> bool {
        match (self, bounds) {
            (Self::DecimalPlaces, PropertyBounds::Decimal(b)) => b.has_excess_places(),
            (Self::DecimalRange, PropertyBounds::Decimal(b)) => b.is_inverted(),
            (Self::IntegerRange, PropertyBounds::Integer(b)) => b.is_inverted(),
            (Self::StringLength, PropertyBounds::String(b)) => b.is_inverted(),
            _ => false,
        }
    }

    const fn complaint(self) -> &'static str {
        match self {
            Self::DecimalPlaces => "has more decimal places than total digits",
            Self::DecimalRange | Self::IntegerRange => "has a min value greater than its max value",
            Self::StringLength => "has a min length greater than its max length",
        }
    }
}

// Shared simple type bounds in property form.
const fn shared_bounds(details: &EntityDetails) -> PropertyBounds {
    match details {
        EntityDetails::SharedDecimal(b) => PropertyBounds::Decimal(*b),
        EntityDetails::SharedInteger { bounds, .. } => PropertyBounds::Integer(*bounds),
        EntityDetails::SharedString(b) => PropertyBounds::String(*b),
        _ => PropertyBounds::None,
    }
}

///
/// PropertyBoundsRule
///

#[derive(Clone, Copy, Debug)]
pub struct PropertyBoundsRule {
    pub name: &'static str,
    pub property_type: PropertyType,
    pub check: BoundsCheck,
}

impl Validator for PropertyBoundsRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        let schema = ctx.schema;

        schema
            .property_index()
            .get(self.property_type)
            .iter()
            .filter_map(|r| Some((schema.entity(r.entity)?, schema.property(*r)?)))
            .filter(|(_, property)| self.check.violated_by(&property.bounds))
            .map(|(entity, property)| {
                ValidationFailure::error(
                    self.name,
                    format!(
                        "{} property {} on {} {} {}.",
                        self.property_type.label(),
                        property.full_name(),
                        entity.model_type.label(),
                        entity.meta_ed_name,
                        self.check.complaint()
                    ),
                    Some(&property.source_map),
                )
            })
            .collect()
    }
}

///
/// SharedBoundsRule
///

#[derive(Clone, Copy, Debug)]
pub struct SharedBoundsRule {
    pub name: &'static str,
    pub model_type: ModelType,
    pub check: BoundsCheck,
}

impl Validator for SharedBoundsRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &ValidateContext<'_>) -> Vec<ValidationFailure> {
        ctx.schema
            .entities_of(self.model_type)
            .filter(|(_, entity)| self.check.violated_by(&shared_bounds(&entity.details)))
            .map(|(_, entity)| {
                ValidationFailure::error(
                    self.name,
                    format!(
                        "{} {} {}.",
                        self.model_type.label(),
                        entity.meta_ed_name,
                        self.check.complaint()
                    ),
                    Some(&entity.source_map),
                )
            })
            .collect()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::tests::validate;
    use metaed_schema::prelude::*;

    #[test]
    fn inverted_integer_range_fails() {
        let failures = validate(
            &PropertyBoundsRule {
                name: "IntegerPropertyMinValueMustNotBeGreaterThanMaxValue",
                property_type: PropertyType::Integer,
                check: BoundsCheck::IntegerRange,
            },
            NamespaceBuilder::core("EdFi").entity(
                EntityBuilder::domain_entity("Course")
                    .property(PropertyBuilder::integer("Credits").integer_bounds(Some(10), Some(1)))
                    .property(PropertyBuilder::integer("Hours").integer_bounds(Some(1), Some(10)))
                    .property(PropertyBuilder::short("Level").integer_bounds(Some(10), Some(1))),
            ),
        );

        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures[0].message,
            "Integer property Credits on Domain Entity Course has a min value greater than its max value."
        );
    }

    #[test]
    fn excess_decimal_places_fail() {
        let failures = validate(
            &SharedBoundsRule {
                name: "SharedDecimalDecimalPlacesMustNotBeGreaterThanTotalDigits",
                model_type: ModelType::SharedDecimal,
                check: BoundsCheck::DecimalPlaces,
            },
            NamespaceBuilder::core("EdFi").entity(EntityBuilder::shared_decimal("Gpa").decimal_bounds(
                DecimalBounds {
                    total_digits: Some(3),
                    decimal_places: Some(4),
                    ..DecimalBounds::default()
                },
            )),
        );

        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures[0].message,
            "Shared Decimal Gpa has more decimal places than total digits."
        );
    }

    #[test]
    fn open_bounds_pass() {
        let bounds = PropertyBounds::String(StringBounds {
            min_length: Some(5),
            max_length: None,
        });

        assert!(!BoundsCheck::StringLength.violated_by(&bounds));
        assert!(!BoundsCheck::IntegerRange.violated_by(&bounds));
    }
}
