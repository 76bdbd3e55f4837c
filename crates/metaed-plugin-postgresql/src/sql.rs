use metaed_plugin_relational::model::ColumnType;
use metaed_utils::hash::content_hash;

/// Longest identifier PostgreSQL keeps.
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

// Characters kept from a shortened identifier, before `_` and the hash.
const SHORTENED_PREFIX: usize = 54;

/// An unquoted identifier. Names over the limit keep a prefix and gain a
/// hash of the full name, so distinct long names stay distinct.
#[must_use]
pub fn ident(name: &str) -> String {
    if name.chars().count() <= MAX_IDENTIFIER_LENGTH {
        return name.to_string();
    }

    let prefix: String = name.chars().take(SHORTENED_PREFIX).collect();
    let hash = content_hash(name.as_bytes());

    format!("{prefix}_{}", &hash[..8])
}

/// `schema.table`
#[must_use]
pub fn qualified(schema: &str, table: &str) -> String {
    format!("{}.{}", ident(schema), ident(table))
}

/// PostgreSQL type of a column.
#[must_use]
pub fn column_type(column_type: ColumnType) -> String {
    match column_type {
        ColumnType::Boolean => "BOOLEAN".into(),
        ColumnType::Currency => "MONEY".into(),
        ColumnType::Date => "DATE".into(),
        ColumnType::Datetime => "TIMESTAMP".into(),
        ColumnType::Decimal { precision, scale } => format!("DECIMAL({precision}, {scale})"),
        ColumnType::Duration => "VARCHAR(30)".into(),
        ColumnType::Integer => "INT".into(),
        ColumnType::Percent => "DECIMAL(5, 4)".into(),
        ColumnType::Short => "SMALLINT".into(),
        ColumnType::String { max_length } => format!("VARCHAR({max_length})"),
        ColumnType::Time => "TIME".into(),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_map_to_postgres_names() {
        assert_eq!(column_type(ColumnType::Boolean), "BOOLEAN");
        assert_eq!(column_type(ColumnType::Datetime), "TIMESTAMP");
        assert_eq!(column_type(ColumnType::String { max_length: 60 }), "VARCHAR(60)");
        assert_eq!(
            column_type(ColumnType::Decimal { precision: 9, scale: 2 }),
            "DECIMAL(9, 2)"
        );
    }

    #[test]
    fn long_identifiers_are_shortened_with_a_hash() {
        let long = "StudentSchoolAssociationAlternativeGraduationPlanReferenceExtension";
        let other = "StudentSchoolAssociationAlternativeGraduationPlanReferenceExtensions";

        let shortened = ident(long);
        assert_eq!(shortened.len(), MAX_IDENTIFIER_LENGTH);
        assert!(shortened.starts_with(&long[..SHORTENED_PREFIX]));
        assert_ne!(shortened, ident(other));
        assert_eq!(ident(long), shortened);
    }

    #[test]
    fn short_identifiers_are_unchanged() {
        assert_eq!(qualified("edfi", "Student"), "edfi.Student");
    }
}
