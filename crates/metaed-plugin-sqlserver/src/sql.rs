use metaed_plugin_relational::model::ColumnType;
use metaed_schema::version::{SemVer, satisfies};

/// Targets whose datetime columns use `DATETIME2(7)`.
pub const DATETIME2_VERSIONS: &str = ">=3.1.1";

/// Bracket-quote an identifier.
#[must_use]
pub fn quote(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

/// `[schema].[table]`
#[must_use]
pub fn qualified(schema: &str, table: &str) -> String {
    format!("{}.{}", quote(schema), quote(table))
}

/// SQL Server type of a column for a target version.
#[must_use]
pub fn column_type(column_type: ColumnType, target_version: &SemVer) -> String {
    match column_type {
        ColumnType::Boolean => "BIT".into(),
        ColumnType::Currency => "MONEY".into(),
        ColumnType::Date => "DATE".into(),
        ColumnType::Datetime if satisfies(target_version, DATETIME2_VERSIONS) => "DATETIME2(7)".into(),
        ColumnType::Datetime => "DATETIME".into(),
        ColumnType::Decimal { precision, scale } => format!("DECIMAL({precision}, {scale})"),
        ColumnType::Duration => "NVARCHAR(30)".into(),
        ColumnType::Integer => "INT".into(),
        ColumnType::Percent => "DECIMAL(5, 4)".into(),
        ColumnType::Short => "SMALLINT".into(),
        ColumnType::String { max_length } => format!("NVARCHAR({max_length})"),
        ColumnType::Time => "TIME(7)".into(),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_type_follows_target_version() {
        assert_eq!(column_type(ColumnType::Datetime, &SemVer::new(3, 1, 1)), "DATETIME2(7)");
        assert_eq!(column_type(ColumnType::Datetime, &SemVer::new(5, 0, 0)), "DATETIME2(7)");
        assert_eq!(column_type(ColumnType::Datetime, &SemVer::new(3, 1, 0)), "DATETIME");
        assert_eq!(column_type(ColumnType::Datetime, &SemVer::new(2, 0, 0)), "DATETIME");
    }

    #[test]
    fn sized_types_render_their_size() {
        let v = SemVer::new(3, 1, 0);

        assert_eq!(column_type(ColumnType::String { max_length: 60 }, &v), "NVARCHAR(60)");
        assert_eq!(
            column_type(ColumnType::Decimal { precision: 9, scale: 2 }, &v),
            "DECIMAL(9, 2)"
        );
    }

    #[test]
    fn identifiers_are_bracketed() {
        assert_eq!(qualified("edfi", "Student"), "[edfi].[Student]");
        assert_eq!(quote("odd]name"), "[odd]]name]");
    }
}
