use derive_more::Display;
use serde::Serialize;

/// Length of a string column with no declared max length.
pub const DEFAULT_STRING_LENGTH: u32 = 255;

/// Precision of a decimal column with no declared total digits.
pub const DEFAULT_DECIMAL_PRECISION: u32 = 18;

///
/// ColumnType
///
/// Storage type of a column, before any dialect mapping.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum ColumnType {
    Boolean,
    Currency,
    Date,
    Datetime,
    Decimal { precision: u32, scale: u32 },
    Duration,
    Integer,
    Percent,
    Short,
    String { max_length: u32 },
    Time,
}

///
/// Column
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub is_nullable: bool,
    pub is_primary_key: bool,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            is_nullable: false,
            is_primary_key: false,
        }
    }

    #[must_use]
    pub const fn nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    /// The same column as part of a primary key.
    #[must_use]
    pub const fn key(mut self) -> Self {
        self.is_primary_key = true;
        self.is_nullable = false;
        self
    }
}

///
/// ForeignKey
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub foreign_schema: String,
    pub foreign_table: String,

    /// Referenced key columns, paired by position with `columns`.
    pub foreign_columns: Vec<String>,
}

///
/// Table
///

#[derive(Clone, Debug, Display, Eq, PartialEq, Serialize)]
#[display("{schema}.{name}")]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    #[must_use]
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Add a column. A repeated name keeps the first column, made
    /// non-nullable if either occurrence is.
    pub fn push_column(&mut self, column: Column) {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => {
                existing.is_nullable &= column.is_nullable;
                existing.is_primary_key |= column.is_primary_key;
            }
            None => self.columns.push(column),
        }
    }

    pub fn primary_key(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_columns_merge() {
        let mut table = Table::new("edfi", "StudentSchoolAssociation");
        table.push_column(Column::new("SchoolId", ColumnType::Integer).key());
        table.push_column(Column::new("SchoolId", ColumnType::Integer).nullable(true));
        table.push_column(Column::new("ExitDate", ColumnType::Date).nullable(true));

        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.primary_key().count(), 1);
        assert!(!table.column("SchoolId").unwrap().is_nullable);
        assert_eq!(table.to_string(), "edfi.StudentSchoolAssociation");
    }
}
