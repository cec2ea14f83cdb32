//! The in-memory table and its schema.
//!
//! [`TypedColumnSet`] is the boundary type between this crate and its callers:
//! writers borrow one, the fixed-schema reader returns a freshly built one.
//! Columns are kept in an [`IndexMap`] so insertion order is the column order
//! on the wire.

use crate::value::{Cell, Column, ColumnType};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One declared column of a [`Schema`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Field {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Field {
            name: name.into(),
            column_type,
        }
    }
}

/// Ordered list of column names and types.
///
/// # Examples
///
/// ```rust
/// use delimtext::{ColumnType, Schema};
///
/// let schema = Schema::new()
///     .field("id", ColumnType::Integer)
///     .field("name", ColumnType::String);
/// assert_eq!(schema.len(), 2);
///
/// let same: Schema = [("id", ColumnType::Integer), ("name", ColumnType::String)]
///     .into_iter()
///     .collect();
/// assert_eq!(schema, same);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column declaration.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.fields.push(Field::new(name, column_type));
        self
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Checks that every name is non-empty and unique.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchema`] describing the first offending name.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(Error::invalid_schema("column names cannot be empty"));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(Error::invalid_schema(&format!(
                    "column '{}' is declared more than once",
                    field.name
                )));
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, ColumnType)> for Schema {
    fn from_iter<I: IntoIterator<Item = (S, ColumnType)>>(iter: I) -> Self {
        Schema {
            fields: iter
                .into_iter()
                .map(|(name, column_type)| Field::new(name, column_type))
                .collect(),
        }
    }
}

/// An in-memory table: ordered named columns sharing one row count.
///
/// The row count is fixed by the first column added; every later column must
/// have the same length.
///
/// # Examples
///
/// ```rust
/// use delimtext::{Cell, Column, TypedColumnSet};
///
/// let mut table = TypedColumnSet::new();
/// table.push_column("id", Column::from(vec![1i64, 2, 3])).unwrap();
/// table.push_column("name", Column::from(vec![Some("a"), None, Some("c")])).unwrap();
///
/// assert_eq!(table.row_count(), 3);
/// assert_eq!(table.names().collect::<Vec<_>>(), vec!["id", "name"]);
/// assert_eq!(table.row(1).unwrap(), vec![Cell::Integer(2), Cell::Missing]);
///
/// // Length mismatch is rejected
/// assert!(table.push_column("short", Column::from(vec![1.0])).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypedColumnSet {
    columns: IndexMap<String, Column>,
    row_count: usize,
}

impl TypedColumnSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with room for `columns` columns.
    #[must_use]
    pub fn with_capacity(columns: usize) -> Self {
        TypedColumnSet {
            columns: IndexMap::with_capacity(columns),
            row_count: 0,
        }
    }

    /// Adds a column at the end of the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchema`] if `name` is empty,
    /// [`Error::DuplicateColumn`] if `name` is already present and
    /// [`Error::RowCountMismatch`] if the column length differs from the
    /// length of the columns already present.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_schema("column names cannot be empty"));
        }
        if self.columns.contains_key(&name) {
            return Err(Error::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && column.len() != self.row_count {
            return Err(Error::RowCountMismatch {
                column: name,
                expected: self.row_count,
                found: column.len(),
            });
        }
        self.row_count = column.len();
        self.columns.insert(name, column);
        Ok(())
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` when the table has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    #[must_use]
    pub fn column_at(&self, index: usize) -> Option<(&str, &Column)> {
        self.columns
            .get_index(index)
            .map(|(name, column)| (name.as_str(), column))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(name, column)| (name.as_str(), column))
    }

    /// Returns the schema (names and types) of this table.
    #[must_use]
    pub fn schema(&self) -> Schema {
        self.columns
            .iter()
            .map(|(name, column)| (name.clone(), column.column_type()))
            .collect()
    }

    /// Returns the cells of one row, in column order.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Vec<Cell<'_>>> {
        if index >= self.row_count {
            return None;
        }
        self.columns.values().map(|column| column.get(index)).collect()
    }

    /// Consumes the table, yielding its columns in order.
    pub fn into_columns(self) -> impl Iterator<Item = (String, Column)> {
        self.columns.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_column_rejected() {
        let mut table = TypedColumnSet::new();
        table.push_column("a", Column::from(vec![1i64])).unwrap();
        let err = table.push_column("a", Column::from(vec![2i64])).unwrap_err();
        assert_eq!(err, Error::DuplicateColumn("a".to_string()));
    }

    #[test]
    fn test_empty_column_name_rejected() {
        let mut table = TypedColumnSet::new();
        let err = table.push_column("", Column::from(vec![1i64])).unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)));
        assert_eq!(table.column_count(), 0);

        table.push_column("b", Column::from(vec![2i64])).unwrap();
        assert!(table.schema().validate().is_ok());
    }

    #[test]
    fn test_first_column_sets_row_count() {
        let mut table = TypedColumnSet::new();
        assert_eq!(table.row_count(), 0);
        table
            .push_column("a", Column::from(vec![1.0, 2.0, 3.0]))
            .unwrap();
        assert_eq!(table.row_count(), 3);
        let err = table
            .push_column("b", Column::from(vec![true]))
            .unwrap_err();
        assert_eq!(
            err,
            Error::RowCountMismatch {
                column: "b".to_string(),
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn test_schema_roundtrip() {
        let mut table = TypedColumnSet::new();
        table.push_column("flag", Column::from(vec![true])).unwrap();
        table.push_column("label", Column::from(vec!["x"])).unwrap();
        let schema = table.schema();
        assert_eq!(
            schema.fields(),
            &[
                Field::new("flag", ColumnType::Boolean),
                Field::new("label", ColumnType::String)
            ]
        );
    }

    #[test]
    fn test_schema_validate() {
        let ok = Schema::new().field("a", ColumnType::Double);
        assert!(ok.validate().is_ok());

        let dup = Schema::new()
            .field("a", ColumnType::Double)
            .field("a", ColumnType::String);
        assert!(matches!(dup.validate(), Err(Error::InvalidSchema(_))));

        let empty = Schema::new().field("", ColumnType::Double);
        assert!(matches!(empty.validate(), Err(Error::InvalidSchema(_))));
    }

    #[test]
    fn test_schema_from_json() {
        let schema: Schema = serde_json::from_str(
            r#"[{"name": "id", "type": "integer"}, {"name": "fare", "type": "double"}]"#,
        )
        .unwrap();
        assert_eq!(
            schema,
            Schema::new()
                .field("id", ColumnType::Integer)
                .field("fare", ColumnType::Double)
        );
    }
}
