//! Cells, column types and typed column storage.
//!
//! ## Core Types
//!
//! - [`ColumnType`]: the four element types a column can hold
//! - [`Cell`]: one scalar value tagged by type, with [`Cell::Missing`] as a first-class state
//! - [`Column`]: homogeneous storage for one column, one `Vec<Option<T>>` per type
//!
//! ## Usage
//!
//! ```rust
//! use delimtext::{Cell, Column, ColumnType};
//!
//! let column = Column::from(vec![Some(1.5), None, Some(f64::INFINITY)]);
//! assert_eq!(column.column_type(), ColumnType::Double);
//! assert_eq!(column.len(), 3);
//! assert_eq!(column.get(1), Some(Cell::Missing));
//! assert_eq!(column.get(2), Some(Cell::Double(f64::INFINITY)));
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Declared element type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Boolean,
    Integer,
    Double,
    String,
}

impl ColumnType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Integer => "integer",
            ColumnType::Double => "double",
            ColumnType::String => "string",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scalar value of a table.
///
/// String cells borrow from column storage when read out of a [`Column`] and
/// own their text when produced by the row serializer.
///
/// # Examples
///
/// ```rust
/// use delimtext::{Cell, ColumnType};
///
/// assert_eq!(Cell::from(42i64).column_type(), Some(ColumnType::Integer));
/// assert_eq!(Cell::from("Alice").column_type(), Some(ColumnType::String));
/// assert!(Cell::Missing.is_missing());
/// assert_eq!(Cell::Missing.column_type(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Cell<'a> {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(Cow<'a, str>),
    #[default]
    Missing,
}

impl<'a> Cell<'a> {
    #[inline]
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Returns the type of this cell, or `None` for [`Cell::Missing`].
    #[must_use]
    pub const fn column_type(&self) -> Option<ColumnType> {
        match self {
            Cell::Boolean(_) => Some(ColumnType::Boolean),
            Cell::Integer(_) => Some(ColumnType::Integer),
            Cell::Double(_) => Some(ColumnType::Double),
            Cell::String(_) => Some(ColumnType::String),
            Cell::Missing => None,
        }
    }

    /// Detaches the cell from any borrowed column storage.
    #[must_use]
    pub fn into_owned(self) -> Cell<'static> {
        match self {
            Cell::Boolean(b) => Cell::Boolean(b),
            Cell::Integer(i) => Cell::Integer(i),
            Cell::Double(d) => Cell::Double(d),
            Cell::String(s) => Cell::String(Cow::Owned(s.into_owned())),
            Cell::Missing => Cell::Missing,
        }
    }

    fn type_name(&self) -> &'static str {
        self.column_type().map_or("missing", |t| t.as_str())
    }
}

impl From<bool> for Cell<'_> {
    fn from(v: bool) -> Self {
        Cell::Boolean(v)
    }
}

impl From<i64> for Cell<'_> {
    fn from(v: i64) -> Self {
        Cell::Integer(v)
    }
}

impl From<i32> for Cell<'_> {
    fn from(v: i32) -> Self {
        Cell::Integer(i64::from(v))
    }
}

impl From<f64> for Cell<'_> {
    fn from(v: f64) -> Self {
        Cell::Double(v)
    }
}

impl<'a> From<&'a str> for Cell<'a> {
    fn from(v: &'a str) -> Self {
        Cell::String(Cow::Borrowed(v))
    }
}

impl From<String> for Cell<'_> {
    fn from(v: String) -> Self {
        Cell::String(Cow::Owned(v))
    }
}

impl<'a, T: Into<Cell<'a>>> From<Option<T>> for Cell<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Cell::Missing, Into::into)
    }
}

/// Homogeneously typed storage for one column.
///
/// `None` entries are missing values.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Boolean(Vec<Option<bool>>),
    Integer(Vec<Option<i64>>),
    Double(Vec<Option<f64>>),
    String(Vec<Option<String>>),
}

impl Column {
    /// Creates an empty column of `column_type` with room for `capacity` rows.
    #[must_use]
    pub fn with_capacity(column_type: ColumnType, capacity: usize) -> Self {
        match column_type {
            ColumnType::Boolean => Column::Boolean(Vec::with_capacity(capacity)),
            ColumnType::Integer => Column::Integer(Vec::with_capacity(capacity)),
            ColumnType::Double => Column::Double(Vec::with_capacity(capacity)),
            ColumnType::String => Column::String(Vec::with_capacity(capacity)),
        }
    }

    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        match self {
            Column::Boolean(_) => ColumnType::Boolean,
            Column::Integer(_) => ColumnType::Integer,
            Column::Double(_) => ColumnType::Double,
            Column::String(_) => ColumnType::String,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Column::Boolean(v) => v.len(),
            Column::Integer(v) => v.len(),
            Column::Double(v) => v.len(),
            Column::String(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        match self {
            Column::Boolean(v) => v.capacity(),
            Column::Integer(v) => v.capacity(),
            Column::Double(v) => v.capacity(),
            Column::String(v) => v.capacity(),
        }
    }

    /// Returns the cell at `row`, borrowing string data from the column.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<Cell<'_>> {
        let cell = match self {
            Column::Boolean(v) => Cell::from(*v.get(row)?),
            Column::Integer(v) => Cell::from(*v.get(row)?),
            Column::Double(v) => Cell::from(*v.get(row)?),
            Column::String(v) => Cell::from(v.get(row)?.as_deref()),
        };
        Some(cell)
    }

    /// Appends a cell, checking it against the column type.
    ///
    /// [`Cell::Missing`] is accepted by every column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnTypeMismatch`] if the cell has a different type;
    /// `name` is only used for that message.
    pub fn push(&mut self, name: &str, cell: Cell<'_>) -> Result<()> {
        match (self, cell) {
            (Column::Boolean(v), Cell::Boolean(b)) => v.push(Some(b)),
            (Column::Boolean(v), Cell::Missing) => v.push(None),
            (Column::Integer(v), Cell::Integer(i)) => v.push(Some(i)),
            (Column::Integer(v), Cell::Missing) => v.push(None),
            (Column::Double(v), Cell::Double(d)) => v.push(Some(d)),
            (Column::Double(v), Cell::Missing) => v.push(None),
            (Column::String(v), Cell::String(s)) => v.push(Some(s.into_owned())),
            (Column::String(v), Cell::Missing) => v.push(None),
            (column, cell) => {
                return Err(Error::ColumnTypeMismatch {
                    column: name.to_string(),
                    expected: column.column_type().to_string(),
                    found: cell.type_name().to_string(),
                })
            }
        }
        Ok(())
    }

    /// Iterates over the cells of the column in row order.
    pub fn iter(&self) -> impl Iterator<Item = Cell<'_>> + '_ {
        (0..self.len()).filter_map(move |row| self.get(row))
    }
}

macro_rules! impl_column_from {
    ($variant:ident, $ty:ty) => {
        impl From<Vec<$ty>> for Column {
            fn from(v: Vec<$ty>) -> Self {
                Column::$variant(v.into_iter().map(Some).collect())
            }
        }

        impl From<Vec<Option<$ty>>> for Column {
            fn from(v: Vec<Option<$ty>>) -> Self {
                Column::$variant(v)
            }
        }
    };
}

impl_column_from!(Boolean, bool);
impl_column_from!(Integer, i64);
impl_column_from!(Double, f64);
impl_column_from!(String, String);

impl From<Vec<&str>> for Column {
    fn from(v: Vec<&str>) -> Self {
        Column::String(v.into_iter().map(|s| Some(s.to_string())).collect())
    }
}

impl From<Vec<Option<&str>>> for Column {
    fn from(v: Vec<Option<&str>>) -> Self {
        Column::String(v.into_iter().map(|s| s.map(str::to_string)).collect())
    }
}
