//! Serde bridge from Rust records to cells.
//!
//! Two serializers live here:
//!
//! - [`CellSerializer`] turns one scalar value into a [`Cell`]. Anything that
//!   is not a scalar fails with [`Error::UnsupportedType`] naming the shape.
//! - [`RowSerializer`] turns one record (struct, map, tuple or sequence of
//!   scalars) into named cells. Positional records get the names `X1`, `X2`, ...
//!
//! They back [`TypedColumnSet::from_rows`] and [`crate::encode_value`].
//!
//! ```rust
//! use delimtext::{to_string, TypedColumnSet, WriteOptions};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Trip { medallion: String, fare: f64, tip: Option<f64> }
//!
//! let trips = vec![
//!     Trip { medallion: "A1".into(), fare: 12.5, tip: Some(2.0) },
//!     Trip { medallion: "B7".into(), fare: 7.0, tip: None },
//! ];
//! let table = TypedColumnSet::from_rows(&trips).unwrap();
//! let csv = to_string(&table, &WriteOptions::default()).unwrap();
//! assert_eq!(csv, "medallion,fare,tip\nA1,12.5,2\nB7,7,NA\n");
//! ```

use crate::table::TypedColumnSet;
use crate::value::{Cell, Column, ColumnType};
use crate::{Error, Result};
use serde::ser::{self, Impossible, Serialize};
use std::borrow::Cow;

/// Serializes a single scalar into a [`Cell`].
pub struct CellSerializer;

impl ser::Serializer for CellSerializer {
    type Ok = Cell<'static>;
    type Error = Error;

    type SerializeSeq = Impossible<Cell<'static>, Error>;
    type SerializeTuple = Impossible<Cell<'static>, Error>;
    type SerializeTupleStruct = Impossible<Cell<'static>, Error>;
    type SerializeTupleVariant = Impossible<Cell<'static>, Error>;
    type SerializeMap = Impossible<Cell<'static>, Error>;
    type SerializeStruct = Impossible<Cell<'static>, Error>;
    type SerializeStructVariant = Impossible<Cell<'static>, Error>;

    fn serialize_bool(self, v: bool) -> Result<Cell<'static>> {
        Ok(Cell::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Cell<'static>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Cell<'static>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Cell<'static>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Cell<'static>> {
        Ok(Cell::Integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Cell<'static>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Cell<'static>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Cell<'static>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Cell<'static>> {
        i64::try_from(v)
            .map(Cell::Integer)
            .map_err(|_| Error::unsupported_type("u64 above i64::MAX"))
    }

    fn serialize_f32(self, v: f32) -> Result<Cell<'static>> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Cell<'static>> {
        Ok(Cell::Double(v))
    }

    fn serialize_char(self, v: char) -> Result<Cell<'static>> {
        Ok(Cell::String(Cow::Owned(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Cell<'static>> {
        Ok(Cell::String(Cow::Owned(v.to_string())))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Cell<'static>> {
        Err(Error::unsupported_type("bytes"))
    }

    fn serialize_none(self) -> Result<Cell<'static>> {
        Ok(Cell::Missing)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Cell<'static>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Cell<'static>> {
        Ok(Cell::Missing)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Cell<'static>> {
        Ok(Cell::Missing)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Cell<'static>> {
        Ok(Cell::String(Cow::Borrowed(variant)))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Cell<'static>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Cell<'static>>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_type("newtype variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Error::unsupported_type("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Error::unsupported_type("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Error::unsupported_type("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_type("tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::unsupported_type("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(Error::unsupported_type("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_type("struct variant"))
    }
}

fn to_cell<T: Serialize + ?Sized>(value: &T) -> Result<Cell<'static>> {
    value.serialize(CellSerializer)
}

/// Named cells of one record, in field order.
pub type RowCells = Vec<(String, Cell<'static>)>;

/// Serializes one record into named cells.
pub struct RowSerializer;

pub struct SerializeRow {
    cells: RowCells,
    current_key: Option<String>,
}

impl SerializeRow {
    fn with_capacity(len: usize) -> Self {
        SerializeRow {
            cells: Vec::with_capacity(len),
            current_key: None,
        }
    }

    fn push_positional<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let name = format!("X{}", self.cells.len() + 1);
        self.cells.push((name, to_cell(value)?));
        Ok(())
    }
}

impl ser::Serializer for RowSerializer {
    type Ok = RowCells;
    type Error = Error;

    type SerializeSeq = SerializeRow;
    type SerializeTuple = SerializeRow;
    type SerializeTupleStruct = SerializeRow;
    type SerializeTupleVariant = Impossible<RowCells, Error>;
    type SerializeMap = SerializeRow;
    type SerializeStruct = SerializeRow;
    type SerializeStructVariant = Impossible<RowCells, Error>;

    fn serialize_bool(self, _v: bool) -> Result<RowCells> {
        Err(scalar_row())
    }

    fn serialize_i64(self, _v: i64) -> Result<RowCells> {
        Err(scalar_row())
    }

    fn serialize_u64(self, _v: u64) -> Result<RowCells> {
        Err(scalar_row())
    }

    fn serialize_f64(self, _v: f64) -> Result<RowCells> {
        Err(scalar_row())
    }

    fn serialize_i8(self, v: i8) -> Result<RowCells> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<RowCells> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<RowCells> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<RowCells> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<RowCells> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<RowCells> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<RowCells> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_char(self, _v: char) -> Result<RowCells> {
        Err(scalar_row())
    }

    fn serialize_str(self, _v: &str) -> Result<RowCells> {
        Err(scalar_row())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<RowCells> {
        Err(Error::unsupported_type("bytes"))
    }

    fn serialize_none(self) -> Result<RowCells> {
        Err(Error::unsupported_type("missing row"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<RowCells>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<RowCells> {
        Err(scalar_row())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<RowCells> {
        Err(scalar_row())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<RowCells> {
        Err(scalar_row())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<RowCells>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<RowCells>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_type("newtype variant"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeRow> {
        Ok(SerializeRow::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeRow> {
        Ok(SerializeRow::with_capacity(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeRow> {
        Ok(SerializeRow::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_type("tuple variant"))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeRow> {
        Ok(SerializeRow::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeRow> {
        Ok(SerializeRow::with_capacity(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_type("struct variant"))
    }
}

fn scalar_row() -> Error {
    Error::unsupported_type("scalar row (rows must be structs, maps or tuples)")
}

impl ser::SerializeSeq for SerializeRow {
    type Ok = RowCells;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push_positional(value)
    }

    fn end(self) -> Result<RowCells> {
        Ok(self.cells)
    }
}

impl ser::SerializeTuple for SerializeRow {
    type Ok = RowCells;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push_positional(value)
    }

    fn end(self) -> Result<RowCells> {
        Ok(self.cells)
    }
}

impl ser::SerializeTupleStruct for SerializeRow {
    type Ok = RowCells;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push_positional(value)
    }

    fn end(self) -> Result<RowCells> {
        Ok(self.cells)
    }
}

impl ser::SerializeMap for SerializeRow {
    type Ok = RowCells;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_cell(key)? {
            Cell::String(s) => {
                self.current_key = Some(s.into_owned());
                Ok(())
            }
            _ => Err(Error::custom("Map keys must be strings")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.cells.push((key, to_cell(value)?));
        Ok(())
    }

    fn end(self) -> Result<RowCells> {
        Ok(self.cells)
    }
}

impl ser::SerializeStruct for SerializeRow {
    type Ok = RowCells;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.cells.push((key.to_string(), to_cell(value)?));
        Ok(())
    }

    fn end(self) -> Result<RowCells> {
        Ok(self.cells)
    }
}

impl TypedColumnSet {
    /// Builds a table from serializable records, one row per record.
    ///
    /// Column names and order come from the first record; every later record
    /// must have the same fields in the same order. Each column takes the type
    /// of its first non-missing cell; a column that is missing throughout
    /// becomes a string column. An empty slice yields an empty table.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedType`] if a record or field has no cell form
    /// - [`Error::InvalidSchema`] if records disagree on their fields or a field name is empty
    /// - [`Error::ColumnTypeMismatch`] if a column mixes cell types
    pub fn from_rows<T: Serialize>(rows: &[T]) -> Result<TypedColumnSet> {
        let mut rows = rows.iter();
        let Some(first) = rows.next() else {
            return Ok(TypedColumnSet::new());
        };

        let first = first.serialize(RowSerializer)?;
        let names: Vec<String> = first.iter().map(|(name, _)| name.clone()).collect();
        let mut cells: Vec<Vec<Cell<'static>>> = first
            .into_iter()
            .map(|(_, cell)| {
                let mut column = Vec::with_capacity(rows.len() + 1);
                column.push(cell);
                column
            })
            .collect();

        for (index, row) in rows.enumerate() {
            let row = row.serialize(RowSerializer)?;
            let same_fields = row.len() == names.len()
                && row.iter().zip(&names).all(|((name, _), expected)| name == expected);
            if !same_fields {
                return Err(Error::invalid_schema(&format!(
                    "record {} has fields [{}], expected [{}]",
                    index + 2,
                    row.iter()
                        .map(|(name, _)| name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                    names.join(", ")
                )));
            }
            for (column, (_, cell)) in cells.iter_mut().zip(row) {
                column.push(cell);
            }
        }

        let mut table = TypedColumnSet::with_capacity(names.len());
        for (name, column_cells) in names.into_iter().zip(cells) {
            let column_type = column_cells
                .iter()
                .find_map(Cell::column_type)
                .unwrap_or(ColumnType::String);
            let mut column = Column::with_capacity(column_type, column_cells.len());
            for cell in column_cells {
                column.push(&name, cell)?;
            }
            table.push_column(name, column)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Reading {
        sensor: &'static str,
        value: Option<f64>,
        ok: bool,
    }

    #[derive(Serialize)]
    enum Status {
        Active,
    }

    #[test]
    fn test_cell_serializer_scalars() {
        assert_eq!(to_cell(&true).unwrap(), Cell::Boolean(true));
        assert_eq!(to_cell(&-3i16).unwrap(), Cell::Integer(-3));
        assert_eq!(to_cell(&1.5f32).unwrap(), Cell::Double(1.5));
        assert_eq!(to_cell(&'x').unwrap(), Cell::from("x"));
        assert_eq!(to_cell(&None::<i32>).unwrap(), Cell::Missing);
        assert_eq!(to_cell(&()).unwrap(), Cell::Missing);
        assert_eq!(to_cell(&Status::Active).unwrap(), Cell::from("Active"));
    }

    #[test]
    fn test_cell_serializer_rejects_nested() {
        let mut map = BTreeMap::new();
        map.insert("k", 1);
        assert_eq!(
            to_cell(&map).unwrap_err(),
            Error::UnsupportedType("map".to_string())
        );
        assert_eq!(
            to_cell(&(1, 2)).unwrap_err(),
            Error::UnsupportedType("tuple".to_string())
        );
    }

    #[test]
    fn test_from_rows_struct() {
        let rows = vec![
            Reading {
                sensor: "a",
                value: None,
                ok: true,
            },
            Reading {
                sensor: "b",
                value: Some(0.25),
                ok: false,
            },
        ];
        let table = TypedColumnSet::from_rows(&rows).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.column("value"),
            Some(&Column::Double(vec![None, Some(0.25)]))
        );
        assert_eq!(
            table.column("ok"),
            Some(&Column::Boolean(vec![Some(true), Some(false)]))
        );
    }

    #[test]
    fn test_from_rows_tuples_get_positional_names() {
        let rows = vec![(1i64, "a"), (2, "b")];
        let table = TypedColumnSet::from_rows(&rows).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["X1", "X2"]);
    }

    #[test]
    fn test_from_rows_all_missing_is_string() {
        let rows: Vec<(Option<i64>,)> = vec![(None,), (None,)];
        let table = TypedColumnSet::from_rows(&rows).unwrap();
        assert_eq!(table.column("X1"), Some(&Column::String(vec![None, None])));
    }

    #[test]
    fn test_from_rows_mixed_types_fail() {
        #[derive(Serialize)]
        #[serde(untagged)]
        enum Loose {
            Int(i64),
            Text(String),
        }

        let mut first = BTreeMap::new();
        first.insert("v", Loose::Int(1));
        let mut second = BTreeMap::new();
        second.insert("v", Loose::Text("two".to_string()));
        let err = TypedColumnSet::from_rows(&[first, second]).unwrap_err();
        assert_eq!(
            err,
            Error::ColumnTypeMismatch {
                column: "v".to_string(),
                expected: "integer".to_string(),
                found: "string".to_string(),
            }
        );
    }

    #[test]
    fn test_from_rows_field_mismatch() {
        let mut first = BTreeMap::new();
        first.insert("a", 1i64);
        let mut second = BTreeMap::new();
        second.insert("b", 1i64);
        let err = TypedColumnSet::from_rows(&[first, second]).unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)));
    }

    #[test]
    fn test_scalar_rows_rejected() {
        assert!(matches!(
            TypedColumnSet::from_rows(&[1, 2, 3]),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_empty_rows() {
        let rows: Vec<Reading> = Vec::new();
        assert!(TypedColumnSet::from_rows(&rows).unwrap().is_empty());
    }
}
