//! Fixed-schema bulk reader.
//!
//! The reader tokenizes a delimited source, maps every declared column to its
//! position in the header line, and coerces each field into typed column
//! storage. Columns not named by the schema are ignored, and a record only
//! needs enough fields to reach the last declared column.
//!
//! Empty unquoted fields are missing in boolean, integer and double columns
//! and the empty string in string columns. Fields equal to the NA string are
//! missing in every column unless they were quoted.

use crate::table::{Schema, TypedColumnSet};
use crate::tokenizer::{Record, Token, Tokenizer};
use crate::value::{Cell, Column, ColumnType};
use crate::{make_tokenizer, Error, ReadOptions, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Rows preallocated per column at most, whatever the row hint says.
const MAX_PREALLOC_ROWS: usize = 1 << 20;

/// Reads delimited text into a [`TypedColumnSet`] with a declared schema.
///
/// # Examples
///
/// ```rust
/// use delimtext::{Cell, ColumnType, FixedSchemaReader, ReadOptions, Schema};
///
/// let schema = Schema::new()
///     .field("fare", ColumnType::Double)
///     .field("id", ColumnType::Integer);
/// let reader = FixedSchemaReader::new(schema).with_options(ReadOptions::new().with_row_hint(2));
///
/// let table = reader.read_str("id,vendor,fare\n1,CMT,12.5\n2,VTS,NA\n").unwrap();
/// assert_eq!(table.names().collect::<Vec<_>>(), vec!["fare", "id"]);
/// assert_eq!(table.row(1).unwrap(), vec![Cell::Missing, Cell::Integer(2)]);
/// ```
#[derive(Clone, Debug)]
pub struct FixedSchemaReader {
    schema: Schema,
    options: ReadOptions,
}

/// Where one declared column comes from in each record.
struct Slot {
    index: usize,
    name: String,
    column_type: ColumnType,
}

/// Header-derived placement of the declared columns.
struct Layout {
    header_len: usize,
    required: usize,
    slots: Vec<Slot>,
}

impl FixedSchemaReader {
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        FixedSchemaReader {
            schema,
            options: ReadOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Reads the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened, plus every error
    /// [`read_buf`](Self::read_buf) can return.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<TypedColumnSet> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::io(&format!("failed to open '{}': {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "reading fixed-schema table");
        self.read_buf(BufReader::new(file))
    }

    pub fn read_reader<R: Read>(&self, reader: R) -> Result<TypedColumnSet> {
        self.read_buf(BufReader::new(reader))
    }

    pub fn read_str(&self, input: &str) -> Result<TypedColumnSet> {
        self.read_buf(input.as_bytes())
    }

    /// Reads a whole buffered source.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSchema`] / [`Error::InvalidDialect`] for bad configuration
    /// - [`Error::SchemaMismatch`] listing every declared column absent from the header
    /// - [`Error::FieldCount`] for a record too short to hold every declared column
    /// - [`Error::FieldParseError`] for a field that does not coerce to its column type
    /// - [`Error::MalformedRecord`] for an unterminated quoted field
    pub fn read_buf<R: BufRead>(&self, mut source: R) -> Result<TypedColumnSet> {
        self.schema.validate()?;
        let mut tokenizer = make_tokenizer(&self.options.tokenizer_spec())?;
        tokenizer.skip_lines(&mut source, self.options.skip)?;

        let mut record = Record::new();
        if !tokenizer.next_record(&mut source, &mut record)? {
            if self.schema.is_empty() {
                return Ok(TypedColumnSet::new());
            }
            return Err(Error::SchemaMismatch {
                missing: self.schema.names().map(str::to_string).collect(),
            });
        }

        let layout = self.map_header(&record)?;
        let capacity = self.options.row_hint.min(MAX_PREALLOC_ROWS);
        let mut columns: Vec<Column> = layout
            .slots
            .iter()
            .map(|slot| Column::with_capacity(slot.column_type, capacity))
            .collect();

        let rows = self.read_rows(&mut tokenizer, &mut source, &mut record, &layout, &mut columns)?;

        let mut table = TypedColumnSet::with_capacity(layout.slots.len());
        for (slot, column) in layout.slots.into_iter().zip(columns) {
            table.push_column(slot.name, column)?;
        }
        tracing::debug!(
            rows,
            columns = table.column_count(),
            lines = tokenizer.line(),
            "read fixed-schema table"
        );
        Ok(table)
    }

    fn map_header(&self, header: &Record) -> Result<Layout> {
        let positions: Vec<&str> = (0..header.len())
            .filter_map(|i| header.text_at(i))
            .collect();

        let mut slots = Vec::with_capacity(self.schema.len());
        let mut missing = Vec::new();
        for field in self.schema.fields() {
            match positions.iter().position(|name| *name == field.name) {
                Some(index) => slots.push(Slot {
                    index,
                    name: field.name.clone(),
                    column_type: field.column_type,
                }),
                None => missing.push(field.name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(Error::SchemaMismatch { missing });
        }
        Ok(Layout {
            header_len: header.len(),
            required: slots.iter().map(|slot| slot.index + 1).max().unwrap_or(0),
            slots,
        })
    }

    fn read_rows<R: BufRead>(
        &self,
        tokenizer: &mut Tokenizer,
        source: &mut R,
        record: &mut Record,
        layout: &Layout,
        columns: &mut [Column],
    ) -> Result<usize> {
        let row_hint = self.options.row_hint;
        let mut row = 0;
        while tokenizer.next_record(source, record)? {
            // A blank line is only a record when the header has one column.
            if layout.header_len > 1 && record.is_blank() {
                continue;
            }
            row += 1;
            if record.len() < layout.required {
                return Err(Error::FieldCount {
                    row,
                    expected: layout.required,
                    found: record.len(),
                });
            }
            if row == row_hint.saturating_add(1) && row_hint > 0 {
                tracing::debug!(row_hint, "row hint exceeded, growing columns");
            }
            for (slot, column) in layout.slots.iter().zip(columns.iter_mut()) {
                let token = record.get(slot.index).unwrap_or(Token::Missing);
                let cell = coerce(token, slot.column_type, row, &slot.name)?;
                column.push(&slot.name, cell)?;
            }
        }
        Ok(row)
    }
}

/// Converts one token into a cell of `column_type`.
///
/// `row` and `column` only feed the error.
fn coerce<'a>(
    token: Token<'a>,
    column_type: ColumnType,
    row: usize,
    column: &str,
) -> Result<Cell<'a>> {
    let text = match token {
        Token::Missing => return Ok(Cell::Missing),
        Token::Empty if column_type == ColumnType::String => return Ok(Cell::from("")),
        Token::Empty => return Ok(Cell::Missing),
        Token::Text(text) => text,
    };
    let cell = match column_type {
        ColumnType::String => Cell::String(Cow::Borrowed(text)),
        ColumnType::Boolean => Cell::Boolean(
            parse_bool(text).ok_or_else(|| Error::field_parse(row, column, text, "a boolean"))?,
        ),
        ColumnType::Integer => Cell::Integer(
            text.parse::<i64>()
                .map_err(|_| Error::field_parse(row, column, text, "an integer"))?,
        ),
        ColumnType::Double => Cell::Double(
            parse_double(text).ok_or_else(|| Error::field_parse(row, column, text, "a double"))?,
        ),
    };
    Ok(cell)
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "TRUE" | "True" | "true" | "T" | "t" | "1" => Some(true),
        "FALSE" | "False" | "false" | "F" | "f" | "0" => Some(false),
        _ => None,
    }
}

fn parse_double(text: &str) -> Option<f64> {
    match text {
        "NaN" => Some(f64::NAN),
        "Inf" | "+Inf" => Some(f64::INFINITY),
        "-Inf" => Some(f64::NEG_INFINITY),
        _ => {
            let value = text.parse::<f64>().ok()?;
            // Rust also accepts spellings such as "infinity"; only the forms above are written.
            if value.is_finite() {
                Some(value)
            } else {
                None
            }
        }
    }
}
