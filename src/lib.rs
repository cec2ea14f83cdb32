//! # delimtext
//!
//! Typed delimited-text tables: write a [`TypedColumnSet`] as CSV/TSV-style
//! text, and bulk-read such text back into typed columns against a declared
//! [`Schema`].
//!
//! ## Key Features
//!
//! - **Typed columns**: boolean, integer, double and string columns with a
//!   first-class missing value
//! - **Lossless missing values**: missing cells are written as a bare NA
//!   string, real strings that read `NA` are quoted
//! - **Configurable dialect**: any single-character delimiter and any NA string
//! - **Fixed-schema reading**: columns are located by header name, coerced to
//!   their declared type, and preallocated from a row-count hint
//! - **Serde bridge**: build a table from any slice of `#[derive(Serialize)]` rows
//! - **No Unsafe Code**: Written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```rust
//! use delimtext::{column_set, from_str, to_string, Cell, ColumnType, Schema, WriteOptions};
//!
//! let table = column_set! {
//!     "id" => [1i64, 2, 3],
//!     "name" => [Some("Alice"), Some("Bob, Jr."), None],
//! };
//!
//! let text = to_string(&table, &WriteOptions::default()).unwrap();
//! assert_eq!(text, "id,name\n1,Alice\n2,\"Bob, Jr.\"\n3,NA\n");
//!
//! let schema = Schema::new()
//!     .field("id", ColumnType::Integer)
//!     .field("name", ColumnType::String);
//! let back = from_str(&text, &schema).unwrap();
//! assert_eq!(back, table);
//! assert_eq!(back.row(2).unwrap(), vec![Cell::Integer(3), Cell::Missing]);
//! ```
//!
//! ### Tables From Serde Rows
//!
//! ```rust
//! use delimtext::{to_string, TypedColumnSet, WriteOptions};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Reading {
//!     sensor: &'static str,
//!     celsius: Option<f64>,
//! }
//!
//! let rows = [
//!     Reading { sensor: "north", celsius: Some(-3.5) },
//!     Reading { sensor: "south", celsius: None },
//! ];
//! let table = TypedColumnSet::from_rows(&rows).unwrap();
//! let text = to_string(&table, &WriteOptions::new().with_na("")).unwrap();
//! assert_eq!(text, "sensor,celsius\nnorth,-3.5\nsouth,\n");
//! ```
//!
//! ## Tokenizers
//!
//! Reading goes through a [`Tokenizer`] built from a [`TokenizerSpec`] by
//! [`make_tokenizer`]. The only variant today is `delimited`; unknown variant
//! tags fail with [`Error::UnsupportedSpecification`].
//!
//! ## Logging
//!
//! Operations emit [`tracing`] events at `debug` and `trace` level. No
//! subscriber is installed by the library.
//!
//! ## Format Reference
//!
//! See the [`dialect`] module for the exact quoting and coercion rules.
//!
//! ## Examples
//!
//! The `demos/` directory holds runnable programs:
//!
//! - **`write_table.rs`** - Building a table and writing it to a file
//! - **`read_fixed_schema.rs`** - Reading typed columns back with a schema
//! - **`custom_dialect.rs`** - Tabs, pipes, custom NA strings and tokenizer specs
//!
//! Run any example with: `cargo run --example <name>`

pub mod dialect;
pub mod encode;
pub mod error;
pub mod macros;
pub mod options;
pub mod quote;
pub mod reader;
pub mod ser;
pub mod table;
pub mod tokenizer;
pub mod value;
pub mod writer;

pub use encode::{encode, encode_value};
pub use error::{Error, Result};
pub use options::{Delimiter, ReadOptions, WriteOptions};
pub use quote::{needs_quoting, quote, unquote};
pub use reader::FixedSchemaReader;
pub use table::{Field, Schema, TypedColumnSet};
pub use tokenizer::{DelimitedTokenizer, Record, Token, Tokenizer, TokenizerKind, TokenizerSpec};
pub use value::{Cell, Column, ColumnType};
pub use writer::TableWriter;

use std::io;
use std::path::Path;

/// Builds the tokenizer described by `spec`.
///
/// # Examples
///
/// ```rust
/// use delimtext::{make_tokenizer, TokenizerKind, TokenizerSpec};
///
/// let tokenizer = make_tokenizer(&TokenizerSpec::delimited('\t', "")).unwrap();
/// assert_eq!(tokenizer.kind(), TokenizerKind::Delimited);
///
/// assert!(make_tokenizer(&TokenizerSpec::new("fixed_width", ',', "NA")).is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedSpecification`] for an unknown variant tag and
/// [`Error::InvalidDialect`] for an unusable delimiter.
pub fn make_tokenizer(spec: &TokenizerSpec) -> Result<Tokenizer> {
    Tokenizer::from_spec(spec)
}

/// Writes `table` as delimited text to `path`, or to memory when `path` is empty.
///
/// With an empty `path` the text is returned; otherwise the file is created,
/// truncated or appended to (per [`WriteOptions::append`]) and an empty string
/// is returned. A table with no columns writes nothing and never opens `path`.
///
/// # Examples
///
/// ```rust
/// use delimtext::{column_set, write_delimited, WriteOptions};
///
/// let table = column_set! { "label" => ["NA", "x"] };
/// let text = write_delimited(&table, "", &WriteOptions::default()).unwrap();
/// assert_eq!(text, "label\n\"NA\"\nx\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::DestinationUnavailable`] if `path` cannot be opened and
/// [`Error::Io`] if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_delimited(table: &TypedColumnSet, path: &str, options: &WriteOptions) -> Result<String> {
    if path.is_empty() {
        tracing::trace!("writing delimited text to memory");
        to_string(table, options)
    } else {
        tracing::trace!(path, append = options.append, "writing delimited text to file");
        to_path(table, path, options)?;
        Ok(String::new())
    }
}

/// Renders `table` as a delimited string.
///
/// # Errors
///
/// Returns [`Error::InvalidDialect`] for an unusable delimiter.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(table: &TypedColumnSet, options: &WriteOptions) -> Result<String> {
    writer::write_string(table, options)
}

/// Writes `table` to any [`io::Write`].
///
/// # Examples
///
/// ```rust
/// use delimtext::{column_set, to_writer, WriteOptions};
///
/// let table = column_set! { "n" => [1i64, 2] };
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &table, &WriteOptions::new().with_col_names(false)).unwrap();
/// assert_eq!(buffer, b"1\n2\n");
/// ```
///
/// # Errors
///
/// Returns an error if the dialect is invalid or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, table: &TypedColumnSet, options: &WriteOptions) -> Result<()>
where
    W: io::Write,
{
    writer::write_to(writer, table, options)?;
    Ok(())
}

/// Writes `table` to the file at `path`.
///
/// # Errors
///
/// Returns [`Error::DestinationUnavailable`] if `path` cannot be opened.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_path(table: &TypedColumnSet, path: impl AsRef<Path>, options: &WriteOptions) -> Result<()> {
    writer::write_path(path.as_ref(), table, options)
}

/// Reads the delimited file at `path` into columns typed by `schema`.
///
/// `row_hint` preallocates each column; more rows than hinted are still read.
///
/// # Errors
///
/// See [`FixedSchemaReader::read_buf`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_fixed_schema(
    path: impl AsRef<Path>,
    schema: &Schema,
    row_hint: usize,
) -> Result<TypedColumnSet> {
    FixedSchemaReader::new(schema.clone())
        .with_options(ReadOptions::new().with_row_hint(row_hint))
        .read_path(path)
}

/// Reads comma-separated text with the default dialect.
///
/// # Examples
///
/// ```rust
/// use delimtext::{from_str, Column, ColumnType, Schema};
///
/// let schema = Schema::new().field("ok", ColumnType::Boolean);
/// let table = from_str("ok\nT\nfalse\nNA\n", &schema).unwrap();
/// assert_eq!(table.column("ok"), Some(&Column::from(vec![Some(true), Some(false), None])));
/// ```
///
/// # Errors
///
/// See [`FixedSchemaReader::read_buf`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(input: &str, schema: &Schema) -> Result<TypedColumnSet> {
    FixedSchemaReader::new(schema.clone()).read_str(input)
}

/// Reads comma-separated text from any [`io::Read`] with the default dialect.
///
/// # Errors
///
/// See [`FixedSchemaReader::read_buf`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(reader: R, schema: &Schema) -> Result<TypedColumnSet>
where
    R: io::Read,
{
    FixedSchemaReader::new(schema.clone()).read_reader(reader)
}
