//! Delimited Text Dialect
//!
//! This module documents the text format read and written by this library.
//!
//! # Overview
//!
//! A file is a sequence of records separated by `\n`. Each record is a sequence
//! of fields separated by one delimiter character. The first record is the
//! header of column names unless the writer was told to omit it.
//!
//! ```text
//! medallion,fare,tip,note
//! A1,12.5,2,"airport, terminal 4"
//! B7,7,NA,"NA"
//! ```
//!
//! # Dialect Parameters
//!
//! | Parameter | Default | Notes |
//! |-----------|---------|-------|
//! | Delimiter | `,` | any single character except `"`, `\n`, `\r` |
//! | NA string | `NA` | text standing for a missing value; may not contain the delimiter, `"`, `\n`, `\r` |
//! | Header | on | writer only; the reader always expects one |
//! | Quote | `"` | fixed |
//! | Record terminator | `\n` | the reader also accepts `\r\n` |
//!
//! # Values
//!
//! | Column type | Written as | Read from |
//! |-------------|------------|-----------|
//! | boolean | `TRUE`, `FALSE` | `TRUE` `True` `true` `T` `t` `1`, `FALSE` `False` `false` `F` `f` `0` |
//! | integer | decimal digits, leading `-` when negative | same, optional `+` |
//! | double | shortest round-trip decimal, `NaN`, `Inf`, `-Inf` | any decimal or exponent form, `NaN`, `Inf`, `+Inf`, `-Inf` |
//! | string | the text itself | the text itself |
//!
//! Doubles never use exponent notation when written: `1e21` is written as
//! `1000000000000000000000` and `-0.0` as `-0`.
//!
//! # Quoting
//!
//! A field is wrapped in `"` when its text
//!
//! - contains the delimiter,
//! - contains `"`, `\n` or `\r`,
//! - or equals the NA string.
//!
//! Inside a quoted field every `"` is doubled. Delimiters and line breaks are
//! written verbatim, so one record may span several physical lines.
//!
//! # Missing Values
//!
//! A missing cell is written as the bare NA string. Because any present value
//! whose text equals the NA string is quoted, the two never collide:
//!
//! ```text
//! name
//! NA      <- missing
//! "NA"    <- the two-letter string
//! ```
//!
//! On reading, an unquoted field equal to the NA string is missing in every
//! column type. An empty unquoted field is missing in boolean, integer and
//! double columns and the empty string in string columns. A quoted empty field
//! `""` is always the empty string.
//!
//! # Reading Rules
//!
//! - A UTF-8 byte order mark before the header is ignored.
//! - Declared columns are found by header name and may appear in any order;
//!   undeclared columns are skipped.
//! - Records too short to reach the last declared column are rejected; extra
//!   trailing fields are ignored.
//! - Empty lines are skipped, except when the header has a single column: there
//!   an empty line is a record holding one empty field.
//! - Text following a closing quote is kept as part of the field: `"ab"cd` reads
//!   as `abcd`.
//! - Input that ends inside a quoted field is an error.
//!
//! # Empty Tables
//!
//! A table with no columns produces no output, not even a header line. A table
//! with columns but no rows produces only the header.
//!
//! # Limitations
//!
//! - **Quote character**: Always `"`; there is no escape character other than doubling
//! - **Headerless input**: The reader needs a header to locate declared columns
//! - **Encoding**: Input and output are UTF-8

// This module contains only documentation; no implementation code
