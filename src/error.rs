//! Error types for delimited reading and writing.
//!
//! Every fallible operation in the crate returns [`Result<T>`], an alias over the
//! single [`Error`] enum defined here. Errors are raised synchronously at the
//! point of failure and carry enough context (row, column, raw text, path) to
//! diagnose the input without re-reading it.
//!
//! ## Error Categories
//!
//! - **Specification errors**: unknown tokenizer variant, invalid dialect
//! - **Encoding errors**: a value whose shape has no single-cell representation
//! - **Destination errors**: the output path could not be opened
//! - **Schema errors**: declared columns absent from the source header
//! - **Field errors**: a raw field that does not coerce to its declared type
//!
//! ## Examples
//!
//! ```rust
//! use delimtext::{make_tokenizer, Error, TokenizerSpec};
//!
//! let spec = TokenizerSpec::new("fixed_width", ',', "NA");
//! match make_tokenizer(&spec) {
//!     Err(Error::UnsupportedSpecification(tag)) => assert_eq!(tag, "fixed_width"),
//!     other => panic!("unexpected: {:?}", other.map(|_| ())),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while encoding, writing or reading delimited text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The tokenizer factory was handed a variant tag it does not know.
    #[error("Unsupported tokenizer specification: unknown variant '{0}'")]
    UnsupportedSpecification(String),

    /// A value has no single-cell textual representation.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// The output path could not be opened for writing.
    #[error("Failed to open '{path}': {reason}")]
    DestinationUnavailable { path: String, reason: String },

    /// Declared columns are absent from the source header.
    #[error("Schema mismatch: source header is missing column(s) {}", format_names(.missing))]
    SchemaMismatch { missing: Vec<String> },

    /// A raw field could not be coerced to its declared column type.
    #[error("Parse error at row {row}, column '{column}': expected {expected}, found '{text}'")]
    FieldParseError {
        row: usize,
        column: String,
        text: String,
        expected: String,
    },

    /// The delimiter or NA string collides with the quote or record separator characters.
    #[error("Invalid dialect: {0}")]
    InvalidDialect(String),

    /// A schema or table column name is unusable (duplicate or empty).
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A column was added whose length differs from the table's row count.
    #[error("Column '{column}' has {found} rows, expected {expected}")]
    RowCountMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// A column name was added twice to the same table.
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// A cell was pushed into a column of a different type.
    #[error("Type mismatch in column '{column}': expected {expected}, found {found}")]
    ColumnTypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    /// A record holds fewer fields than the schema needs.
    #[error("Row {row} has {found} field(s), expected at least {expected}")]
    FieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The source text violates the dialect (e.g. an unterminated quote).
    #[error("Malformed record at line {line}: {msg}")]
    MalformedRecord { line: usize, msg: String },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

fn format_names(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Creates an unsupported-specification error naming the offending variant tag.
    pub fn unsupported_specification(tag: &str) -> Self {
        Error::UnsupportedSpecification(tag.to_string())
    }

    /// Creates an unsupported type error for values that cannot be encoded as one cell.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use delimtext::Error;
    ///
    /// let err = Error::unsupported_type("sequence");
    /// assert!(err.to_string().contains("sequence"));
    /// ```
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a destination error for a path that could not be opened.
    pub fn destination_unavailable(path: &str, reason: &str) -> Self {
        Error::DestinationUnavailable {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a field parse error.
    ///
    /// `row` is the 1-based data row number, header excluded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use delimtext::Error;
    ///
    /// let err = Error::field_parse(3, "price", "abc", "a double");
    /// assert!(err.to_string().contains("row 3"));
    /// assert!(err.to_string().contains("'abc'"));
    /// ```
    pub fn field_parse(row: usize, column: &str, text: &str, expected: &str) -> Self {
        Error::FieldParseError {
            row,
            column: column.to_string(),
            text: text.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Creates an invalid dialect error for a delimiter or NA string that cannot be used.
    pub fn invalid_dialect(msg: &str) -> Self {
        Error::InvalidDialect(msg.to_string())
    }

    /// Creates an invalid schema error, e.g. for an empty or repeated column name.
    pub fn invalid_schema(msg: &str) -> Self {
        Error::InvalidSchema(msg.to_string())
    }

    /// Creates a malformed record error.
    ///
    /// `line` is the 1-based source line on which the offending record starts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use delimtext::Error;
    ///
    /// let err = Error::malformed_record(7, "unterminated quoted field at end of input");
    /// assert!(err.to_string().contains("line 7"));
    /// ```
    pub fn malformed_record(line: usize, msg: &str) -> Self {
        Error::MalformedRecord {
            line,
            msg: msg.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
