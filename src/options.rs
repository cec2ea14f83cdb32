//! Configuration options for delimited reading and writing.
//!
//! This module provides the types that describe a dialect and the knobs of
//! each operation:
//!
//! - [`Delimiter`]: the single field-separator character
//! - [`WriteOptions`]: delimiter, NA string, header and append flags for writers
//! - [`ReadOptions`]: delimiter, NA string, row hint and line skipping for readers
//!
//! ## Examples
//!
//! ```rust
//! use delimtext::{column_set, to_string, Delimiter, WriteOptions};
//!
//! let table = column_set! { "x" => [1i64, 2], "y" => ["a", "b"] };
//!
//! // Tab separated, no header
//! let options = WriteOptions::new()
//!     .with_delimiter(Delimiter::Tab)
//!     .with_col_names(false);
//! assert_eq!(to_string(&table, &options).unwrap(), "1\ta\n2\tb\n");
//! ```

use crate::tokenizer::TokenizerSpec;
use crate::{Error, Result};

/// Field separator for delimited text.
///
/// The common separators have named variants; any other single character can
/// be used through [`Delimiter::Other`]. The quote character and line breaks
/// are rejected by [`Delimiter::validate`].
///
/// # Examples
///
/// ```rust
/// use delimtext::Delimiter;
///
/// assert_eq!(Delimiter::Comma.as_char(), ',');
/// assert_eq!(Delimiter::Tab.as_char(), '\t');
/// assert_eq!(Delimiter::from(';'), Delimiter::Semicolon);
/// assert_eq!(Delimiter::from('#'), Delimiter::Other('#'));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
    Other(char),
}

impl Delimiter {
    /// Returns the character this delimiter stands for.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
            Delimiter::Semicolon => ';',
            Delimiter::Other(c) => *c,
        }
    }

    /// Checks the delimiter against the dialect invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDialect`] if the delimiter is `"`, `\n` or `\r`.
    pub fn validate(&self) -> Result<()> {
        match self.as_char() {
            '"' => Err(Error::invalid_dialect(
                "delimiter cannot be the quote character '\"'",
            )),
            '\n' | '\r' => Err(Error::invalid_dialect(
                "delimiter cannot be a line break character",
            )),
            _ => Ok(()),
        }
    }

    /// Checks the delimiter together with the NA string it will be paired with.
    ///
    /// Missing cells are written as the bare NA string, so it must survive
    /// tokenization unquoted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDialect`] if the delimiter is invalid or `na`
    /// contains the delimiter, `"`, `\n` or `\r`.
    pub fn validate_na(&self, na: &str) -> Result<()> {
        self.validate()?;
        let delimiter = self.as_char();
        if na.contains(delimiter) {
            return Err(Error::invalid_dialect(&format!(
                "NA string '{}' contains the delimiter {:?}",
                na, delimiter
            )));
        }
        if na.contains(['"', '\n', '\r']) {
            return Err(Error::invalid_dialect(&format!(
                "NA string {:?} cannot contain a quote or line break",
                na
            )));
        }
        Ok(())
    }
}

impl From<char> for Delimiter {
    fn from(c: char) -> Self {
        match c {
            ',' => Delimiter::Comma,
            '\t' => Delimiter::Tab,
            '|' => Delimiter::Pipe,
            ';' => Delimiter::Semicolon,
            other => Delimiter::Other(other),
        }
    }
}

/// Options for writing a [`TypedColumnSet`](crate::TypedColumnSet) as delimited text.
///
/// # Examples
///
/// ```rust
/// use delimtext::{WriteOptions, Delimiter};
///
/// let options = WriteOptions::new();
/// assert_eq!(options.delimiter, Delimiter::Comma);
/// assert_eq!(options.na, "NA");
/// assert!(options.col_names);
/// assert!(!options.append);
///
/// let options = WriteOptions::new()
///     .with_delimiter(Delimiter::Pipe)
///     .with_na("")
///     .with_append(true);
/// ```
#[derive(Clone, Debug)]
pub struct WriteOptions {
    pub delimiter: Delimiter,
    pub na: String,
    pub col_names: bool,
    pub append: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            delimiter: Delimiter::default(),
            na: "NA".to_string(),
            col_names: true,
            append: false,
        }
    }
}

impl WriteOptions {
    /// Creates default options (comma delimiter, `NA`, header on, truncate).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<Delimiter>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Sets the text written for missing values.
    #[must_use]
    pub fn with_na(mut self, na: impl Into<String>) -> Self {
        self.na = na.into();
        self
    }

    /// Controls whether a header line of column names is emitted.
    #[must_use]
    pub fn with_col_names(mut self, col_names: bool) -> Self {
        self.col_names = col_names;
        self
    }

    /// Appends to an existing file instead of truncating it.
    ///
    /// Has no effect on in-memory output.
    #[must_use]
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }
}

/// Options for the fixed-schema reader.
///
/// `row_hint` is a capacity hint: columns are preallocated to it and grow if
/// the source holds more rows.
///
/// # Examples
///
/// ```rust
/// use delimtext::{ReadOptions, Delimiter};
///
/// let options = ReadOptions::new()
///     .with_delimiter(Delimiter::Tab)
///     .with_row_hint(10_000)
///     .with_comment("#");
/// assert_eq!(options.row_hint, 10_000);
/// assert_eq!(options.comment.as_deref(), Some("#"));
/// ```
#[derive(Clone, Debug)]
pub struct ReadOptions {
    pub delimiter: Delimiter,
    pub na: String,
    pub row_hint: usize,
    pub skip: usize,
    pub comment: Option<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            delimiter: Delimiter::default(),
            na: "NA".to_string(),
            row_hint: 0,
            skip: 0,
            comment: None,
        }
    }
}

impl ReadOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<Delimiter>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Sets the text that marks an unquoted field as missing.
    #[must_use]
    pub fn with_na(mut self, na: impl Into<String>) -> Self {
        self.na = na.into();
        self
    }

    /// Sets the number of rows to preallocate per column.
    #[must_use]
    pub fn with_row_hint(mut self, row_hint: usize) -> Self {
        self.row_hint = row_hint;
        self
    }

    /// Skips this many physical lines before the header.
    #[must_use]
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Ignores records whose first line starts with `prefix`.
    #[must_use]
    pub fn with_comment(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.comment = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    /// Builds the `Delimited` tokenizer specification these options describe.
    #[must_use]
    pub fn tokenizer_spec(&self) -> TokenizerSpec {
        let spec = TokenizerSpec::delimited(self.delimiter.as_char(), self.na.clone());
        match &self.comment {
            Some(prefix) => spec.with_comment(prefix.clone()),
            None => spec,
        }
    }
}
