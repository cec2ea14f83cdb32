//! Row-major writer for [`TypedColumnSet`] tables.
//!
//! Each row is assembled into a reusable line buffer and handed to the
//! underlying [`Write`](std::io::Write) in one call. Missing cells are written as the bare
//! NA string; any other field equal to the NA string is quoted.

use crate::encode::encode_into;
use crate::quote::write_field;
use crate::table::TypedColumnSet;
use crate::value::Cell;
use crate::{Error, Result, WriteOptions};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes delimited records to an [`io::Write`](std::io::Write) sink.
///
/// # Examples
///
/// ```rust
/// use delimtext::{Cell, TableWriter, WriteOptions};
///
/// let mut writer = TableWriter::new(Vec::new(), WriteOptions::new()).unwrap();
/// writer.write_names(["city", "pop"]).unwrap();
/// writer.write_row(&[Cell::from("Oslo, NO"), Cell::Integer(709_037)]).unwrap();
/// writer.write_row(&[Cell::from("NA"), Cell::Missing]).unwrap();
///
/// let bytes = writer.into_inner().unwrap();
/// assert_eq!(
///     String::from_utf8(bytes).unwrap(),
///     "city,pop\n\"Oslo, NO\",709037\n\"NA\",NA\n"
/// );
/// ```
pub struct TableWriter<W: Write> {
    writer: W,
    options: WriteOptions,
    line: String,
    rows_written: usize,
}

impl<W: Write> TableWriter<W> {
    /// Wraps `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDialect`] if the delimiter is `"` or a line break,
    /// or if the NA string contains the delimiter, a quote or a line break.
    pub fn new(writer: W, options: WriteOptions) -> Result<Self> {
        options.delimiter.validate_na(&options.na)?;
        Ok(TableWriter {
            writer,
            options,
            line: String::with_capacity(256),
            rows_written: 0,
        })
    }

    #[must_use]
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Number of data rows written so far, header excluded.
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn push_separator(&mut self, first: bool) {
        if !first {
            self.line.push(self.options.delimiter.as_char());
        }
    }

    fn flush_line(&mut self) -> Result<()> {
        self.line.push('\n');
        self.writer.write_all(self.line.as_bytes())?;
        self.line.clear();
        Ok(())
    }

    /// Writes a header line of column names, quoted as any other field.
    pub fn write_names<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let delimiter = self.options.delimiter.as_char();
        for (i, name) in names.into_iter().enumerate() {
            self.push_separator(i == 0);
            write_field(&mut self.line, name.as_ref(), delimiter, &self.options.na);
        }
        self.flush_line()
    }

    /// Writes the column names of `table`.
    pub fn write_header(&mut self, table: &TypedColumnSet) -> Result<()> {
        self.write_names(table.names())
    }

    /// Writes one record.
    pub fn write_row(&mut self, cells: &[Cell<'_>]) -> Result<()> {
        for (i, cell) in cells.iter().enumerate() {
            self.push_cell(i == 0, cell);
        }
        self.rows_written += 1;
        self.flush_line()
    }

    fn push_cell(&mut self, first: bool, cell: &Cell<'_>) {
        self.push_separator(first);
        let delimiter = self.options.delimiter.as_char();
        let na = self.options.na.as_str();
        match cell {
            Cell::Missing => self.line.push_str(na),
            // Only strings can contain quotes, delimiters or line breaks.
            Cell::String(s) => write_field(&mut self.line, s, delimiter, na),
            other => {
                let start = self.line.len();
                encode_into(&mut self.line, other, na);
                if self.line[start..] == *na {
                    let raw = self.line.split_off(start);
                    write_field(&mut self.line, &raw, delimiter, na);
                }
            }
        }
    }

    /// Writes `table`: the header when enabled, then every row.
    ///
    /// A table without columns produces no output at all.
    pub fn write_table(&mut self, table: &TypedColumnSet) -> Result<()> {
        if table.is_empty() {
            return Ok(());
        }
        if self.options.col_names {
            self.write_header(table)?;
        }
        let columns: Vec<_> = table.columns().map(|(_, column)| column).collect();
        for row in 0..table.row_count() {
            for (i, column) in columns.iter().enumerate() {
                let cell = column.get(row).unwrap_or_default();
                self.push_cell(i == 0, &cell);
            }
            self.rows_written += 1;
            self.flush_line()?;
        }
        tracing::trace!(
            rows = table.row_count(),
            columns = table.column_count(),
            "wrote table"
        );
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Writes `table` to `writer`.
pub(crate) fn write_to<W: Write>(
    writer: W,
    table: &TypedColumnSet,
    options: &WriteOptions,
) -> Result<W> {
    let mut writer = TableWriter::new(writer, options.clone())?;
    writer.write_table(table)?;
    writer.into_inner()
}

/// Writes `table` to the file at `path`, truncating or appending per `options`.
///
/// The file is not opened when the table has no columns.
pub(crate) fn write_path(path: &Path, table: &TypedColumnSet, options: &WriteOptions) -> Result<()> {
    if table.is_empty() {
        tracing::debug!(path = %path.display(), "table has no columns, nothing written");
        return Ok(());
    }
    options.delimiter.validate_na(&options.na)?;

    let mut open = OpenOptions::new();
    open.create(true);
    if options.append {
        open.append(true);
    } else {
        open.write(true).truncate(true);
    }
    let file = open.open(path).map_err(|e| {
        Error::destination_unavailable(&path.display().to_string(), &e.to_string())
    })?;

    write_to(BufWriter::new(file), table, options)?;
    tracing::debug!(
        path = %path.display(),
        rows = table.row_count(),
        append = options.append,
        "wrote delimited file"
    );
    Ok(())
}

/// Renders `table` in memory.
pub(crate) fn write_string(table: &TypedColumnSet, options: &WriteOptions) -> Result<String> {
    let bytes = write_to(Vec::new(), table, options)?;
    String::from_utf8(bytes).map_err(Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Column;
    use crate::Delimiter;

    fn sample() -> TypedColumnSet {
        let mut table = TypedColumnSet::new();
        table
            .push_column("id", Column::from(vec![Some(1i64), None]))
            .unwrap();
        table
            .push_column("ok", Column::from(vec![Some(true), Some(false)]))
            .unwrap();
        table
            .push_column("note", Column::from(vec![Some("a,b"), Some("NA")]))
            .unwrap();
        table
    }

    #[test]
    fn test_default_dialect() {
        assert_eq!(
            write_string(&sample(), &WriteOptions::new()).unwrap(),
            "id,ok,note\n1,TRUE,\"a,b\"\nNA,FALSE,\"NA\"\n"
        );
    }

    #[test]
    fn test_tab_dialect_without_header() {
        let options = WriteOptions::new()
            .with_delimiter(Delimiter::Tab)
            .with_col_names(false);
        assert_eq!(
            write_string(&sample(), &options).unwrap(),
            "1\tTRUE\ta,b\nNA\tFALSE\t\"NA\"\n"
        );
    }

    #[test]
    fn test_numeric_text_colliding_with_na_is_quoted() {
        let mut table = TypedColumnSet::new();
        table
            .push_column("n", Column::from(vec![Some(0i64), None]))
            .unwrap();
        let options = WriteOptions::new().with_na("0");
        assert_eq!(write_string(&table, &options).unwrap(), "n\n\"0\"\n0\n");
    }

    #[test]
    fn test_empty_table_writes_nothing() {
        assert_eq!(
            write_string(&TypedColumnSet::new(), &WriteOptions::new()).unwrap(),
            ""
        );
    }

    #[test]
    fn test_zero_rows_writes_header_only() {
        let mut table = TypedColumnSet::new();
        table
            .push_column("a", Column::from(Vec::<i64>::new()))
            .unwrap();
        table
            .push_column("b", Column::from(Vec::<f64>::new()))
            .unwrap();
        assert_eq!(
            write_string(&table, &WriteOptions::new()).unwrap(),
            "a,b\n"
        );
    }

    #[test]
    fn test_header_names_are_quoted() {
        let mut table = TypedColumnSet::new();
        table
            .push_column("fare, usd", Column::from(vec![1.5]))
            .unwrap();
        assert_eq!(
            write_string(&table, &WriteOptions::new()).unwrap(),
            "\"fare, usd\"\n1.5\n"
        );
    }

    #[test]
    fn test_invalid_delimiter() {
        let options = WriteOptions::new().with_delimiter('\n');
        assert!(matches!(
            TableWriter::new(Vec::new(), options),
            Err(Error::InvalidDialect(_))
        ));
    }

    #[test]
    fn test_na_containing_delimiter_rejected() {
        let options = WriteOptions::new().with_na("n,a");
        assert!(matches!(
            TableWriter::new(Vec::new(), options.clone()),
            Err(Error::InvalidDialect(_))
        ));
        assert!(matches!(
            write_string(&sample(), &options),
            Err(Error::InvalidDialect(_))
        ));

        let tab = options.with_delimiter(Delimiter::Tab);
        assert_eq!(
            write_string(&sample(), &tab).unwrap(),
            "id\tok\tnote\n1\tTRUE\ta,b\nn,a\tFALSE\tNA\n"
        );
    }

    #[test]
    fn test_na_with_quote_rejected_before_opening_file() {
        let options = WriteOptions::new().with_na("\"");
        let err = write_path(Path::new("/nonexistent-dir/out.csv"), &sample(), &options)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDialect(_)));
    }

    #[test]
    fn test_rows_written() {
        let mut writer = TableWriter::new(Vec::new(), WriteOptions::new()).unwrap();
        writer.write_table(&sample()).unwrap();
        assert_eq!(writer.rows_written(), 2);
    }
}
