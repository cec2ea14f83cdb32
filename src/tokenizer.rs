//! Tokenizer specifications and the tokenizers they build.
//!
//! A [`TokenizerSpec`] is plain configuration: a variant tag, a delimiter and
//! an NA string. [`Tokenizer::from_spec`] (also exported as
//! [`make_tokenizer`](crate::make_tokenizer)) parses the tag into a
//! [`TokenizerKind`] and builds the matching [`Tokenizer`] variant. Unknown
//! tags fail at construction with [`Error::UnsupportedSpecification`].
//!
//! ## Adding a variant
//!
//! Add an arm to [`TokenizerKind`], an arm to [`Tokenizer`] holding the new
//! concrete tokenizer, and one branch in [`Tokenizer::from_spec`]. Every other
//! `match` on the enums is exhaustive, so the compiler lists what else needs
//! to learn about the new variant.
//!
//! ## Reading records
//!
//! Tokenizers are cursors over a [`BufRead`] source. Each call to
//! [`Tokenizer::next_record`] fills a caller-owned [`Record`], whose buffers
//! are reused from one record to the next.
//!
//! ```rust
//! use delimtext::{make_tokenizer, Record, Token, TokenizerSpec};
//!
//! let mut tokenizer = make_tokenizer(&TokenizerSpec::default()).unwrap();
//! let mut source = "1,\"Bob, Jr.\",NA,\n".as_bytes();
//! let mut record = Record::new();
//!
//! assert!(tokenizer.next_record(&mut source, &mut record).unwrap());
//! let tokens: Vec<Token> = record.tokens().collect();
//! assert_eq!(
//!     tokens,
//!     vec![Token::Text("1"), Token::Text("Bob, Jr."), Token::Missing, Token::Empty]
//! );
//! assert!(!tokenizer.next_record(&mut source, &mut record).unwrap());
//! ```

use crate::options::Delimiter;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

const BOM: char = '\u{feff}';

/// Known tokenizer variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenizerKind {
    /// Fields separated by a single character, with `"` quoting.
    Delimited,
}

impl TokenizerKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenizerKind::Delimited => "delimited",
        }
    }
}

impl FromStr for TokenizerKind {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "delimited" | "tokenizer_delimited" => Ok(TokenizerKind::Delimited),
            other => Err(Error::unsupported_specification(other)),
        }
    }
}

impl fmt::Display for TokenizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for building a [`Tokenizer`].
///
/// The variant is kept as text so that specifications can come from
/// configuration files; it is only interpreted by [`Tokenizer::from_spec`].
///
/// # Examples
///
/// ```rust
/// use delimtext::TokenizerSpec;
///
/// let spec: TokenizerSpec =
///     serde_json::from_str(r#"{"variant": "delimited", "delimiter": "\t", "na": ""}"#).unwrap();
/// assert_eq!(spec, TokenizerSpec::delimited('\t', ""));
///
/// // Omitted keys take their defaults
/// let spec: TokenizerSpec = serde_json::from_str("{}").unwrap();
/// assert_eq!(spec, TokenizerSpec::default());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerSpec {
    pub variant: String,
    #[serde(alias = "delim")]
    pub delimiter: char,
    #[serde(alias = "na_string")]
    pub na: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Default for TokenizerSpec {
    fn default() -> Self {
        TokenizerSpec {
            variant: TokenizerKind::Delimited.as_str().to_string(),
            delimiter: ',',
            na: "NA".to_string(),
            comment: None,
        }
    }
}

impl TokenizerSpec {
    pub fn new(variant: impl Into<String>, delimiter: char, na: impl Into<String>) -> Self {
        TokenizerSpec {
            variant: variant.into(),
            delimiter,
            na: na.into(),
            comment: None,
        }
    }

    /// Shorthand for a `delimited` specification.
    pub fn delimited(delimiter: char, na: impl Into<String>) -> Self {
        Self::new(TokenizerKind::Delimited.as_str(), delimiter, na)
    }

    /// Skips records whose first line starts with `prefix`.
    #[must_use]
    pub fn with_comment(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.comment = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }
}

/// One field of a [`Record`], classified against the NA string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Field text with quotes removed and doubled quotes collapsed.
    Text(&'a str),
    /// An unquoted field with no characters.
    Empty,
    /// An unquoted field equal to the NA string.
    Missing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldKind {
    Text,
    Empty,
    Missing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FieldSlot {
    end: usize,
    kind: FieldKind,
    quoted: bool,
}

/// A reusable buffer holding the fields of one record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    buffer: String,
    fields: Vec<FieldSlot>,
    line: usize,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.fields.clear();
        self.line = 0;
    }

    fn field_start(&self) -> usize {
        self.fields.last().map_or(0, |slot| slot.end)
    }

    fn finish_field(&mut self, quoted: bool, na: &str) {
        let start = self.field_start();
        let text = &self.buffer[start..];
        let kind = if quoted {
            FieldKind::Text
        } else if text == na {
            FieldKind::Missing
        } else if text.is_empty() {
            FieldKind::Empty
        } else {
            FieldKind::Text
        };
        self.fields.push(FieldSlot {
            end: self.buffer.len(),
            kind,
            quoted,
        });
    }

    /// Number of fields in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Physical line (1-based) on which the record starts.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns `true` for a record read from an empty line.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(
            self.fields.as_slice(),
            [FieldSlot { end: 0, quoted: false, .. }]
        )
    }

    /// Returns the classified field at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Token<'_>> {
        let slot = self.fields.get(index)?;
        Some(match slot.kind {
            FieldKind::Text => Token::Text(self.text_at(index)?),
            FieldKind::Empty => Token::Empty,
            FieldKind::Missing => Token::Missing,
        })
    }

    /// Returns the field text at `index` regardless of its classification.
    #[must_use]
    pub fn text_at(&self, index: usize) -> Option<&str> {
        let slot = self.fields.get(index)?;
        let start = if index == 0 {
            0
        } else {
            self.fields[index - 1].end
        };
        self.buffer.get(start..slot.end)
    }

    pub fn tokens(&self) -> impl Iterator<Item = Token<'_>> + '_ {
        (0..self.fields.len()).filter_map(move |i| self.get(i))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
    AfterQuoted,
}

/// Tokenizer for character-delimited text with `"` quoting.
#[derive(Clone, Debug)]
pub struct DelimitedTokenizer {
    delimiter: char,
    na: String,
    comment: Option<String>,
    line: usize,
    line_buf: String,
}

impl DelimitedTokenizer {
    /// Creates a tokenizer for `delimiter` and `na`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDialect`] if the delimiter is `"` or a line break,
    /// or if `na` contains the delimiter, a quote or a line break.
    pub fn new(delimiter: char, na: impl Into<String>) -> Result<Self> {
        let na = na.into();
        Delimiter::from(delimiter).validate_na(&na)?;
        Ok(DelimitedTokenizer {
            delimiter,
            na,
            comment: None,
            line: 0,
            line_buf: String::with_capacity(256),
        })
    }

    #[must_use]
    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment.filter(|c| !c.is_empty());
        self
    }

    #[must_use]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    #[must_use]
    pub fn na(&self) -> &str {
        &self.na
    }

    /// Number of physical lines consumed so far.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    fn fill_line<R: BufRead>(&mut self, source: &mut R) -> Result<bool> {
        self.line_buf.clear();
        if source.read_line(&mut self.line_buf)? == 0 {
            return Ok(false);
        }
        self.line += 1;
        if self.line == 1 && self.line_buf.starts_with(BOM) {
            self.line_buf.replace_range(..BOM.len_utf8(), "");
        }
        Ok(true)
    }

    /// Discards up to `n` physical lines, returning how many were skipped.
    pub fn skip_lines<R: BufRead>(&mut self, source: &mut R, n: usize) -> Result<usize> {
        let mut skipped = 0;
        while skipped < n && self.fill_line(source)? {
            skipped += 1;
        }
        Ok(skipped)
    }

    fn is_comment(&self) -> bool {
        self.comment
            .as_deref()
            .is_some_and(|prefix| self.line_buf.starts_with(prefix))
    }

    /// Reads the next record into `record`.
    ///
    /// Returns `Ok(false)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] if the input ends inside a quoted
    /// field and [`Error::Io`] if the source fails or is not UTF-8.
    pub fn next_record<R: BufRead>(&mut self, source: &mut R, record: &mut Record) -> Result<bool> {
        record.clear();
        loop {
            if !self.fill_line(source)? {
                return Ok(false);
            }
            if !self.is_comment() {
                break;
            }
        }
        record.line = self.line;

        let mut state = ScanState::FieldStart;
        let mut quoted = false;
        loop {
            let (content, terminator) = split_terminator(&self.line_buf);
            for ch in content.chars() {
                state = match state {
                    ScanState::FieldStart if ch == '"' => {
                        quoted = true;
                        ScanState::Quoted
                    }
                    ScanState::FieldStart | ScanState::Unquoted | ScanState::AfterQuoted
                        if ch == self.delimiter =>
                    {
                        record.finish_field(quoted, &self.na);
                        quoted = false;
                        ScanState::FieldStart
                    }
                    ScanState::FieldStart | ScanState::Unquoted => {
                        record.buffer.push(ch);
                        ScanState::Unquoted
                    }
                    ScanState::Quoted if ch == '"' => ScanState::QuoteInQuoted,
                    ScanState::Quoted => {
                        record.buffer.push(ch);
                        ScanState::Quoted
                    }
                    ScanState::QuoteInQuoted if ch == '"' => {
                        record.buffer.push('"');
                        ScanState::Quoted
                    }
                    ScanState::QuoteInQuoted if ch == self.delimiter => {
                        record.finish_field(quoted, &self.na);
                        quoted = false;
                        ScanState::FieldStart
                    }
                    // Text after a closing quote is kept as part of the field.
                    ScanState::QuoteInQuoted | ScanState::AfterQuoted => {
                        record.buffer.push(ch);
                        ScanState::AfterQuoted
                    }
                };
            }

            if state != ScanState::Quoted {
                record.finish_field(quoted, &self.na);
                return Ok(true);
            }

            // The line break belongs to the quoted field.
            record.buffer.push_str(terminator);
            if terminator.is_empty() || !self.fill_line(source)? {
                return Err(Error::malformed_record(
                    record.line,
                    "unterminated quoted field at end of input",
                ));
            }
        }
    }
}

/// Splits a line into its content and its `\n` / `\r\n` terminator.
fn split_terminator(line: &str) -> (&str, &str) {
    let content = line.strip_suffix('\n').unwrap_or(line);
    let content = content.strip_suffix('\r').unwrap_or(content);
    line.split_at(content.len())
}

/// A tokenizer built from a [`TokenizerSpec`].
#[derive(Clone, Debug)]
pub enum Tokenizer {
    Delimited(DelimitedTokenizer),
}

impl Tokenizer {
    /// Builds the tokenizer described by `spec`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedSpecification`] if the variant tag is unknown
    /// - [`Error::InvalidDialect`] if the delimiter is `"` or a line break
    pub fn from_spec(spec: &TokenizerSpec) -> Result<Self> {
        let kind: TokenizerKind = spec.variant.parse()?;
        let tokenizer = match kind {
            TokenizerKind::Delimited => Tokenizer::Delimited(
                DelimitedTokenizer::new(spec.delimiter, spec.na.clone())?
                    .with_comment(spec.comment.clone()),
            ),
        };
        tracing::trace!(variant = %kind, delimiter = ?spec.delimiter, na = %spec.na, "built tokenizer");
        Ok(tokenizer)
    }

    #[must_use]
    pub fn kind(&self) -> TokenizerKind {
        match self {
            Tokenizer::Delimited(_) => TokenizerKind::Delimited,
        }
    }

    #[must_use]
    pub fn na(&self) -> &str {
        match self {
            Tokenizer::Delimited(t) => t.na(),
        }
    }

    /// Number of physical lines consumed so far.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Tokenizer::Delimited(t) => t.line(),
        }
    }

    /// Discards up to `n` physical lines before tokenizing.
    pub fn skip_lines<R: BufRead>(&mut self, source: &mut R, n: usize) -> Result<usize> {
        match self {
            Tokenizer::Delimited(t) => t.skip_lines(source, n),
        }
    }

    /// Reads the next record into `record`, returning `Ok(false)` at end of input.
    pub fn next_record<R: BufRead>(&mut self, source: &mut R, record: &mut Record) -> Result<bool> {
        match self {
            Tokenizer::Delimited(t) => t.next_record(source, record),
        }
    }

    /// Reads every remaining record.
    pub fn read_all<R: BufRead>(&mut self, mut source: R) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut record = Record::new();
        while self.next_record(&mut source, &mut record)? {
            records.push(record.clone());
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tokens(input: &str, expected: &[&[Token<'_>]]) {
        let mut tokenizer = Tokenizer::from_spec(&TokenizerSpec::default()).unwrap();
        let records = tokenizer.read_all(input.as_bytes()).unwrap();
        let actual: Vec<Vec<Token<'_>>> = records.iter().map(|r| r.tokens().collect()).collect();
        assert_eq!(actual, expected, "input was {:?}", input);
    }

    #[test]
    fn test_unknown_variant() {
        let spec = TokenizerSpec::new("fixed_width", ',', "NA");
        let err = Tokenizer::from_spec(&spec).unwrap_err();
        assert_eq!(err, Error::UnsupportedSpecification("fixed_width".to_string()));
    }

    #[test]
    fn test_legacy_tag_accepted() {
        let spec = TokenizerSpec::new("tokenizer_delimited", ';', "");
        let tokenizer = Tokenizer::from_spec(&spec).unwrap();
        assert_eq!(tokenizer.kind(), TokenizerKind::Delimited);
        assert_eq!(tokenizer.na(), "");
    }

    #[test]
    fn test_invalid_delimiter() {
        let spec = TokenizerSpec::delimited('"', "NA");
        assert!(matches!(
            Tokenizer::from_spec(&spec),
            Err(Error::InvalidDialect(_))
        ));
    }

    #[test]
    fn test_na_colliding_with_dialect() {
        for na in ["n;a", "\"NA\"", "N\nA"] {
            let spec = TokenizerSpec::delimited(';', na);
            assert!(matches!(
                Tokenizer::from_spec(&spec),
                Err(Error::InvalidDialect(_))
            ));
        }
        assert!(Tokenizer::from_spec(&TokenizerSpec::delimited(';', "n,a")).is_ok());
    }

    #[test]
    fn test_quoted_na_is_text() {
        assert_tokens(
            "NA,\"NA\"\n",
            &[&[Token::Missing, Token::Text("NA")]],
        );
    }

    #[test]
    fn test_quoted_empty_is_text() {
        assert_tokens(
            "\"\",\n",
            &[&[Token::Text(""), Token::Empty]],
        );
    }

    #[test]
    fn test_doubled_quotes() {
        assert_tokens(
            "\"say \"\"hi\"\"\"\n",
            &[&[Token::Text("say \"hi\"")]],
        );
    }

    #[test]
    fn test_multiline_quoted_field() {
        let mut tokenizer = Tokenizer::from_spec(&TokenizerSpec::default()).unwrap();
        let records = tokenizer
            .read_all("a,\"line one\nline two\"\nb,c\n".as_bytes())
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(1), Some(Token::Text("line one\nline two")));
        assert_eq!(records[0].line(), 1);
        assert_eq!(records[1].line(), 3);
        assert_eq!(tokenizer.line(), 3);
    }

    #[test]
    fn test_crlf_terminators() {
        assert_tokens(
            "a,b\r\n\"c\r\nd\",e\r\n",
            &[
                &[Token::Text("a"), Token::Text("b")],
                &[Token::Text("c\r\nd"), Token::Text("e")],
            ],
        );
    }

    #[test]
    fn test_last_line_without_newline() {
        assert_tokens(
            "a,b",
            &[&[Token::Text("a"), Token::Text("b")]],
        );
    }

    #[test]
    fn test_unterminated_quote() {
        let mut tokenizer = Tokenizer::from_spec(&TokenizerSpec::default()).unwrap();
        let err = tokenizer.read_all("x\n\"open,\nstill open\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_text_after_closing_quote_is_kept() {
        assert_tokens(
            "\"ab\"cd,e\n",
            &[&[Token::Text("abcd"), Token::Text("e")]],
        );
    }

    #[test]
    fn test_blank_line() {
        let mut tokenizer = Tokenizer::from_spec(&TokenizerSpec::default()).unwrap();
        let records = tokenizer.read_all("\n\"\"\n".as_bytes()).unwrap();
        assert!(records[0].is_blank());
        assert!(!records[1].is_blank());
    }

    #[test]
    fn test_comment_and_bom() {
        let spec = TokenizerSpec::delimited('\t', "").with_comment("#");
        let mut tokenizer = Tokenizer::from_spec(&spec).unwrap();
        let records = tokenizer
            .read_all("\u{feff}x\ty\n# note\n1\t\n".as_bytes())
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(0), Some(Token::Text("x")));
        assert_eq!(records[1].get(1), Some(Token::Missing));
    }

    #[test]
    fn test_skip_lines() {
        let mut tokenizer = Tokenizer::from_spec(&TokenizerSpec::default()).unwrap();
        let mut source = "junk\nmore junk\na,b\n".as_bytes();
        assert_eq!(tokenizer.skip_lines(&mut source, 2).unwrap(), 2);
        let mut record = Record::new();
        assert!(tokenizer.next_record(&mut source, &mut record).unwrap());
        assert_eq!(record.line(), 3);
        assert_eq!(record.get(0), Some(Token::Text("a")));
    }
}
