//! Quoting and escaping of encoded fields.
//!
//! A field is quoted when its text contains the delimiter, a double quote or
//! a line break, or when it equals the NA string. The NA rule is content
//! driven: a string that happens to read `NA` is quoted so that a reader can
//! tell it apart from a missing value, which is written bare.
//!
//! Quoting wraps the text in `"` and doubles every inner `"`. Delimiters and
//! line breaks inside a quoted field are written as they are.

/// Returns `true` if `raw` must be quoted under the given dialect.
///
/// # Examples
///
/// ```rust
/// use delimtext::needs_quoting;
///
/// assert!(needs_quoting("a,b", ',', "NA"));
/// assert!(needs_quoting("NA", ',', "NA"));
/// assert!(needs_quoting("line\nbreak", ',', "NA"));
/// assert!(!needs_quoting("plain", ',', "NA"));
/// assert!(!needs_quoting("a,b", '\t', "NA"));
/// ```
#[inline]
#[must_use]
pub fn needs_quoting(raw: &str, delimiter: char, na: &str) -> bool {
    raw == na || raw.contains(|c: char| matches!(c, '\n' | '\r' | '"') || c == delimiter)
}

/// Wraps `raw` in double quotes, doubling any inner quotes.
///
/// # Examples
///
/// ```rust
/// use delimtext::quote;
///
/// assert_eq!(quote("Bob, Jr."), "\"Bob, Jr.\"");
/// assert_eq!(quote("6\" ruler"), "\"6\"\" ruler\"");
/// ```
#[must_use]
pub fn quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    push_quoted(&mut out, raw);
    out
}

/// Reverses [`quote`].
///
/// Returns `None` if `quoted` is not wrapped in quotes or contains a lone
/// inner quote.
///
/// # Examples
///
/// ```rust
/// use delimtext::{quote, unquote};
///
/// let s = "he said \"hi\"";
/// assert_eq!(unquote(&quote(s)).as_deref(), Some(s));
/// assert_eq!(unquote("not quoted"), None);
/// ```
#[must_use]
pub fn unquote(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '"' && chars.next() != Some('"') {
            return None;
        }
        out.push(ch);
    }
    Some(out)
}

/// Appends `raw` to `out`, quoted if the dialect requires it.
#[inline]
pub fn write_field(out: &mut String, raw: &str, delimiter: char, na: &str) {
    if needs_quoting(raw, delimiter, na) {
        push_quoted(out, raw);
    } else {
        out.push_str(raw);
    }
}

fn push_quoted(out: &mut String, raw: &str) {
    out.push('"');
    for ch in raw.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_quoting_triggers() {
        assert!(needs_quoting("a\rb", ',', "NA"));
        assert!(needs_quoting("\"", ',', "NA"));
        assert!(needs_quoting("a|b", '|', "NA"));
        assert!(needs_quoting("", ',', ""));
        assert!(!needs_quoting("", ',', "NA"));
        assert!(!needs_quoting("na", ',', "NA"));
        assert!(!needs_quoting("NA ", ',', "NA"));
    }

    #[test]
    fn test_delimiter_and_newline_pass_through() {
        assert_eq!(quote("a,b\nc"), "\"a,b\nc\"");
    }

    #[test]
    fn test_write_field() {
        let mut out = String::new();
        write_field(&mut out, "plain", ',', "NA");
        out.push(',');
        write_field(&mut out, "NA", ',', "NA");
        out.push(',');
        write_field(&mut out, "x\"y", ',', "NA");
        assert_eq!(out, "plain,\"NA\",\"x\"\"y\"");
    }

    #[test]
    fn test_unquote_rejects_lone_quote() {
        assert_eq!(unquote("\"a\"b\""), None);
        assert_eq!(unquote("\""), None);
        assert_eq!(unquote("\"\""), Some(String::new()));
    }

    proptest! {
        #[test]
        fn prop_unquote_inverts_quote(s in ".*") {
            prop_assert_eq!(unquote(&quote(&s)), Some(s));
        }

        #[test]
        fn prop_needs_quoting_iff_rule(s in "[a-z,\"\n\r|NA ]{0,12}") {
            let expected = s == "NA"
                || s.contains(',')
                || s.contains('"')
                || s.contains('\n')
                || s.contains('\r');
            prop_assert_eq!(needs_quoting(&s, ',', "NA"), expected);
        }
    }
}
