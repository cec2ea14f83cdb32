//! Type-dispatched encoding of single cells.
//!
//! Encoding is pure and never quotes; quoting is decided afterwards by
//! [`crate::quote`]. The rules are locale independent:
//!
//! | Cell | Text |
//! |------|------|
//! | `Boolean(true)` / `Boolean(false)` | `TRUE` / `FALSE` |
//! | `Integer(n)` | decimal digits, `-` only when negative |
//! | `Double(NaN)` | `NaN` |
//! | `Double(+inf)` / `Double(-inf)` | `Inf` / `-Inf` |
//! | `Double(x)` | shortest text that parses back to exactly `x` |
//! | `String(s)` | `s` |
//! | `Missing` | the NA string |
//!
//! Finite doubles use Rust's shortest round-trip formatting, which never uses
//! exponent notation: `0.1` is `0.1`, `1e21` is `1000000000000000000000` and
//! `-0.0` is `-0`.

use crate::ser::CellSerializer;
use crate::value::Cell;
use crate::Result;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Write;

/// Encodes one cell as text, substituting `na` for missing values.
///
/// # Examples
///
/// ```rust
/// use delimtext::{encode, Cell};
///
/// assert_eq!(encode(&Cell::Boolean(true), "NA"), "TRUE");
/// assert_eq!(encode(&Cell::Integer(-42), "NA"), "-42");
/// assert_eq!(encode(&Cell::Double(f64::NEG_INFINITY), "NA"), "-Inf");
/// assert_eq!(encode(&Cell::Double(0.1), "NA"), "0.1");
/// assert_eq!(encode(&Cell::Missing, "∅"), "∅");
/// ```
#[must_use]
pub fn encode<'c>(cell: &'c Cell<'_>, na: &'c str) -> Cow<'c, str> {
    match cell {
        Cell::Boolean(true) => Cow::Borrowed("TRUE"),
        Cell::Boolean(false) => Cow::Borrowed("FALSE"),
        Cell::Integer(i) => Cow::Owned(i.to_string()),
        Cell::Double(d) => encode_double(*d),
        Cell::String(s) => Cow::Borrowed(&**s),
        Cell::Missing => Cow::Borrowed(na),
    }
}

/// Appends the encoding of `cell` to `out` without an intermediate allocation.
pub fn encode_into(out: &mut String, cell: &Cell<'_>, na: &str) {
    match cell {
        Cell::Integer(i) => {
            // Writing into a String cannot fail.
            let _ = write!(out, "{}", i);
        }
        Cell::Double(d) if d.is_finite() => {
            let _ = write!(out, "{}", d);
        }
        other => out.push_str(&encode(other, na)),
    }
}

fn encode_double(d: f64) -> Cow<'static, str> {
    if d.is_nan() {
        Cow::Borrowed("NaN")
    } else if d.is_infinite() {
        Cow::Borrowed(if d > 0.0 { "Inf" } else { "-Inf" })
    } else {
        Cow::Owned(d.to_string())
    }
}

/// Encodes any serializable scalar as cell text.
///
/// The value is first converted to a [`Cell`]: integers of any width become
/// `Integer` (unsigned values above `i64::MAX` fail), floats become `Double`,
/// `None` and `()` become `Missing`, chars and unit enum variants become `String`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`](crate::Error::UnsupportedType) for
/// values that are not scalars (sequences, maps, structs, bytes, data-carrying
/// enum variants).
///
/// # Examples
///
/// ```rust
/// use delimtext::encode_value;
///
/// assert_eq!(encode_value(&3u8, "NA").unwrap(), "3");
/// assert_eq!(encode_value(&Some(false), "NA").unwrap(), "FALSE");
/// assert_eq!(encode_value(&None::<f64>, "").unwrap(), "");
/// assert!(encode_value(&vec![1, 2], "NA").is_err());
/// ```
pub fn encode_value<T>(value: &T, na: &str) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let cell = value.serialize(CellSerializer)?;
    Ok(encode(&cell, na).into_owned())
}
