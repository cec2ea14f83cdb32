//! Property-based tests for the write/read round trip.
//!
//! Any table built from generated columns must read back equal to itself
//! under the dialect it was written with, including strings that contain the
//! delimiter, quotes, line breaks or the NA string itself.

use delimtext::{
    encode, needs_quoting, to_string, Cell, Column, Delimiter, FixedSchemaReader, ReadOptions,
    TypedColumnSet, WriteOptions,
};
use proptest::prelude::*;

fn roundtrip(table: &TypedColumnSet, delimiter: Delimiter, na: &str) -> bool {
    let write = WriteOptions::new().with_delimiter(delimiter).with_na(na);
    let read = ReadOptions::new()
        .with_delimiter(delimiter)
        .with_na(na)
        .with_row_hint(table.row_count());
    match to_string(table, &write) {
        Ok(text) => match FixedSchemaReader::new(table.schema())
            .with_options(read)
            .read_str(&text)
        {
            Ok(back) => *table == back,
            Err(e) => {
                eprintln!("Read failed: {}", e);
                eprintln!("Text was: {:?}", text);
                false
            }
        },
        Err(e) => {
            eprintln!("Write failed: {}", e);
            false
        }
    }
}

fn field_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ,;|\t\"\n\r]{0,10}",
        Just("NA".to_string()),
        Just(String::new()),
        any::<String>(),
    ]
}

fn delimiter() -> impl Strategy<Value = Delimiter> {
    prop_oneof![
        Just(Delimiter::Comma),
        Just(Delimiter::Tab),
        Just(Delimiter::Pipe),
        Just(Delimiter::Semicolon),
    ]
}

fn finite_or_special() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<f64>().prop_filter("NaN never equals itself", |d| !d.is_nan()),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(-0.0),
    ]
}

proptest! {
    #[test]
    fn prop_integer_column(values in prop::collection::vec(proptest::option::of(any::<i64>()), 0..30)) {
        let mut table = TypedColumnSet::new();
        table.push_column("n", Column::from(values)).unwrap();
        prop_assert!(roundtrip(&table, Delimiter::Comma, "NA"));
    }

    #[test]
    fn prop_double_column(values in prop::collection::vec(proptest::option::of(finite_or_special()), 0..30)) {
        let mut table = TypedColumnSet::new();
        table.push_column("x", Column::from(values)).unwrap();
        prop_assert!(roundtrip(&table, Delimiter::Comma, "NA"));
    }

    #[test]
    fn prop_two_column_table(
        rows in prop::collection::vec(
            (proptest::option::of(field_text()), proptest::option::of(any::<bool>())),
            0..20,
        ),
        delimiter in delimiter(),
        na in prop_oneof![Just("NA".to_string()), Just(String::new()), Just("∅".to_string())],
    ) {
        let (text, flags): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        let mut table = TypedColumnSet::new();
        table.push_column("text", Column::from(text)).unwrap();
        table.push_column("flag", Column::from(flags)).unwrap();
        prop_assert!(roundtrip(&table, delimiter, &na));
    }

    #[test]
    fn prop_single_string_column(values in prop::collection::vec(proptest::option::of(field_text()), 0..20)) {
        // Empty strings in a lone column are written as blank lines
        let mut table = TypedColumnSet::new();
        table.push_column("only", Column::from(values)).unwrap();
        prop_assert!(roundtrip(&table, Delimiter::Comma, "NA"));
    }

    #[test]
    fn prop_doubles_parse_back_exactly(d in any::<f64>().prop_filter("finite", |d| d.is_finite())) {
        let cell = Cell::Double(d);
        let text = encode(&cell, "NA");
        prop_assert!(!text.contains('e'));
        prop_assert_eq!(text.parse::<f64>().unwrap(), d);
    }

    #[test]
    fn prop_missing_encodes_as_na(na in "[^\"\n\r,]{0,4}") {
        prop_assert_eq!(encode(&Cell::Missing, &na), na.as_str());
    }

    #[test]
    fn prop_quoting_never_needed_for_plain_text(s in "[a-zA-Z0-9 ._-]{1,16}") {
        prop_assume!(s != "NA");
        prop_assert!(!needs_quoting(&s, ',', "NA"));
    }
}
