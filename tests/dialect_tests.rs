//! Dialect conformance tests: quoting, value encodings and tokenizer specs.

use delimtext::{
    column_set, encode, encode_value, make_tokenizer, needs_quoting, quote, to_string, Cell,
    Delimiter, Error, Record, Token, TokenizerKind, TokenizerSpec, WriteOptions,
};

#[test]
fn test_value_encodings() {
    assert_eq!(encode(&Cell::Boolean(true), "NA"), "TRUE");
    assert_eq!(encode(&Cell::Boolean(false), "NA"), "FALSE");
    assert_eq!(encode(&Cell::Integer(-17), "NA"), "-17");
    assert_eq!(encode(&Cell::Double(f64::NAN), "NA"), "NaN");
    assert_eq!(encode(&Cell::Double(f64::INFINITY), "NA"), "Inf");
    assert_eq!(encode(&Cell::Double(f64::NEG_INFINITY), "NA"), "-Inf");
    assert_eq!(encode(&Cell::Double(-0.0), "NA"), "-0");
    assert_eq!(encode(&Cell::Double(1e21), "NA"), "1000000000000000000000");
    assert_eq!(encode(&Cell::Missing, "∅"), "∅");
}

#[test]
fn test_encode_value_scalars() {
    assert_eq!(encode_value(&'x', "NA").unwrap(), "x");
    assert_eq!(encode_value(&-5i8, "NA").unwrap(), "-5");
    assert_eq!(encode_value(&2.5f32, "NA").unwrap(), "2.5");
    assert_eq!(encode_value(&None::<bool>, "-").unwrap(), "-");
    assert!(matches!(
        encode_value(&std::collections::BTreeMap::<String, i32>::new(), "NA"),
        Err(Error::UnsupportedType(_))
    ));
}

#[test]
fn test_quoting_rule() {
    for delimiter in [',', '\t', '|', ';'] {
        let with_delimiter = format!("a{}b", delimiter);
        assert!(needs_quoting(&with_delimiter, delimiter, "NA"));
    }
    assert!(needs_quoting("quote\"inside", ',', "NA"));
    assert!(needs_quoting("NA", ',', "NA"));
    assert!(!needs_quoting("NA", ',', ""));
    assert_eq!(quote("\"\""), "\"\"\"\"\"\"");
}

#[test]
fn test_pipe_dialect_output() {
    let table = column_set! {
        "sku" => ["A|1", "B2"],
        "qty" => [Some(3i64), None],
    };
    let options = WriteOptions::new()
        .with_delimiter(Delimiter::Pipe)
        .with_na("");
    assert_eq!(
        to_string(&table, &options).unwrap(),
        "sku|qty\n\"A|1\"|3\nB2|\n"
    );
}

#[test]
fn test_other_delimiter() {
    let table = column_set! { "a" => [1i64], "b" => ["x#y"] };
    let options = WriteOptions::new().with_delimiter('#');
    assert_eq!(to_string(&table, &options).unwrap(), "a#b\n1#\"x#y\"\n");
}

#[test]
fn test_invalid_write_delimiter() {
    let table = column_set! { "a" => [1i64] };
    let options = WriteOptions::new().with_delimiter('"');
    assert!(matches!(
        to_string(&table, &options),
        Err(Error::InvalidDialect(_))
    ));
}

#[test]
fn test_tokenizer_spec_from_json() {
    let spec: TokenizerSpec = serde_json::from_str(
        r#"{"variant": "tokenizer_delimited", "delim": ";", "na_string": "-", "comment": "%"}"#,
    )
    .unwrap();
    let mut tokenizer = make_tokenizer(&spec).unwrap();
    assert_eq!(tokenizer.kind(), TokenizerKind::Delimited);

    let mut source = "% header comment\na;-;\"-\"\n".as_bytes();
    let mut record = Record::new();
    assert!(tokenizer.next_record(&mut source, &mut record).unwrap());
    assert_eq!(
        record.tokens().collect::<Vec<_>>(),
        vec![Token::Text("a"), Token::Missing, Token::Text("-")]
    );
    assert_eq!(record.line(), 2);
}

#[test]
fn test_unknown_tokenizer_variant() {
    let spec: TokenizerSpec = serde_json::from_str(r#"{"variant": "fixed_width"}"#).unwrap();
    let err = make_tokenizer(&spec).unwrap_err();
    assert_eq!(err, Error::UnsupportedSpecification("fixed_width".to_string()));
    assert!(err.to_string().contains("fixed_width"));
}

#[test]
fn test_tokenizer_spec_serializes() {
    let json = serde_json::to_value(TokenizerSpec::delimited('\t', "")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"variant": "delimited", "delimiter": "\t", "na": ""})
    );
}
