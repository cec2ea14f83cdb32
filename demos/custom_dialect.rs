//! Tabs, pipes, custom NA strings and tokenizer specifications.
//!
//! Run with: cargo run --example custom_dialect

use delimtext::{
    column_set, make_tokenizer, to_string, Delimiter, FixedSchemaReader, ReadOptions, Record,
    TokenizerSpec, WriteOptions,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let table = column_set! {
        "sku" => ["A|1", "B2", "NA"],
        "qty" => [Some(3i64), None, Some(0)],
        "price" => [Some(9.99), Some(f64::NAN), None],
    };

    // Default dialect
    println!("Comma, NA:");
    println!("{}", to_string(&table, &WriteOptions::default())?);

    // Tab delimiter (useful for spreadsheets)
    println!("Tab, empty NA:");
    let tab = WriteOptions::new()
        .with_delimiter(Delimiter::Tab)
        .with_na("");
    println!("{}", to_string(&table, &tab)?);

    // Pipe delimiter, values containing '|' get quoted
    println!("Pipe, no header:");
    let pipe = WriteOptions::new()
        .with_delimiter(Delimiter::Pipe)
        .with_col_names(false);
    println!("{}", to_string(&table, &pipe)?);

    // Reading back with the same dialect
    let text = to_string(&table, &tab)?;
    let back = FixedSchemaReader::new(table.schema())
        .with_options(ReadOptions::new().with_delimiter(Delimiter::Tab).with_na(""))
        .read_str(&text)?;
    println!("Tab round trip preserved {} rows", back.row_count());

    // Tokenizer specifications can come from configuration
    let spec: TokenizerSpec =
        serde_json::from_str(r#"{"variant": "delimited", "delimiter": ";", "na": "-"}"#)?;
    let mut tokenizer = make_tokenizer(&spec)?;
    let mut source = "a;-;\"x;y\"\n".as_bytes();
    let mut record = Record::new();
    while tokenizer.next_record(&mut source, &mut record)? {
        println!("Tokens: {:?}", record.tokens().collect::<Vec<_>>());
    }

    // Unknown variants are rejected up front
    let fixed = TokenizerSpec::new("fixed_width", ',', "NA");
    if let Err(e) = make_tokenizer(&fixed) {
        println!("{}", e);
    }

    Ok(())
}
