//! Building a table from serde rows and writing it to a file.
//!
//! Run with: cargo run --example write_table

use delimtext::{write_delimited, TypedColumnSet, WriteOptions};
use serde::Serialize;
use std::error::Error;

#[derive(Debug, Serialize)]
struct Trip {
    medallion: String,
    passengers: i64,
    fare: f64,
    tip: Option<f64>,
    note: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let trips = vec![
        Trip {
            medallion: "A1".to_string(),
            passengers: 1,
            fare: 12.5,
            tip: Some(2.0),
            note: Some("airport, terminal 4".to_string()),
        },
        Trip {
            medallion: "B7".to_string(),
            passengers: 3,
            fare: 7.0,
            tip: None,
            note: Some("NA".to_string()),
        },
        Trip {
            medallion: "C3".to_string(),
            passengers: 2,
            fare: 31.25,
            tip: Some(6.0),
            note: None,
        },
    ];

    let table = TypedColumnSet::from_rows(&trips)?;

    // An empty path renders in memory
    println!("In memory:");
    let text = write_delimited(&table, "", &WriteOptions::default())?;
    println!("{}", text);

    // Any other path is written to disk
    let path = std::env::temp_dir().join("delimtext_trips.csv");
    let path_str = path.to_string_lossy();
    write_delimited(&table, &path_str, &WriteOptions::default())?;

    // Append a second batch without repeating the header
    let append = WriteOptions::new().with_append(true).with_col_names(false);
    write_delimited(&table, &path_str, &append)?;

    println!("Written to {}:", path.display());
    println!("{}", std::fs::read_to_string(&path)?);

    Ok(())
}
