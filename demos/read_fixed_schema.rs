//! Reading typed columns back with a declared schema.
//!
//! Run with: RUST_LOG=delimtext=debug cargo run --example read_fixed_schema

use delimtext::{read_fixed_schema, Column, ColumnType, Error, Schema};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let path = std::env::temp_dir().join("delimtext_people.csv");
    std::fs::write(
        &path,
        "id,name,score,active\n1,Alice,9.5,TRUE\n2,\"Bob, Jr.\",NA,F\n3,NA,Inf,true\n",
    )?;

    // Columns are matched by header name, so the order here is free
    let schema = Schema::new()
        .field("name", ColumnType::String)
        .field("id", ColumnType::Integer)
        .field("score", ColumnType::Double);

    // The hint is smaller than the file; columns grow as needed
    let table = read_fixed_schema(&path, &schema, 2)?;
    println!("Read {} rows x {} columns", table.row_count(), table.column_count());

    for (name, column) in table.columns() {
        let cells: Vec<String> = column.iter().map(|cell| format!("{:?}", cell)).collect();
        println!("  {} ({}): {}", name, column.column_type(), cells.join(", "));
    }

    if let Some(Column::Double(scores)) = table.column("score") {
        let present: Vec<f64> = scores.iter().flatten().copied().collect();
        println!("Scores present: {:?}", present);
    }

    // A declared column the file does not have
    let wider = schema.field("email", ColumnType::String);
    match read_fixed_schema(&path, &wider, 0) {
        Err(Error::SchemaMismatch { missing }) => println!("Missing columns: {:?}", missing),
        other => println!("Unexpected result: {:?}", other),
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}
