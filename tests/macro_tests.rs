use delimtext::{column_set, to_string, Cell, Column, ColumnType, WriteOptions};

#[test]
fn test_column_set_empty() {
    let table = column_set! {};
    assert_eq!(table.column_count(), 0);
    assert_eq!(to_string(&table, &WriteOptions::default()).unwrap(), "");
}

#[test]
fn test_column_set_single_column() {
    let table = column_set! { "n" => [1i64, 2, 3] };
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.column("n"), Some(&Column::Integer(vec![Some(1), Some(2), Some(3)])));
}

#[test]
fn test_column_set_trailing_commas() {
    let table = column_set! {
        "a" => [true, false,],
        "b" => ["x", "y",],
    };
    assert_eq!(table.names().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_column_set_with_missing_values() {
    let table = column_set! {
        "name" => [Some("Alice"), None],
        "score" => [None, Some(2.5)],
    };
    assert_eq!(table.row(0).unwrap(), vec![Cell::from("Alice"), Cell::Missing]);
    assert_eq!(table.row(1).unwrap(), vec![Cell::Missing, Cell::Double(2.5)]);
    assert_eq!(
        table.schema().fields()[1].column_type,
        ColumnType::Double
    );
}

#[test]
fn test_column_set_owned_strings() {
    let owned = String::from("owned");
    let table = column_set! { "s" => [owned.clone(), String::new()] };
    assert_eq!(
        to_string(&table, &WriteOptions::default()).unwrap(),
        "s\nowned\n\n"
    );
}

#[test]
fn test_column_set_writes_in_declared_order() {
    let table = column_set! {
        "z" => [1i64],
        "a" => [2i64],
        "m" => [3i64],
    };
    assert_eq!(
        to_string(&table, &WriteOptions::default()).unwrap(),
        "z,a,m\n1,2,3\n"
    );
}

#[test]
#[should_panic(expected = "Duplicate column name")]
fn test_column_set_duplicate_name_panics() {
    let _ = column_set! { "a" => [1i64], "a" => [2i64] };
}
