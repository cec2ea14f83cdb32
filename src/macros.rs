/// Builds a [`TypedColumnSet`](crate::TypedColumnSet) from column literals.
///
/// Each entry is `name => [values]`; the values go through
/// [`Column::from`](crate::Column), so plain values and `Option`s of `bool`,
/// `i64`, `f64`, `&str` and `String` are accepted.
///
/// # Panics
///
/// Panics if a name repeats or if the columns differ in length.
///
/// # Examples
///
/// ```rust
/// use delimtext::{column_set, Cell};
///
/// let table = column_set! {
///     "id" => [1i64, 2],
///     "score" => [Some(9.5), None],
/// };
/// assert_eq!(table.row(1).unwrap(), vec![Cell::Integer(2), Cell::Missing]);
/// ```
#[macro_export]
macro_rules! column_set {
    () => {
        $crate::TypedColumnSet::new()
    };

    ($($name:expr => [ $($value:expr),* $(,)? ]),+ $(,)?) => {{
        let mut table = $crate::TypedColumnSet::new();
        $(
            if let Err(err) = table.push_column($name, $crate::Column::from(vec![$($value),*])) {
                panic!("column_set!: {}", err);
            }
        )+
        table
    }};
}
