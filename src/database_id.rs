//! Database ID type definition.

/// Alias for the integer type used to identify expense records.
///
/// Both storage backends assign these monotonically: SQLite through an
/// `AUTOINCREMENT` primary key, the JSON file store through a max-plus-one
/// counter established when the file is loaded.
pub type ExpenseId = i64;
