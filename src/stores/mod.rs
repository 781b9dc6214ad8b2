//! Contains the storage trait and the backends that persist expenses.
//!
//! There is one canonical storage interface, [ExpenseStore], with two
//! interchangeable implementations: [SqliteExpenseStore] for a SQLite
//! database and [JsonExpenseStore] for a flat JSON file. Which backend to
//! use is decided once at startup.

mod json;
mod sqlite;

pub use json::JsonExpenseStore;
pub use sqlite::SqliteExpenseStore;

use std::ops::RangeInclusive;

use time::Date;

use crate::{
    Error,
    database_id::ExpenseId,
    expense::{CategoryName, Expense, ExpenseBuilder},
};

/// Handles the creation, retrieval, and deletion of expense records.
pub trait ExpenseStore {
    /// Create a new expense in the store, assigning its ID.
    ///
    /// If the expense introduces a category label the store has not seen
    /// before, the label is added to the category set.
    fn create(&mut self, builder: ExpenseBuilder) -> Result<Expense, Error>;

    /// Create many expenses at once, e.g. from a CSV import.
    fn import(&mut self, builders: Vec<ExpenseBuilder>) -> Result<Vec<Expense>, Error>;

    /// Retrieve an expense from the store.
    fn get(&self, id: ExpenseId) -> Result<Expense, Error>;

    /// Retrieve expenses from the store in the way defined by `query`.
    fn get_query(&self, query: ExpenseQuery) -> Result<Vec<Expense>, Error>;

    /// Remove an expense from the store.
    ///
    /// Deleting the last expense in a category does not remove the category
    /// from the category set.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingExpense] if `id` does not refer to a
    /// stored expense. The store is left unchanged in that case.
    fn delete(&mut self, id: ExpenseId) -> Result<(), Error>;

    /// Get the total number of expenses in the store.
    fn count(&self) -> Result<usize, Error>;

    /// The known category labels, sorted by name.
    ///
    /// This is the seeded default set plus every label introduced by an
    /// expense.
    fn categories(&self) -> Result<Vec<CategoryName>, Error>;
}

/// Defines how expenses should be fetched from [ExpenseStore::get_query].
#[derive(Debug, Default)]
pub struct ExpenseQuery {
    /// Include only expenses filed under this category (case-insensitive).
    pub category: Option<CategoryName>,
    /// Include expenses within `date_range` (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,
    /// Orders expenses by date. None returns expenses in the order they are
    /// stored.
    pub sort_date: Option<SortOrder>,
    /// Selects up to the first N (`limit`) expenses.
    pub limit: Option<u64>,
}

impl ExpenseQuery {
    /// The query every listing view uses: all expenses, newest first.
    pub fn newest_first() -> Self {
        Self {
            sort_date: Some(SortOrder::Descending),
            ..Default::default()
        }
    }
}

/// The order to sort expenses in an [ExpenseQuery].
#[derive(Debug)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}
