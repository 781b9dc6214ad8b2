//! Implements a SQLite backed expense store.

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, params_from_iter, types::Value};

use crate::{
    Error,
    database_id::ExpenseId,
    db::{initialize, map_expense_row},
    expense::{CategoryName, Expense, ExpenseBuilder},
    stores::{ExpenseQuery, ExpenseStore, SortOrder},
};

/// Stores expenses in a SQLite database.
///
/// The connection is shared behind a mutex so cloned handles (e.g. one per
/// request handler) serialize their access to the database.
#[derive(Debug, Clone)]
pub struct SqliteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The connection is expected to have been initialized with
    /// [initialize](crate::initialize_db), which [SqliteExpenseStore::open]
    /// does for you.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Open (or create) the database at `path` and set up the schema.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let connection = Connection::open(path)?;
        initialize(&connection)?;

        Ok(Self::new(Arc::new(Mutex::new(connection))))
    }

    /// Open an in-memory database, useful for tests and demos.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn open_in_memory() -> Result<Self, Error> {
        let connection = Connection::open_in_memory()?;
        initialize(&connection)?;

        Ok(Self::new(Arc::new(Mutex::new(connection))))
    }
}

impl ExpenseStore for SqliteExpenseStore {
    /// Create a new expense in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection has been poisoned.
    fn create(&mut self, builder: ExpenseBuilder) -> Result<Expense, Error> {
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT OR IGNORE INTO categories (name) VALUES (?1)",
            (builder.category.as_ref(),),
        )?;

        let expense = connection
            .prepare(
                "INSERT INTO expenses (date, amount, category, description)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, date, amount, category, description",
            )?
            .query_row(
                (
                    builder.date,
                    builder.amount,
                    builder.category.as_ref(),
                    &builder.description,
                ),
                map_expense_row,
            )?;

        Ok(expense)
    }

    /// Create many expenses in a single transaction.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error. No expenses
    /// are stored in that case.
    ///
    /// # Panics
    /// Panics if the lock for the database connection has been poisoned.
    fn import(&mut self, builders: Vec<ExpenseBuilder>) -> Result<Vec<Expense>, Error> {
        let connection = self.connection.lock().unwrap();
        let tx = connection.unchecked_transaction()?;
        let mut imported = Vec::with_capacity(builders.len());

        {
            let mut category_statement =
                tx.prepare("INSERT OR IGNORE INTO categories (name) VALUES (?1)")?;
            let mut expense_statement = tx.prepare(
                "INSERT INTO expenses (date, amount, category, description)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, date, amount, category, description",
            )?;

            for builder in builders {
                category_statement.execute((builder.category.as_ref(),))?;

                let expense = expense_statement.query_row(
                    (
                        builder.date,
                        builder.amount,
                        builder.category.as_ref(),
                        &builder.description,
                    ),
                    map_expense_row,
                )?;

                imported.push(expense);
            }
        }

        tx.commit()?;
        Ok(imported)
    }

    /// Retrieve an expense in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a stored expense,
    /// - or [Error::SqlError] if there is some other SQL error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection has been poisoned.
    fn get(&self, id: ExpenseId) -> Result<Expense, Error> {
        let expense = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, date, amount, category, description FROM expenses WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], map_expense_row)?;

        Ok(expense)
    }

    /// Query for expenses in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection has been poisoned.
    fn get_query(&self, query: ExpenseQuery) -> Result<Vec<Expense>, Error> {
        let mut query_string_parts =
            vec!["SELECT id, date, amount, category, description FROM expenses".to_string()];
        let mut where_clause_parts = vec![];
        let mut query_parameters = vec![];

        if let Some(category) = query.category {
            where_clause_parts.push(format!(
                "category = ?{} COLLATE NOCASE",
                query_parameters.len() + 1
            ));
            query_parameters.push(Value::Text(category.as_ref().to_string()));
        }

        if let Some(date_range) = query.date_range {
            where_clause_parts.push(format!(
                "date BETWEEN ?{} AND ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2,
            ));
            query_parameters.push(Value::Text(date_range.start().to_string()));
            query_parameters.push(Value::Text(date_range.end().to_string()));
        }

        if !where_clause_parts.is_empty() {
            query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
        }

        match query.sort_date {
            Some(SortOrder::Ascending) => query_string_parts.push("ORDER BY date ASC".to_string()),
            Some(SortOrder::Descending) => {
                query_string_parts.push("ORDER BY date DESC".to_string())
            }
            None => {}
        }

        if let Some(limit) = query.limit {
            query_string_parts.push(format!("LIMIT {limit}"));
        }

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_map(params, map_expense_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::SqlError))
            .collect()
    }

    /// Remove an expense from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingExpense] if `id` does not refer to a stored
    ///   expense,
    /// - or [Error::SqlError] if there is some other SQL error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection has been poisoned.
    fn delete(&mut self, id: ExpenseId) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM expenses WHERE id = :id", &[(":id", &id)])?;

        if rows_affected == 0 {
            Err(Error::DeleteMissingExpense)
        } else {
            Ok(())
        }
    }

    /// Get the total number of expenses in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection has been poisoned.
    fn count(&self) -> Result<usize, Error> {
        self.connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(id) FROM expenses", [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|count| count as usize)
            .map_err(|error| error.into())
    }

    /// The known category labels, sorted by name.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection has been poisoned.
    fn categories(&self) -> Result<Vec<CategoryName>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT name FROM categories ORDER BY name ASC")?
            .query_map([], |row| {
                let name: String = row.get(0)?;
                Ok(CategoryName::new_unchecked(&name))
            })?
            .map(|maybe_name| maybe_name.map_err(Error::SqlError))
            .collect()
    }
}

#[cfg(test)]
mod sqlite_expense_store_tests {
    use time::macros::date;

    use crate::{
        Error,
        expense::{CategoryName, DEFAULT_CATEGORIES, Expense, ExpenseBuilder},
        stores::{ExpenseQuery, ExpenseStore, SortOrder},
    };

    use super::SqliteExpenseStore;

    fn get_test_store() -> SqliteExpenseStore {
        SqliteExpenseStore::open_in_memory().expect("Could not open in-memory SQLite store")
    }

    fn coffee() -> ExpenseBuilder {
        Expense::build(4.50, CategoryName::new_unchecked("Food"))
            .unwrap()
            .date(date!(2025 - 10 - 22))
            .description("Morning coffee")
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let mut store = get_test_store();

        let first = store.create(coffee()).unwrap();
        let second = store.create(coffee()).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn create_then_get_returns_matching_record() {
        let mut store = get_test_store();

        let created = store.create(coffee()).unwrap();
        let got = store.get(created.id).unwrap();

        assert_eq!(created, got);
    }

    #[test]
    fn create_adds_one_record() {
        let mut store = get_test_store();
        store.create(coffee()).unwrap();
        let count_before = store.count().unwrap();

        store.create(coffee()).unwrap();

        assert_eq!(store.count().unwrap(), count_before + 1);
    }

    #[test]
    fn get_fails_on_invalid_id() {
        let mut store = get_test_store();
        let expense = store.create(coffee()).unwrap();

        let got = store.get(expense.id + 1337);

        assert_eq!(got, Err(Error::NotFound));
    }

    #[test]
    fn delete_removes_record() {
        let mut store = get_test_store();
        let expense = store.create(coffee()).unwrap();

        store.delete(expense.id).unwrap();

        assert_eq!(store.get(expense.id), Err(Error::NotFound));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn delete_missing_id_fails_and_leaves_store_unchanged() {
        let mut store = get_test_store();
        let expense = store.create(coffee()).unwrap();

        let result = store.delete(expense.id + 1);

        assert_eq!(result, Err(Error::DeleteMissingExpense));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn query_by_category_is_case_insensitive() {
        let mut store = get_test_store();
        store.create(coffee()).unwrap();
        store
            .create(
                Expense::build(15.00, CategoryName::new_unchecked("Transport"))
                    .unwrap()
                    .date(date!(2025 - 10 - 24))
                    .description("Bus fare"),
            )
            .unwrap();

        let got = store
            .get_query(ExpenseQuery {
                category: Some(CategoryName::new_unchecked("fOOd")),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].description, "Morning coffee");
    }

    #[test]
    fn query_by_date_range_is_inclusive() {
        let mut store = get_test_store();
        let dates = [
            date!(2025 - 10 - 01),
            date!(2025 - 10 - 15),
            date!(2025 - 10 - 31),
            date!(2025 - 11 - 01),
        ];
        for date in dates {
            store.create(coffee().date(date)).unwrap();
        }

        let got = store
            .get_query(ExpenseQuery {
                date_range: Some(date!(2025 - 10 - 01)..=date!(2025 - 10 - 31)),
                sort_date: Some(SortOrder::Ascending),
                ..Default::default()
            })
            .unwrap();

        let got_dates: Vec<_> = got.iter().map(|expense| expense.date).collect();
        assert_eq!(
            got_dates,
            [
                date!(2025 - 10 - 01),
                date!(2025 - 10 - 15),
                date!(2025 - 10 - 31)
            ]
        );
    }

    #[test]
    fn query_sorts_newest_first() {
        let mut store = get_test_store();
        for date in [
            date!(2025 - 10 - 20),
            date!(2025 - 10 - 24),
            date!(2025 - 10 - 18),
        ] {
            store.create(coffee().date(date)).unwrap();
        }

        let got = store.get_query(ExpenseQuery::newest_first()).unwrap();

        let got_dates: Vec<_> = got.iter().map(|expense| expense.date).collect();
        assert_eq!(
            got_dates,
            [
                date!(2025 - 10 - 24),
                date!(2025 - 10 - 20),
                date!(2025 - 10 - 18)
            ]
        );
    }

    #[test]
    fn query_applies_limit() {
        let mut store = get_test_store();
        for _ in 0..10 {
            store.create(coffee()).unwrap();
        }

        let got = store
            .get_query(ExpenseQuery {
                limit: Some(5),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(got.len(), 5);
    }

    #[test]
    fn categories_start_with_defaults() {
        let store = get_test_store();

        let got = store.categories().unwrap();

        let mut want: Vec<_> = DEFAULT_CATEGORIES.to_vec();
        want.sort();
        let got_names: Vec<_> = got.iter().map(|name| name.as_ref()).collect();
        assert_eq!(got_names, want);
    }

    #[test]
    fn new_category_label_grows_the_set() {
        let mut store = get_test_store();

        store
            .create(
                Expense::build(30.00, CategoryName::new_unchecked("Gifts"))
                    .unwrap()
                    .description("Birthday present"),
            )
            .unwrap();

        let got = store.categories().unwrap();
        assert!(got.iter().any(|name| name.as_ref() == "Gifts"));
        assert_eq!(got.len(), DEFAULT_CATEGORIES.len() + 1);
    }

    #[test]
    fn deleting_last_expense_keeps_category() {
        let mut store = get_test_store();
        let expense = store
            .create(
                Expense::build(30.00, CategoryName::new_unchecked("Gifts"))
                    .unwrap()
                    .description("Birthday present"),
            )
            .unwrap();

        store.delete(expense.id).unwrap();

        let got = store.categories().unwrap();
        assert!(got.iter().any(|name| name.as_ref() == "Gifts"));
    }

    #[test]
    fn import_stores_all_records() {
        let mut store = get_test_store();
        let builders = vec![
            coffee(),
            Expense::build(12.75, CategoryName::new_unchecked("Food"))
                .unwrap()
                .date(date!(2025 - 10 - 20))
                .description("Lunch"),
        ];

        let imported = store.import(builders).unwrap();

        assert_eq!(imported.len(), 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn description_with_quotes_is_stored_verbatim() {
        let mut store = get_test_store();

        let expense = store
            .create(coffee().description("Tom's \"special\" brew"))
            .unwrap();

        assert_eq!(
            store.get(expense.id).unwrap().description,
            "Tom's \"special\" brew"
        );
    }
}
