//! Implements an expense store backed by a flat JSON file.

use std::{
    collections::BTreeSet,
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use crate::{
    Error,
    database_id::ExpenseId,
    expense::{CategoryName, DEFAULT_CATEGORIES, Expense, ExpenseBuilder},
    stores::{ExpenseQuery, ExpenseStore, SortOrder},
};

/// Stores expenses in memory, backed by a single JSON file.
///
/// The file holds an array of `{id, date, amount, category, description}`
/// objects. It is read once when the store is opened and rewritten in full
/// on every mutation, so the file on disk always mirrors the in-memory list.
/// Cloned handles share the same state behind a mutex.
#[derive(Debug, Clone)]
pub struct JsonExpenseStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    expenses: Vec<Expense>,
    categories: BTreeSet<CategoryName>,
    next_id: ExpenseId,
}

impl Inner {
    fn save(&self) -> Result<(), Error> {
        let text = serde_json::to_string_pretty(&self.expenses)
            .map_err(|error| Error::JsonError(error.to_string()))?;

        fs::write(&self.path, text).map_err(|error| {
            Error::FileError(format!("could not write {}: {error}", self.path.display()))
        })
    }
}

impl JsonExpenseStore {
    /// Open the store at `path`, loading any expenses already in the file.
    ///
    /// A missing file is not an error, it simply means an empty store: the
    /// file is created on the first mutation. The category set starts from
    /// the defaults plus every label found in the file, and the next ID
    /// continues from the highest ID in the file.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or does not
    /// contain a JSON array of expenses.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();

        let expenses: Vec<Expense> = if path.exists() {
            let text = fs::read_to_string(&path).map_err(|error| {
                Error::FileError(format!("could not read {}: {error}", path.display()))
            })?;

            serde_json::from_str(&text).map_err(|error| Error::JsonError(error.to_string()))?
        } else {
            Vec::new()
        };

        let mut categories: BTreeSet<CategoryName> = DEFAULT_CATEGORIES
            .iter()
            .map(|name| CategoryName::new_unchecked(name))
            .collect();
        categories.extend(expenses.iter().map(|expense| expense.category.clone()));

        let next_id = expenses.iter().map(|expense| expense.id).max().unwrap_or(0) + 1;

        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                path,
                expenses,
                categories,
                next_id,
            })),
        })
    }
}

impl ExpenseStore for JsonExpenseStore {
    /// Create a new expense, assign it the next ID, and rewrite the file.
    ///
    /// # Errors
    /// Returns an [Error::FileError] or [Error::JsonError] if the file
    /// cannot be rewritten.
    ///
    /// # Panics
    /// Panics if the store lock has been poisoned.
    fn create(&mut self, builder: ExpenseBuilder) -> Result<Expense, Error> {
        let mut inner = self.inner.lock().unwrap();

        let id = inner.next_id;
        inner.next_id += 1;

        let expense = builder.finalise(id);
        inner.categories.insert(expense.category.clone());
        inner.expenses.push(expense.clone());
        inner.save()?;

        Ok(expense)
    }

    /// Create many expenses with a single rewrite of the file.
    ///
    /// # Errors
    /// Returns an [Error::FileError] or [Error::JsonError] if the file
    /// cannot be rewritten.
    ///
    /// # Panics
    /// Panics if the store lock has been poisoned.
    fn import(&mut self, builders: Vec<ExpenseBuilder>) -> Result<Vec<Expense>, Error> {
        let mut inner = self.inner.lock().unwrap();
        let mut imported = Vec::with_capacity(builders.len());

        for builder in builders {
            let id = inner.next_id;
            inner.next_id += 1;

            let expense = builder.finalise(id);
            inner.categories.insert(expense.category.clone());
            inner.expenses.push(expense.clone());
            imported.push(expense);
        }

        inner.save()?;
        Ok(imported)
    }

    /// Retrieve an expense by its `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a stored expense.
    ///
    /// # Panics
    /// Panics if the store lock has been poisoned.
    fn get(&self, id: ExpenseId) -> Result<Expense, Error> {
        self.inner
            .lock()
            .unwrap()
            .expenses
            .iter()
            .find(|expense| expense.id == id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    /// Query for expenses in the in-memory list.
    ///
    /// # Panics
    /// Panics if the store lock has been poisoned.
    fn get_query(&self, query: ExpenseQuery) -> Result<Vec<Expense>, Error> {
        let inner = self.inner.lock().unwrap();

        let mut expenses: Vec<Expense> = inner
            .expenses
            .iter()
            .filter(|expense| match &query.category {
                Some(category) => expense.category.matches(category.as_ref()),
                None => true,
            })
            .filter(|expense| match &query.date_range {
                Some(date_range) => date_range.contains(&expense.date),
                None => true,
            })
            .cloned()
            .collect();

        match query.sort_date {
            Some(SortOrder::Ascending) => expenses.sort_by(|a, b| a.date.cmp(&b.date)),
            Some(SortOrder::Descending) => expenses.sort_by(|a, b| b.date.cmp(&a.date)),
            None => {}
        }

        if let Some(limit) = query.limit {
            expenses.truncate(limit as usize);
        }

        Ok(expenses)
    }

    /// Remove an expense and rewrite the file.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingExpense] if `id` does not refer to a stored
    ///   expense (the store and file are left unchanged),
    /// - or [Error::FileError]/[Error::JsonError] if the file cannot be
    ///   rewritten.
    ///
    /// # Panics
    /// Panics if the store lock has been poisoned.
    fn delete(&mut self, id: ExpenseId) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();

        let index = inner
            .expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or(Error::DeleteMissingExpense)?;

        inner.expenses.remove(index);
        inner.save()
    }

    /// Get the total number of expenses in the store.
    ///
    /// # Panics
    /// Panics if the store lock has been poisoned.
    fn count(&self) -> Result<usize, Error> {
        Ok(self.inner.lock().unwrap().expenses.len())
    }

    /// The known category labels, sorted by name.
    ///
    /// # Panics
    /// Panics if the store lock has been poisoned.
    fn categories(&self) -> Result<Vec<CategoryName>, Error> {
        Ok(self.inner.lock().unwrap().categories.iter().cloned().collect())
    }
}
