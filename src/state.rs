//! Implements the struct that holds the state of the web server.

use std::marker::{Send, Sync};

use axum::extract::FromRef;

use crate::stores::ExpenseStore;

/// The state of the web server.
///
/// The state is generic over the storage backend so the same router serves
/// a SQLite database or a JSON file, whichever was chosen at startup.
#[derive(Debug, Clone)]
pub struct AppState<S>
where
    S: ExpenseStore + Send + Sync,
{
    /// The store holding the user's expenses.
    pub expense_store: S,
}

impl<S> AppState<S>
where
    S: ExpenseStore + Send + Sync,
{
    /// Create a new [AppState] for `expense_store`.
    pub fn new(expense_store: S) -> Self {
        Self { expense_store }
    }
}

/// The state needed by route handlers that read or mutate expenses.
#[derive(Debug, Clone)]
pub struct StoreState<S>
where
    S: ExpenseStore + Send + Sync,
{
    /// The store holding the user's expenses.
    pub expense_store: S,
}

impl<S> FromRef<AppState<S>> for StoreState<S>
where
    S: ExpenseStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<S>) -> Self {
        Self {
            expense_store: state.expense_store.clone(),
        }
    }
}
