//! The endpoint for deleting an expense.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    Error, database_id::ExpenseId, endpoints, state::StoreState, stores::ExpenseStore,
};

/// A route handler for deleting an expense, redirecting to the expenses
/// listing on success.
///
/// The original UI links to this from each table row, so it is a GET route
/// rather than a DELETE route.
pub async fn delete_expense_endpoint<S>(
    State(mut state): State<StoreState<S>>,
    Path(expense_id): Path<ExpenseId>,
) -> Response
where
    S: ExpenseStore + Clone + Send + Sync,
{
    match state.expense_store.delete(expense_id) {
        Ok(()) => {
            tracing::info!("deleted expense #{expense_id}");
            Redirect::to(endpoints::EXPENSES).into_response()
        }
        Err(error @ Error::DeleteMissingExpense) => {
            tracing::warn!("tried to delete expense #{expense_id}, which does not exist");
            error.into_response()
        }
        Err(error) => {
            tracing::error!("could not delete expense #{expense_id}: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod delete_expense_endpoint_tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };

    use crate::{
        endpoints,
        expense::{CategoryName, Expense},
        state::StoreState,
        stores::{ExpenseStore, SqliteExpenseStore},
    };

    use super::delete_expense_endpoint;

    fn get_test_state() -> StoreState<SqliteExpenseStore> {
        let mut store = SqliteExpenseStore::open_in_memory().unwrap();
        store
            .create(
                Expense::build(4.50, CategoryName::new_unchecked("Food"))
                    .unwrap()
                    .description("Morning coffee"),
            )
            .unwrap();

        StoreState {
            expense_store: store,
        }
    }

    #[tokio::test]
    async fn deletes_expense_and_redirects_to_listing() {
        let state = get_test_state();

        let response = delete_expense_endpoint(State(state.clone()), Path(1)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            endpoints::EXPENSES
        );
        assert_eq!(state.expense_store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn deleting_unknown_id_returns_not_found_and_keeps_store() {
        let state = get_test_state();

        let response = delete_expense_endpoint(State(state.clone()), Path(999)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.expense_store.count().unwrap(), 1);
    }
}
