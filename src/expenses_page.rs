//! The page listing all expenses, with an optional category filter.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    endpoints,
    expense::{CategoryName, Expense},
    html::{base, currency},
    navigation::NavBar,
    state::StoreState,
    stores::{ExpenseQuery, ExpenseStore},
    summary::total_spending,
};

/// The query parameters accepted by the expenses page.
#[derive(Debug, Default, Deserialize)]
pub struct ExpensesPageParams {
    /// Show only expenses filed under this category.
    pub category: Option<String>,
}

/// A route handler for the page listing expenses, newest first.
pub async fn get_expenses_page<S>(
    State(state): State<StoreState<S>>,
    Query(params): Query<ExpensesPageParams>,
) -> Response
where
    S: ExpenseStore + Clone + Send + Sync,
{
    let selected_category = params
        .category
        .as_deref()
        .and_then(|label| CategoryName::new(label).ok());

    let query = ExpenseQuery {
        category: selected_category.clone(),
        ..ExpenseQuery::newest_first()
    };

    let expenses = match state.expense_store.get_query(query) {
        Ok(expenses) => expenses,
        Err(error) => {
            tracing::error!("could not load expenses for the expenses page: {error}");
            return error.into_response();
        }
    };

    let categories = match state.expense_store.categories() {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("could not load categories for the expenses page: {error}");
            return error.into_response();
        }
    };

    expenses_view(&expenses, &categories, selected_category.as_ref()).into_response()
}

fn expenses_view(
    expenses: &[Expense],
    categories: &[CategoryName],
    selected_category: Option<&CategoryName>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES).into_html();

    let content = html! {
        (nav_bar)
        div class="page"
        {
            h1 { "Expenses" }

            form class="filter-bar" method="get" action=(endpoints::EXPENSES)
            {
                label for="category" { "Category:" }
                select id="category" name="category"
                {
                    option value="" { "All" }
                    @for category in categories
                    {
                        @if Some(category) == selected_category
                        {
                            option value=(category) selected { (category) }
                        }
                        @else
                        {
                            option value=(category) { (category) }
                        }
                    }
                }
                button type="submit" { "Filter" }
            }

            @if expenses.is_empty()
            {
                p { "No expenses to display." }
            }
            @else
            {
                (expense_table(expenses, true))
            }
        }
    };

    base("Expenses", &content)
}

/// A table of expenses with a closing total row.
///
/// Shared by the expenses page (with delete links) and the dashboard's
/// recent-expenses section (without).
pub(crate) fn expense_table(expenses: &[Expense], with_delete: bool) -> Markup {
    html! {
        table class="expense-table"
        {
            thead
            {
                tr
                {
                    th { "Date" }
                    th class="amount" { "Amount" }
                    th { "Category" }
                    th { "Description" }
                    @if with_delete { th { "" } }
                }
            }
            tbody
            {
                @for expense in expenses
                {
                    tr
                    {
                        td { (expense.date) }
                        td class="amount" { (currency(expense.amount)) }
                        td { (expense.category) }
                        td { (expense.description) }
                        @if with_delete
                        {
                            td
                            {
                                a
                                    class="delete-link"
                                    href=(endpoints::format_endpoint(endpoints::DELETE_EXPENSE, expense.id))
                                {
                                    "Delete"
                                }
                            }
                        }
                    }
                }
                tr class="total-row"
                {
                    td { "Total" }
                    td class="amount" { (currency(total_spending(expenses))) }
                    td { "" }
                    td { "" }
                    @if with_delete { td { "" } }
                }
            }
        }
    }
}

#[cfg(test)]
mod expenses_page_tests {
    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        expense::{CategoryName, Expense},
        state::StoreState,
        stores::{ExpenseStore, SqliteExpenseStore},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{ExpensesPageParams, get_expenses_page};

    fn get_test_state() -> StoreState<SqliteExpenseStore> {
        let mut store = SqliteExpenseStore::open_in_memory().unwrap();

        store
            .create(
                Expense::build(4.50, CategoryName::new_unchecked("Food"))
                    .unwrap()
                    .date(date!(2025 - 10 - 22))
                    .description("Morning coffee"),
            )
            .unwrap();
        store
            .create(
                Expense::build(15.00, CategoryName::new_unchecked("Transport"))
                    .unwrap()
                    .date(date!(2025 - 10 - 24))
                    .description("Bus fare"),
            )
            .unwrap();

        StoreState {
            expense_store: store,
        }
    }

    #[tokio::test]
    async fn lists_all_expenses_with_total() {
        let state = get_test_state();

        let response =
            get_expenses_page(State(state), Query(ExpensesPageParams::default())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let row_selector = Selector::parse("tbody tr").unwrap();
        let rows = html.select(&row_selector).count();
        // Two expense rows plus the total row.
        assert_eq!(rows, 3);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("$19.50"), "missing total in: {text}");
    }

    #[tokio::test]
    async fn filters_by_category_case_insensitively() {
        let state = get_test_state();

        let response = get_expenses_page(
            State(state),
            Query(ExpensesPageParams {
                category: Some("food".to_owned()),
            }),
        )
        .await;

        let html = parse_html_document(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Morning coffee"));
        assert!(!text.contains("Bus fare"));
    }

    #[tokio::test]
    async fn rows_link_to_delete_endpoint() {
        let state = get_test_state();

        let response =
            get_expenses_page(State(state), Query(ExpensesPageParams::default())).await;

        let html = parse_html_document(response).await;
        let link_selector = Selector::parse("a.delete-link").unwrap();
        let links: Vec<_> = html
            .select(&link_selector)
            .filter_map(|link| link.attr("href"))
            .collect();

        assert_eq!(links.len(), 2);
        assert!(links.contains(&"/delete_expense/1"));
        assert!(links.contains(&"/delete_expense/2"));
    }
}
