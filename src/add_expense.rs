//! The page and endpoint for recording a new expense.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    endpoints,
    expense::{CategoryName, ExpenseBuilder, parse_date},
    html::base,
    navigation::NavBar,
    state::StoreState,
    stores::ExpenseStore,
};

/// The data in the add-expense form.
#[derive(Debug, Deserialize)]
pub struct ExpenseFormData {
    /// How much money was spent, as typed by the user.
    pub amount: String,
    /// The category label, free text.
    pub category: String,
    /// What the money was spent on.
    pub description: String,
    /// The date in `YYYY-MM-DD` form, or empty for today.
    #[serde(default)]
    pub date: String,
}

/// A route handler for the add-expense form page.
pub async fn get_add_expense_page<S>(State(state): State<StoreState<S>>) -> Response
where
    S: ExpenseStore + Clone + Send + Sync,
{
    let categories = known_categories(&state.expense_store);

    add_expense_view(&categories, "").into_response()
}

/// A route handler for the add-expense form submission.
///
/// On invalid input the form is re-rendered with an inline error message.
/// On success the client is redirected to the dashboard.
pub async fn create_expense_endpoint<S>(
    State(mut state): State<StoreState<S>>,
    Form(form): Form<ExpenseFormData>,
) -> Response
where
    S: ExpenseStore + Clone + Send + Sync,
{
    let categories = known_categories(&state.expense_store);

    let amount: f64 = match form.amount.trim().parse() {
        Ok(amount) => amount,
        Err(_) => {
            return add_expense_view(
                &categories,
                &format!("Could not read \"{}\" as an amount.", form.amount.trim()),
            )
            .into_response();
        }
    };

    let category = match CategoryName::new(&form.category) {
        Ok(category) => category,
        Err(error) => {
            return add_expense_view(&categories, &format!("Error: {error}")).into_response();
        }
    };

    let date = if form.date.trim().is_empty() {
        OffsetDateTime::now_utc().date()
    } else {
        match parse_date(&form.date) {
            Ok(date) => date,
            Err(error) => {
                return add_expense_view(&categories, &format!("Error: {error}")).into_response();
            }
        }
    };

    let builder = match ExpenseBuilder::new(amount, category) {
        Ok(builder) => builder.date(date).description(form.description.trim()),
        Err(error) => {
            return add_expense_view(&categories, &format!("Error: {error}")).into_response();
        }
    };

    match state.expense_store.create(builder) {
        Ok(expense) => {
            tracing::info!(
                "added expense #{}: {} for {}",
                expense.id,
                expense.amount,
                expense.category
            );
            Redirect::to(endpoints::DASHBOARD).into_response()
        }
        Err(error) => {
            tracing::error!("could not store the new expense: {error}");
            error.into_response()
        }
    }
}

/// The known category labels, or an empty list if the store cannot provide
/// them. The form still works without suggestions.
fn known_categories<S: ExpenseStore>(store: &S) -> Vec<CategoryName> {
    store.categories().unwrap_or_else(|error| {
        tracing::error!("could not load categories for the add-expense form: {error}");
        Vec::new()
    })
}

fn add_expense_view(categories: &[CategoryName], error_message: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::ADD_EXPENSE).into_html();

    let content = html! {
        (nav_bar)
        div class="page"
        {
            h1 { "Add Expense" }

            form class="expense-form" method="post" action=(endpoints::ADD_EXPENSE)
            {
                label for="amount" { "Amount" }
                input
                    id="amount"
                    type="number"
                    name="amount"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    autofocus;

                label for="category" { "Category" }
                input
                    id="category"
                    type="text"
                    name="category"
                    list="known-categories"
                    placeholder="Category"
                    required;
                datalist id="known-categories"
                {
                    @for category in categories
                    {
                        option value=(category) {}
                    }
                }

                label for="description" { "Description" }
                input
                    id="description"
                    type="text"
                    name="description"
                    placeholder="What was it for?"
                    required;

                label for="date" { "Date (leave empty for today)" }
                input id="date" type="date" name="date";

                @if !error_message.is_empty()
                {
                    p class="form-error" { (error_message) }
                }

                button type="submit" { "Add Expense" }
            }
        }
    };

    base("Add Expense", &content)
}

#[cfg(test)]
mod add_expense_page_tests {
    use axum::{extract::State, http::StatusCode};
    use scraper::Selector;

    use crate::{
        state::StoreState,
        stores::SqliteExpenseStore,
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::get_add_expense_page;

    #[tokio::test]
    async fn renders_form_with_category_suggestions() {
        let state = StoreState {
            expense_store: SqliteExpenseStore::open_in_memory().unwrap(),
        };

        let response = get_add_expense_page(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let input_selector = Selector::parse("input[name=amount]").unwrap();
        assert!(html.select(&input_selector).next().is_some());

        let option_selector = Selector::parse("datalist option").unwrap();
        assert_eq!(html.select(&option_selector).count(), 9);
    }
}

#[cfg(test)]
mod create_expense_endpoint_tests {
    use axum::{Form, extract::State, http::StatusCode};
    use time::macros::date;

    use crate::{
        state::StoreState,
        stores::{ExpenseQuery, ExpenseStore, SqliteExpenseStore},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{ExpenseFormData, create_expense_endpoint};

    fn get_test_state() -> StoreState<SqliteExpenseStore> {
        StoreState {
            expense_store: SqliteExpenseStore::open_in_memory().unwrap(),
        }
    }

    #[tokio::test]
    async fn valid_form_creates_expense_and_redirects() {
        let state = get_test_state();
        let form = ExpenseFormData {
            amount: "4.50".to_owned(),
            category: "food".to_owned(),
            description: "Morning coffee".to_owned(),
            date: "2025-10-22".to_owned(),
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            crate::endpoints::DASHBOARD
        );

        let expenses = state
            .expense_store
            .get_query(ExpenseQuery::default())
            .unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, 4.50);
        assert_eq!(expenses[0].category.as_ref(), "Food");
        assert_eq!(expenses[0].date, date!(2025 - 10 - 22));
        assert_eq!(expenses[0].description, "Morning coffee");
    }

    #[tokio::test]
    async fn unparseable_amount_re_renders_form_with_error() {
        let state = get_test_state();
        let form = ExpenseFormData {
            amount: "four fifty".to_owned(),
            category: "Food".to_owned(),
            description: "Coffee".to_owned(),
            date: String::new(),
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Could not read \"four fifty\" as an amount."));

        let expenses = state
            .expense_store
            .get_query(ExpenseQuery::default())
            .unwrap();
        assert!(expenses.is_empty());
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() {
        let state = get_test_state();
        let form = ExpenseFormData {
            amount: "-4.50".to_owned(),
            category: "Food".to_owned(),
            description: "Coffee".to_owned(),
            date: String::new(),
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("expense amounts must be greater than zero"));
    }

    #[tokio::test]
    async fn bad_date_is_rejected() {
        let state = get_test_state();
        let form = ExpenseFormData {
            amount: "4.50".to_owned(),
            category: "Food".to_owned(),
            description: "Coffee".to_owned(),
            date: "22/10/2025".to_owned(),
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form)).await;

        let html = parse_html_document(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("could not parse \"22/10/2025\" as a date"));
    }

    #[tokio::test]
    async fn empty_date_defaults_to_today() {
        let state = get_test_state();
        let form = ExpenseFormData {
            amount: "4.50".to_owned(),
            category: "Food".to_owned(),
            description: "Coffee".to_owned(),
            date: String::new(),
        };

        create_expense_endpoint(State(state.clone()), Form(form)).await;

        let expenses = state
            .expense_store
            .get_query(ExpenseQuery::default())
            .unwrap();
        assert_eq!(
            expenses[0].date,
            time::OffsetDateTime::now_utc().date()
        );
    }
}
