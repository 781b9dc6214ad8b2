//! The dashboard page: headline statistics, recent expenses, and category
//! totals at a glance.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    endpoints,
    expense::Expense,
    expenses_page::expense_table,
    html::{base, currency},
    navigation::NavBar,
    state::StoreState,
    stores::{ExpenseQuery, ExpenseStore},
    summary::{CategoryBreakdown, SpendingSummary, category_percentages, spending_summary},
};

/// How many expenses the recent-expenses section shows.
const RECENT_EXPENSE_COUNT: usize = 10;

/// A route handler for the dashboard page.
pub async fn get_dashboard_page<S>(State(state): State<StoreState<S>>) -> Response
where
    S: ExpenseStore + Clone + Send + Sync,
{
    let expenses = match state.expense_store.get_query(ExpenseQuery::newest_first()) {
        Ok(expenses) => expenses,
        Err(error) => {
            tracing::error!("could not load expenses for the dashboard: {error}");
            return error.into_response();
        }
    };

    let summary = spending_summary(&expenses);
    let breakdown = category_percentages(&expenses);
    let recent = &expenses[..expenses.len().min(RECENT_EXPENSE_COUNT)];

    dashboard_view(&summary, recent, &breakdown).into_response()
}

fn dashboard_view(
    summary: &SpendingSummary,
    recent: &[Expense],
    breakdown: &[CategoryBreakdown],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD).into_html();

    let date_range = match (summary.earliest, summary.latest) {
        (Some(earliest), Some(latest)) => format!("{earliest} to {latest}"),
        _ => "N/A".to_owned(),
    };

    let content = html! {
        (nav_bar)
        div class="page"
        {
            h1 { "Dashboard" }

            div class="cards"
            {
                div class="card"
                {
                    h3 { "Total Spending" }
                    p class="value" { (currency(summary.total)) }
                }
                div class="card"
                {
                    h3 { "Expenses" }
                    p class="value" { (summary.count) }
                }
                div class="card"
                {
                    h3 { "Average" }
                    p class="value" { (currency(summary.average)) }
                }
                div class="card"
                {
                    h3 { "Date Range" }
                    p class="value" { (date_range) }
                }
            }

            h2 { "Recent Expenses" }
            @if recent.is_empty()
            {
                p
                {
                    "No expenses recorded yet. "
                    a href=(endpoints::ADD_EXPENSE) { "Add your first expense." }
                }
            }
            @else
            {
                (expense_table(recent, false))
            }

            h2 { "Spending by Category" }
            @if breakdown.is_empty()
            {
                p { "Nothing to break down yet." }
            }
            @else
            {
                table class="expense-table"
                {
                    thead
                    {
                        tr
                        {
                            th { "Category" }
                            th class="amount" { "Amount" }
                        }
                    }
                    tbody
                    {
                        @for row in breakdown
                        {
                            tr
                            {
                                td { (row.category) }
                                td class="amount" { (currency(row.total)) }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Dashboard", &content)
}
