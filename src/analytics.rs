//! The analytics page: per-category percentages and the current month's
//! total.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::OffsetDateTime;

use crate::{
    endpoints,
    html::{base, currency},
    navigation::NavBar,
    state::StoreState,
    stores::{ExpenseQuery, ExpenseStore},
    summary::{CategoryBreakdown, category_percentages, monthly_total, total_spending},
};

/// A route handler for the analytics page.
pub async fn get_analytics_page<S>(State(state): State<StoreState<S>>) -> Response
where
    S: ExpenseStore + Clone + Send + Sync,
{
    let expenses = match state.expense_store.get_query(ExpenseQuery::default()) {
        Ok(expenses) => expenses,
        Err(error) => {
            tracing::error!("could not load expenses for the analytics page: {error}");
            return error.into_response();
        }
    };

    let today = OffsetDateTime::now_utc().date();
    let current_month_label = format!("{} {}", today.month(), today.year());
    let current_month_total = monthly_total(&expenses, today.year(), today.month());

    analytics_view(
        total_spending(&expenses),
        &category_percentages(&expenses),
        &current_month_label,
        current_month_total,
    )
    .into_response()
}

fn analytics_view(
    total: f64,
    breakdown: &[CategoryBreakdown],
    current_month_label: &str,
    current_month_total: f64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::ANALYTICS).into_html();

    let content = html! {
        (nav_bar)
        div class="page"
        {
            h1 { "Analytics" }

            div class="cards"
            {
                div class="card"
                {
                    h3 { "Total Spending" }
                    p class="value" { (currency(total)) }
                }
                div class="card"
                {
                    h3 { (current_month_label) }
                    p class="value" { (currency(current_month_total)) }
                }
            }

            h2 { "Spending by Category" }
            @if breakdown.is_empty()
            {
                p { "No expenses recorded yet!" }
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
                            th class="amount" { "Percentage" }
                            th { "" }
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
                                td class="amount" { (format!("{:.1}%", row.percentage)) }
                                td
                                {
                                    div class="bar-track"
                                    {
                                        div class="bar-fill"
                                            style=(format!("width: {:.1}%", row.percentage)) {}
                                    }
                                }
                            }
                        }
                        tr class="total-row"
                        {
                            td { "Total" }
                            td class="amount" { (currency(total)) }
                            td class="amount" { "100.0%" }
                            td { "" }
                        }
                    }
                }
            }
        }
    };

    base("Analytics", &content)
}
