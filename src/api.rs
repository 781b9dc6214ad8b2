//! The JSON API: expense listing, aggregate statistics, and the health
//! check.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    Error,
    state::StoreState,
    stores::{ExpenseQuery, ExpenseStore},
    summary::{category_totals, total_spending},
};

/// The body of the `/api/stats` response.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// The total amount spent across all expenses.
    pub total_amount: f64,
    /// How many expenses are recorded.
    pub total_expenses: usize,
    /// Total spending per category.
    pub categories: BTreeMap<String, f64>,
}

/// The body of the `/health` response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` when the store is reachable.
    pub status: &'static str,
    /// When the health check ran, as an RFC 3339 timestamp.
    pub timestamp: String,
    /// How many expenses are recorded.
    pub expenses_count: usize,
    /// The total amount spent across all expenses.
    pub total_amount: f64,
}

/// A route handler returning all expenses as a JSON array, newest first.
pub async fn get_expenses_api<S>(State(state): State<StoreState<S>>) -> Response
where
    S: ExpenseStore + Clone + Send + Sync,
{
    match state.expense_store.get_query(ExpenseQuery::newest_first()) {
        Ok(expenses) => Json(expenses).into_response(),
        Err(error) => api_error(error),
    }
}

/// A route handler returning aggregate statistics as a JSON object.
pub async fn get_stats_api<S>(State(state): State<StoreState<S>>) -> Response
where
    S: ExpenseStore + Clone + Send + Sync,
{
    let expenses = match state.expense_store.get_query(ExpenseQuery::default()) {
        Ok(expenses) => expenses,
        Err(error) => return api_error(error),
    };

    let categories = category_totals(&expenses)
        .into_iter()
        .map(|(category, total)| (category.to_string(), total))
        .collect();

    Json(StatsResponse {
        total_amount: total_spending(&expenses),
        total_expenses: expenses.len(),
        categories,
    })
    .into_response()
}

/// A route handler for the health check endpoint.
pub async fn get_health<S>(State(state): State<StoreState<S>>) -> Response
where
    S: ExpenseStore + Clone + Send + Sync,
{
    let expenses = match state.expense_store.get_query(ExpenseQuery::default()) {
        Ok(expenses) => expenses,
        Err(error) => return api_error(error),
    };

    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(HealthResponse {
        status: "healthy",
        timestamp,
        expenses_count: expenses.len(),
        total_amount: total_spending(&expenses),
    })
    .into_response()
}

/// JSON endpoints report failures as a JSON body rather than an HTML page.
fn api_error(error: Error) -> Response {
    tracing::error!("API request failed: {error}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": error.to_string() })),
    )
        .into_response()
}
