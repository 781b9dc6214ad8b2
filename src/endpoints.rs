//! The application's endpoint URIs.
//!
//! For endpoints that take a parameter, e.g. '/delete_expense/{expense_id}',
//! use [format_endpoint].

/// The dashboard, also the root route.
pub const DASHBOARD: &str = "/";
/// The page listing all expenses with an optional category filter.
pub const EXPENSES: &str = "/expenses";
/// The page (GET) and endpoint (POST) for recording a new expense.
pub const ADD_EXPENSE: &str = "/add_expense";
/// The endpoint for deleting an expense, then redirecting to the listing.
pub const DELETE_EXPENSE: &str = "/delete_expense/{expense_id}";
/// The analytics page with the per-category breakdown.
pub const ANALYTICS: &str = "/analytics";
/// The export landing page.
pub const EXPORT: &str = "/export";
/// The CSV download.
pub const EXPORT_CSV: &str = "/export_csv";
/// The standalone HTML report download.
pub const EXPORT_REPORT: &str = "/export_report";

/// The route returning all expenses as a JSON array.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route returning aggregate statistics as a JSON object.
pub const STATS_API: &str = "/api/stats";
/// The health check endpoint.
pub const HEALTH: &str = "/health";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace. For
/// example, in '/delete_expense/{expense_id}', '{expense_id}' is the
/// parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
