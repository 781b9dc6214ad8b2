//! The export landing page and the CSV/HTML report downloads.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use maud::html;
use time::OffsetDateTime;

use crate::{
    csv::{export_file_name, write_csv},
    endpoints,
    html::base,
    navigation::NavBar,
    report::{report_document, report_file_name},
    state::StoreState,
    stores::{ExpenseQuery, ExpenseStore},
};

/// A route handler for the export landing page.
pub async fn get_export_page() -> Response {
    let nav_bar = NavBar::new(endpoints::EXPORT).into_html();

    let content = html! {
        (nav_bar)
        div class="page"
        {
            h1 { "Export" }

            p
            {
                "Download your expense data to analyse it elsewhere or to "
                "share it. The HTML report is a single self-contained file."
            }

            p { a class="button" href=(endpoints::EXPORT_CSV) { "Download CSV" } }
            p { a class="button" href=(endpoints::EXPORT_REPORT) { "Download HTML report" } }
        }
    };

    base("Export", &content).into_response()
}

/// A route handler serving all expenses as a CSV download.
pub async fn export_csv_endpoint<S>(State(state): State<StoreState<S>>) -> Response
where
    S: ExpenseStore + Clone + Send + Sync,
{
    let expenses = match state.expense_store.get_query(ExpenseQuery::newest_first()) {
        Ok(expenses) => expenses,
        Err(error) => {
            tracing::error!("could not load expenses for the CSV export: {error}");
            return error.into_response();
        }
    };

    let mut buffer = Vec::new();
    if let Err(error) = write_csv(&expenses, &mut buffer) {
        tracing::error!("could not write the CSV export: {error}");
        return error.into_response();
    }

    let file_name = export_file_name(OffsetDateTime::now_utc().date());
    tracing::info!("exported {} expenses to {file_name}", expenses.len());

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        buffer,
    )
        .into_response()
}

/// A route handler serving the standalone HTML report as a download.
pub async fn export_report_endpoint<S>(State(state): State<StoreState<S>>) -> Response
where
    S: ExpenseStore + Clone + Send + Sync,
{
    let expenses = match state.expense_store.get_query(ExpenseQuery::newest_first()) {
        Ok(expenses) => expenses,
        Err(error) => {
            tracing::error!("could not load expenses for the HTML report: {error}");
            return error.into_response();
        }
    };

    let today = OffsetDateTime::now_utc().date();
    let file_name = report_file_name(today);
    let document = report_document(&expenses, today);

    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        document.into_string(),
    )
        .into_response()
}
