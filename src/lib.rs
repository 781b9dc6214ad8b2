//! Spendlog is a personal expense tracker.
//!
//! Expenses are dated monetary records filed under free-text categories.
//! This library provides the storage backends (SQLite or a flat JSON file),
//! the aggregation functions, CSV and HTML report exports, and the web
//! front end. The binaries in `src/bin` provide the HTTP server and the
//! command-line interface on top of it.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Response};
use axum_server::Handle;
use tokio::signal;

mod add_expense;
mod analytics;
mod api;
pub mod csv;
mod dashboard;
mod database_id;
mod db;
mod delete_expense;
mod endpoints;
pub mod expense;
mod expenses_page;
mod export;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
pub mod report;
mod routing;
mod state;
pub mod stores;
pub mod summary;

#[cfg(test)]
mod test_utils;

pub use database_id::ExpenseId;
pub use db::initialize as initialize_db;
pub use routing::build_router;
pub use state::AppState;

use crate::{
    internal_server_error::InternalServerError, not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A zero or negative amount was used to create an expense.
    ///
    /// Expenses record money that was spent, so the amount must be greater
    /// than zero on every creation path.
    #[error("expense amounts must be greater than zero")]
    NonPositiveAmount,

    /// An empty string was used to create a category name.
    #[error("an empty string is not a valid category name")]
    EmptyCategoryName,

    /// A date string could not be parsed.
    ///
    /// All dates are read and written in the `YYYY-MM-DD` form.
    #[error("could not parse \"{0}\" as a date in YYYY-MM-DD format")]
    InvalidDate(String),

    /// A month number outside 1 through 12 was given.
    #[error("{0} is not a valid month number (expected 1-12)")]
    InvalidMonth(u8),

    /// The requested expense could not be found.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the expense has been created.
    #[error("the requested expense could not be found")]
    NotFound,

    /// Tried to delete an expense that does not exist. The store is left
    /// unchanged.
    #[error("tried to delete an expense that is not in the store")]
    DeleteMissingExpense,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The expense file could not be read or written.
    #[error("could not access the expense file: {0}")]
    FileError(String),

    /// The expense file held something other than an array of expenses.
    #[error("could not read the expense file as JSON: {0}")]
    JsonError(String),

    /// The CSV had issues that prevented it from being parsed.
    #[error("could not parse the CSV data: {0}")]
    InvalidCsv(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::DeleteMissingExpense => get_404_not_found_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
