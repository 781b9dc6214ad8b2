//! Application router configuration.

use axum::{Router, routing::get};

use crate::{
    AppState,
    add_expense::{create_expense_endpoint, get_add_expense_page},
    analytics::get_analytics_page,
    api::{get_expenses_api, get_health, get_stats_api},
    dashboard::get_dashboard_page,
    delete_expense::delete_expense_endpoint,
    endpoints,
    expenses_page::get_expenses_page,
    export::{export_csv_endpoint, export_report_endpoint, get_export_page},
    not_found::get_404_not_found,
    stores::ExpenseStore,
};

/// Return a router with all the app's routes.
pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: ExpenseStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard_page::<S>))
        .route(endpoints::EXPENSES, get(get_expenses_page::<S>))
        .route(
            endpoints::ADD_EXPENSE,
            get(get_add_expense_page::<S>).post(create_expense_endpoint::<S>),
        )
        .route(endpoints::DELETE_EXPENSE, get(delete_expense_endpoint::<S>))
        .route(endpoints::ANALYTICS, get(get_analytics_page::<S>))
        .route(endpoints::EXPORT, get(get_export_page))
        .route(endpoints::EXPORT_CSV, get(export_csv_endpoint::<S>))
        .route(endpoints::EXPORT_REPORT, get(export_report_endpoint::<S>))
        .route(endpoints::EXPENSES_API, get(get_expenses_api::<S>))
        .route(endpoints::STATS_API, get(get_stats_api::<S>))
        .route(endpoints::HEALTH, get(get_health::<S>))
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::{
        AppState, endpoints,
        expense::{CategoryName, Expense},
        stores::{ExpenseStore, SqliteExpenseStore},
    };

    use super::build_router;

    fn get_test_server() -> TestServer {
        let mut store = SqliteExpenseStore::open_in_memory().unwrap();
        store
            .create(
                Expense::build(4.50, CategoryName::new_unchecked("Food"))
                    .unwrap()
                    .description("Morning coffee"),
            )
            .unwrap();

        let router = build_router(AppState::new(store));

        TestServer::new(router)
    }

    #[tokio::test]
    async fn health_endpoint_is_routed() {
        let server = get_test_server();

        let response = server.get(endpoints::HEALTH).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["expenses_count"], 1);
    }

    #[tokio::test]
    async fn dashboard_is_served_at_the_root() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD).await;

        response.assert_status_ok();
        assert!(response.text().contains("Dashboard"));
    }

    #[tokio::test]
    async fn unknown_route_falls_back_to_404_page() {
        let server = get_test_server();

        let response = server.get("/no_such_page").await;

        response.assert_status_not_found();
        assert!(response.text().contains("404"));
    }

    #[tokio::test]
    async fn add_expense_form_posts_and_redirects() {
        let server = get_test_server();

        let response = server
            .post(endpoints::ADD_EXPENSE)
            .form(&[
                ("amount", "12.75"),
                ("category", "food"),
                ("description", "Lunch"),
                ("date", "2025-10-20"),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);

        let stats = server.get(endpoints::STATS_API).await;
        let body: Value = stats.json();
        assert_eq!(body["total_expenses"], 2);
        assert_eq!(body["categories"]["Food"], 17.25);
    }
}
