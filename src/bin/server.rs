use std::{fs::OpenOptions, net::SocketAddr, path::Path, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use spendlog::{
    AppState, build_router, graceful_shutdown,
    stores::{ExpenseQuery, ExpenseStore, JsonExpenseStore, SqliteExpenseStore},
    summary::total_spending,
};

/// The web server for spendlog.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to a SQLite database to store expenses in.
    ///
    /// When omitted, expenses are stored in the JSON file given by
    /// --data-file.
    #[arg(long, conflicts_with = "data_file")]
    db_path: Option<String>,

    /// File path to the JSON expense file.
    #[arg(long, default_value = "expenses.json")]
    data_file: String,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let router = match &args.db_path {
        Some(db_path) => {
            let store = SqliteExpenseStore::open(Path::new(db_path))
                .expect("Could not open the SQLite database");
            log_store_contents(&store, db_path);
            build_router(AppState::new(store))
        }
        None => {
            let store = JsonExpenseStore::open(&args.data_file)
                .expect("Could not open the expense file");
            log_store_contents(&store, &args.data_file);
            build_router(AppState::new(store))
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(router);

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn log_store_contents<S: ExpenseStore>(store: &S, source: &str) {
    match store.get_query(ExpenseQuery::default()) {
        Ok(expenses) => tracing::info!(
            "loaded {} expenses (${:.2} total) from {source}",
            expenses.len(),
            total_spending(&expenses)
        ),
        Err(error) => tracing::warn!("could not read back the store at startup: {error}"),
    }
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
