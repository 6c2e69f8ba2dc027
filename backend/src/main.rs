//! Stock Ledger - Backend Server
//!
//! Serves point-in-time stock positions aggregated from the factory's
//! calculation log: overall and per-supplier summaries, per-product
//! drill-downs and the period report with its workbook export.

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod routes;
mod services;
mod store;

#[cfg(test)]
mod test_support;

pub use config::Config;
use store::{LedgerStore, MemoryLedgerStore, PgLedgerStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LedgerStore>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "stock_ledger_server=debug,shared=debug,tower_http=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Stock Ledger Server");
    tracing::info!("Environment: {}", config.environment);

    let store = connect_store(&config).await?;

    // Create application state
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = config.server.bind_address();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Open the configured record store: a JSON snapshot if one is set, PostgreSQL otherwise
async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn LedgerStore>> {
    if let Some(path) = &config.database.snapshot_path {
        tracing::info!("Loading ledger snapshot from {}", path);
        let store = MemoryLedgerStore::from_json_file(path).await?;
        return Ok(Arc::new(store));
    }

    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;
    tracing::info!("Database connection established");

    Ok(Arc::new(PgLedgerStore::new(db_pool)))
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Stock Ledger API v1.0"
}
