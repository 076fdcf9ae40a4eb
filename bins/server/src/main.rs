//! Tally API Server
//!
//! Serves the ledger aging and customer profitability reports.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_api::{AppState, create_router};
use tally_core::SystemClock;
use tally_db::connect;
use tally_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let tz = config.reporting.tz()?;

    let db = connect(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let state = AppState {
        db: Arc::new(db),
        clock: Arc::new(SystemClock::new(tz)),
        reporting: config.reporting.clone(),
    };
    info!(
        timezone = %tz,
        default_trailing_months = config.reporting.default_trailing_months,
        "Reporting configured"
    );

    let app = create_router(
        state,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
