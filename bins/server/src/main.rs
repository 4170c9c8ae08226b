//! LedgerBridge API Server
//!
//! Main entry point for the LedgerBridge integration service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledgerbridge_api::{AppState, create_router};
use ledgerbridge_db::connect_pool;
use ledgerbridge_shared::{AppConfig, PlatformClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgerbridge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect_pool(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    // Service credentials are read once here and never re-read
    let platform = PlatformClient::new(config.platform.clone())?;
    info!(
        base_url = %config.platform.base_url,
        service_user = %config.platform.service_user,
        "Platform client configured"
    );

    if config.defaults.company.is_none() {
        tracing::warn!("No default company configured; requests must name one");
    }

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        platform: Arc::new(platform),
        api: Arc::new(config.api.clone()),
        defaults: Arc::new(config.defaults.clone()),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
