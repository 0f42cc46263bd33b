//! Gudang API Server
//!
//! Main entry point for the Gudang backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gudang_api::{create_router, AppState};
use gudang_db::connect;
use gudang_shared::{AppConfig, AuthConfig, TokenService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gudang=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create token service
    let auth_config = AuthConfig {
        secret: config.auth.secret.clone(),
        token_expiry_secs: config.auth.token_expiry_secs,
    };
    let token_service = TokenService::new(&auth_config);

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        tokens: Arc::new(token_service),
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
