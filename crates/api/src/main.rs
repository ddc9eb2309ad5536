use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use wabot_api::{app, config, middleware, services};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging and metrics
    middleware::logging::init_logging(&config.logging);
    middleware::metrics::init_metrics();

    info!("Starting Wabot API v{}", env!("CARGO_PKG_VERSION"));

    // Create database pool
    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    // Seed the bootstrap admin key if the keys table is empty
    services::admin_bootstrap::bootstrap_admin_key(&pool, &config.security).await?;

    // Outbound WhatsApp client
    let sender = Arc::new(services::whatsapp::WhatsAppSender::new(
        config.whatsapp.clone(),
    )?);

    // Build application
    let app = app::create_app(config.clone(), pool, sender);

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
