use std::sync::Arc;

use handmaxx::api::routes::{create_routes, AppState};
use handmaxx::config::{run_migrations, AppConfig, DatabaseConfig, WhatsAppConfig};
use handmaxx::services::WhatsAppClient;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database_config = DatabaseConfig::from_env()?;
    let pool = database_config.create_pool().await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
        info!("Database migrations applied");
    }

    let whatsapp_config = WhatsAppConfig::from_env()?;
    let gateway = Arc::new(WhatsAppClient::new(&whatsapp_config)?);
    info!(gateway = %gateway.base_url(), "WhatsApp gateway configured");

    let state = AppState::with_postgres(pool, gateway, &whatsapp_config);
    let app = create_routes(state);

    // Start the server
    let listener = TcpListener::bind(config.server_address()).await?;
    info!(
        "Handmaxx server starting on http://{} ({})",
        config.server_address(),
        config.environment
    );

    axum::serve(listener, app).await?;

    Ok(())
}
