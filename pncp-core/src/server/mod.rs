pub mod app;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use anyhow::Result;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::{AppConfig, DatabaseConfig};
use crate::database::connect;
use crate::services::PncpApiClient;

pub async fn start_server(config: AppConfig) -> Result<()> {
    let db = connect(&config.database).await?;
    let item_counts = Arc::new(PncpApiClient::new(&config.pncp_api)?);
    info!("Item counts will be read from {}", config.pncp_api.base_url);

    let state = app::AppState::new(db, item_counts);
    let app = app::create_app(state, config.cors_origin.as_deref(), config.max_upload_bytes)?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("Server running on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  /health                          - Health check");
    info!("  /pncp/importar_descricao_itens   - Import item descriptions (POST, multipart)");
    info!("  /pncp/dados                      - Export purchases as json, xlsx, csv or ods");
    info!("  /pncp/:sequencial/:ano/zip       - Purchase report as zipped DOCX");
}

/// Connect with the given settings and ping the server
pub async fn check_database(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let db = connect(config).await?;
    db.ping().await?;
    info!("Database at {} is reachable", config.redacted_url());
    Ok(db)
}
