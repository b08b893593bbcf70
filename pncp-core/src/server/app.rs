use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{dados, health, importacao};
use crate::services::ItemCountSource;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub item_counts: Arc<dyn ItemCountSource>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, item_counts: Arc<dyn ItemCountSource>) -> Self {
        Self { db, item_counts }
    }
}

pub fn create_app(
    state: AppState,
    cors_origin: Option<&str>,
    max_upload_bytes: usize,
) -> Result<Router> {
    let cors = match cors_origin {
        Some(origin) => CorsLayer::new().allow_origin(
            origin
                .parse::<HeaderValue>()
                .map_err(|e| anyhow!("Invalid CORS origin: {}", e))?,
        ),
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers(Any)
    .allow_credentials(false);

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/pncp/importar_descricao_itens",
            post(importacao::importar_descricao_itens),
        )
        .route("/pncp/dados", get(dados::get_dados))
        .route("/pncp/:sequencial/:ano/zip", get(dados::get_zip))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    Ok(app)
}
