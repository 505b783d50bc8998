// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

mod api;

pub use api::{ApiError, CatalogQuery, HealthResponse, PlanRequest, PlanResponse};

use axum::{
    Router,
    routing::{get, post},
};
use battsize_core::Catalog;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Application state for web handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

/// Build the API router over a shared, read-only catalog
pub fn router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/health", get(api::health_handler))
        .route("/api/catalog", get(api::catalog_handler))
        .route("/api/size", post(api::size_handler))
        .route("/api/recommend", post(api::recommend_handler))
        .route("/api/plan", post(api::plan_handler))
        .layer(CorsLayer::permissive())
        .with_state(AppState { catalog })
}

/// Start the web server and serve until the process is stopped
///
/// # Arguments
/// * `catalog` - Battery catalog shared by all handlers
/// * `host` - Interface to bind, e.g. "0.0.0.0"
/// * `port` - Port to listen on
///
/// # Errors
/// Returns error if server fails to bind or serve
pub async fn start_web_server(
    catalog: Arc<Catalog>,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog_size = catalog.len();
    let app = router(catalog);

    let addr = format!("{host}:{port}");
    info!("🌐 Starting web server on {addr} ({catalog_size} catalog items)");
    info!("🔋 Sizing API: http://localhost:{}/api/size", port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
