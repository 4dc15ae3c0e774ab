mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod config;
mod error;
mod telemetry;

use anyhow::Context;
use axum::{Router, routing::get, response::Html};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::config::Config;
use crate::routes::sizing_routes::api_routes;
use crate::services::irradiance_table::IrradianceTable;
use crate::shared_state::AppState;

const CONFIG_ENV: &str = "SIZER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?;
    telemetry::init_tracing(&config.logging);
    info!(path = %config_path, "configuration loaded");

    // 2. Load the reference table; nothing is served without it
    let table = IrradianceTable::from_path(&config.data.csv_path)
        .with_context(|| format!("loading {}", config.data.csv_path.display()))?;
    info!(
        demand_source = ?config.data.demand_source,
        grid = %format!("{}x{}", config.waffle.width, config.waffle.height),
        "sizing model ready"
    );

    // 3. Shared state
    let state = AppState::new(&config, table);

    // 4. HTTP server
    let app = Router::new()
        .nest("/api", api_routes(state))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr()?;
    if addr.ip().is_unspecified() {
        warn!(%addr, "binding to all interfaces");
    }
    info!("API Server listening on http://{}", addr);
    info!("Scalar UI: http://{}/scalar", addr);

    tokio::select! {
        served = axum_server::bind(addr).serve(app.into_make_service()) => {
            served.context("HTTP server failed")?;
        }
        _ = telemetry::shutdown_signal() => {}
    }

    info!("shutdown complete");
    Ok(())
}
