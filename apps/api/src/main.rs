mod assets;
mod config;
mod deck;
mod errors;
mod layout;
mod models;
mod render;
mod routes;
mod selection;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assets::AssetCatalog;
use crate::config::Config;
use crate::layout::SlideGeometry;
use crate::render::PptxBackend;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Deckforge API v{}", env!("CARGO_PKG_VERSION"));

    // Prepare the asset catalog — missing images get placeholders up front so
    // builds never race over placeholder creation.
    let assets = AssetCatalog::new(config.assets_dir.clone());
    assets.ensure_all()?;
    info!(dir = %config.assets_dir.display(), "asset catalog ready");

    let geometry = SlideGeometry::default();
    info!(
        width_in = geometry.slide_width_in,
        height_in = geometry.slide_height_in,
        "slide geometry configured"
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        geometry,
        assets,
        backend: Arc::new(PptxBackend),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
