//! photure-gw (API Gateway) - Single client-facing entry point
//!
//! Orchestrates the identity verifier, media store, and gallery catalog
//! into four user-facing operations: upload, list, serve, delete.

use anyhow::Result;
use photure_common::Settings;
use photure_gw::clients::{AuthClient, GalleryClient, MediaClient};
use photure_gw::{build_router, AppState, Orchestrator};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Per-call timeout for every outbound leaf request
const LEAF_TIMEOUT_SECS: u64 = 30;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Photure API Gateway (photure-gw) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let settings = Settings::from_env()?;
    info!("Auth service: {}", settings.auth_service_url);
    info!("Media service: {}", settings.media_service_url);
    info!("Gallery service: {}", settings.gallery_service_url);

    // One shared outbound client, built at startup and injected into the
    // per-leaf clients; every leaf call inherits the uniform timeout
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(LEAF_TIMEOUT_SECS))
        .build()?;

    let orchestrator = Orchestrator::new(
        Arc::new(AuthClient::new(http.clone(), settings.auth_service_url)),
        Arc::new(MediaClient::new(http.clone(), settings.media_service_url)),
        Arc::new(GalleryClient::new(http, settings.gallery_service_url)),
        settings.max_upload_bytes,
    );

    let state = AppState::new(orchestrator);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.gateway_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("photure-gw listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
