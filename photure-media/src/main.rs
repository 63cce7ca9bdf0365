//! photure-media (Media Store) - Filesystem-backed blob service

use anyhow::Result;
use photure_common::Settings;
use photure_media::{build_router, AppState, BlobStore};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Photure Media Store (photure-media) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let settings = Settings::from_env()?;
    info!("Upload directory: {}", settings.upload_dir.display());
    info!("Max upload size: {} bytes", settings.max_upload_bytes);

    let store = BlobStore::new(&settings.upload_dir);
    store.ensure_root().await?;

    let state = AppState::new(store, settings.max_upload_bytes, settings.environment);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.media_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("photure-media listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
