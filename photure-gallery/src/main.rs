//! photure-gallery (Gallery Catalog) - Photo metadata service

use anyhow::Result;
use photure_common::Settings;
use photure_gallery::{build_router, AppState};
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
        "Starting Photure Gallery Catalog (photure-gallery) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let settings = Settings::from_env()?;
    info!("Database: {}", settings.gallery_db_path.display());

    let pool = photure_gallery::db::init_database(&settings.gallery_db_path).await?;
    info!("Database connection established");

    let state = AppState::new(pool, settings.environment);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.gallery_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("photure-gallery listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
