//! photure-gallery library - Gallery Catalog service
//!
//! Per-owner photo metadata records keyed by a unique photo id. The
//! catalog is the source of truth for which stored blobs are live; it
//! knows nothing about the bytes themselves.

use axum::routing::{delete, get, post};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Deployment environment name, shown in health responses
    pub environment: String,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, environment: impl Into<String>) -> Self {
        Self {
            db,
            environment: environment.into(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/gallery/photos", post(api::create_photo))
        .route("/gallery/photos", get(api::list_photos))
        .route("/gallery/photos/:photo_id", get(api::get_photo))
        .route("/gallery/photos/:photo_id", delete(api::delete_photo))
        .with_state(state)
        .layer(CorsLayer::permissive())
}
