//! photure-media library - Media Store service
//!
//! Content-addressed-by-random-key binary store: accepts uploads, serves
//! blobs by key with display hints, deletes by key. Owns nothing but the
//! bytes; which blobs are *live* is the gallery catalog's concern.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod store;

pub use store::BlobStore;

/// Multipart framing allowance on top of the raw payload limit
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BlobStore>,
    pub max_upload_bytes: usize,
    /// Deployment environment name, shown in health responses
    pub environment: String,
}

impl AppState {
    /// Create new application state
    pub fn new(store: BlobStore, max_upload_bytes: usize, environment: impl Into<String>) -> Self {
        Self {
            store: Arc::new(store),
            max_upload_bytes,
            environment: environment.into(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(api::health))
        .route("/media/upload", post(api::upload_media))
        .route("/media/:storage_key", get(api::fetch_media))
        .route("/media/:storage_key", delete(api::delete_media))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(CorsLayer::permissive())
}
