//! photure-gw library - Photure API Gateway
//!
//! Presents the single client-facing API and orchestrates the three leaf
//! services (identity verifier, media store, gallery catalog) behind it.
//! The orchestration rules live in [`orchestrator`]; the leaf client
//! traits and their HTTP implementations live in [`clients`].

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod clients;
pub mod error;
pub mod orchestrator;

pub use error::{GatewayError, GatewayResult};
pub use orchestrator::Orchestrator;

/// Multipart framing allowance on top of the raw payload limit
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Create new application state
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.orchestrator.max_upload_bytes() + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(api::health))
        .route("/api/upload", post(api::upload_photo))
        .route("/api/photos", get(api::list_photos))
        .route("/api/photos/:photo_id", delete(api::delete_photo))
        .route("/api/serve/:photo_id", get(api::serve_photo))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Enable CORS for browser clients
        .layer(CorsLayer::permissive())
}
