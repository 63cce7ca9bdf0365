//! HTTP handlers for the gallery catalog
//!
//! Every photo route is scoped to the owner carried in the `X-User-Id`
//! header; the gateway sets it from the verified identity. A record
//! belonging to another owner is answered exactly like a missing one.

use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use photure_common::api::types::{
    CreatePhotoRequest, DeletePhotoResult, ErrorBody, PhotoRecord, PhotoRecordPage, ServiceHealth,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

const USER_HEADER: &str = "X-User-Id";

/// Gallery error type
#[derive(Debug, Error)]
pub enum GalleryError {
    /// Owner header missing (401)
    #[error("Missing user context")]
    MissingUser,

    /// No record for this id and owner (404)
    #[error("Photo not found")]
    NotFound,

    /// Invalid pagination bounds (400)
    #[error("{0}")]
    BadRequest(String),

    /// Persistence failure (500)
    #[error("Database error: {0}")]
    Database(#[from] photure_common::Error),
}

impl IntoResponse for GalleryError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            GalleryError::MissingUser => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Missing user context".to_string(),
            ),
            GalleryError::NotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Photo not found".to_string(),
            ),
            GalleryError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            GalleryError::Database(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };
        (status, Json(ErrorBody::new(code, message))).into_response()
    }
}

fn require_user_id(headers: &HeaderMap) -> Result<String, GalleryError> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(GalleryError::MissingUser)
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<ServiceHealth> {
    Json(ServiceHealth::ok(
        "gallery-service",
        format!("Environment: {}", state.environment),
    ))
}

/// POST /gallery/photos
///
/// The catalog assigns the id and upload date; the caller supplies
/// everything else, including the owner.
pub async fn create_photo(
    State(state): State<AppState>,
    Json(payload): Json<CreatePhotoRequest>,
) -> Result<Json<PhotoRecord>, GalleryError> {
    debug!(user_id = %payload.user_id, "Creating photo metadata");

    let record = PhotoRecord {
        id: Uuid::new_v4().to_string(),
        filename: payload.filename,
        original_name: payload.original_name,
        content_type: payload.content_type,
        size: payload.size,
        user_id: payload.user_id,
        upload_date: Utc::now(),
        storage_key: payload.storage_key,
    };

    crate::db::insert_photo(&state.db, &record).await?;
    Ok(Json(record))
}

/// Query parameters for photo listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

/// GET /gallery/photos?skip=&limit=
pub async fn list_photos(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<PhotoRecordPage>, GalleryError> {
    let user_id = require_user_id(&headers)?;

    if query.skip < 0 {
        return Err(GalleryError::BadRequest(
            "skip must be non-negative".to_string(),
        ));
    }
    if !(1..=100).contains(&query.limit) {
        return Err(GalleryError::BadRequest(
            "limit must be between 1 and 100".to_string(),
        ));
    }

    let photos = crate::db::list_photos(&state.db, &user_id, query.skip, query.limit).await?;
    let total = crate::db::count_photos(&state.db, &user_id).await?;

    Ok(Json(PhotoRecordPage { photos, total }))
}

/// GET /gallery/photos/:photo_id
pub async fn get_photo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(photo_id): Path<String>,
) -> Result<Json<PhotoRecord>, GalleryError> {
    let user_id = require_user_id(&headers)?;

    let record = crate::db::get_photo(&state.db, &photo_id, &user_id)
        .await?
        .ok_or(GalleryError::NotFound)?;
    Ok(Json(record))
}

/// DELETE /gallery/photos/:photo_id
///
/// Returns the storage key the removed record referenced so the caller
/// can release the blob.
pub async fn delete_photo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(photo_id): Path<String>,
) -> Result<Json<DeletePhotoResult>, GalleryError> {
    let user_id = require_user_id(&headers)?;

    let storage_key = crate::db::delete_photo(&state.db, &photo_id, &user_id)
        .await?
        .ok_or(GalleryError::NotFound)?;

    info!(photo_id = %photo_id, user_id = %user_id, "Deleted photo metadata");
    Ok(Json(DeletePhotoResult {
        storage_key,
        deleted: true,
    }))
}
