//! HTTP handlers for the media store

use crate::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use photure_common::api::types::{ErrorBody, MediaDeleteResponse, MediaUploadResponse, ServiceHealth};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Media store error type
#[derive(Debug, Error)]
pub enum MediaError {
    /// Declared content type is not an image (400)
    #[error("Only image files are allowed")]
    NotAnImage,

    /// Payload over the configured limit (413)
    #[error("File exceeds max upload size")]
    TooLarge,

    /// Storage key does not resolve (404)
    #[error("Media not found")]
    NotFound,

    /// Malformed multipart request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Storage failure (500)
    #[error("Storage error: {0}")]
    Storage(#[from] photure_common::Error),
}

impl IntoResponse for MediaError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            MediaError::NotAnImage => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Only image files are allowed".to_string(),
            ),
            MediaError::TooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "File exceeds max upload size".to_string(),
            ),
            MediaError::NotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Media not found".to_string(),
            ),
            MediaError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            // A malformed storage key is the caller's mistake, not ours
            MediaError::Storage(photure_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            MediaError::Storage(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };
        (status, Json(ErrorBody::new(code, message))).into_response()
    }
}

fn multipart_error(err: MultipartError) -> MediaError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        MediaError::TooLarge
    } else {
        MediaError::BadRequest(err.body_text())
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<ServiceHealth> {
    Json(ServiceHealth::ok(
        "media-service",
        format!("Environment: {}", state.environment),
    ))
}

/// POST /media/upload
///
/// Accepts one multipart `file` field, checks the declared type and size,
/// and writes the blob under a fresh storage key. The response is
/// authoritative for everything downstream consumers record.
pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MediaUploadResponse>, MediaError> {
    let mut file = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field.bytes().await.map_err(multipart_error)?;
            file = Some((filename, content_type, data));
            break;
        }
    }

    let (filename, content_type, data) =
        file.ok_or_else(|| MediaError::BadRequest("Missing file field".to_string()))?;

    if !content_type.starts_with("image/") {
        return Err(MediaError::NotAnImage);
    }
    if data.len() > state.max_upload_bytes {
        return Err(MediaError::TooLarge);
    }

    let storage_key = state.store.save(&filename, &data).await?;
    info!(
        storage_key = %storage_key,
        size = data.len(),
        "Stored media"
    );

    Ok(Json(MediaUploadResponse {
        filename: if filename.is_empty() {
            storage_key.clone()
        } else {
            filename
        },
        storage_key,
        content_type,
        size: data.len() as i64,
    }))
}

/// Query parameters for media fetch: display hints only, never stored
#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    pub download_name: Option<String>,
    pub content_type: Option<String>,
}

/// GET /media/:storage_key
pub async fn fetch_media(
    State(state): State<AppState>,
    Path(storage_key): Path<String>,
    Query(query): Query<FetchQuery>,
) -> Result<Response, MediaError> {
    let data = state
        .store
        .read(&storage_key)
        .await?
        .ok_or(MediaError::NotFound)?;

    let content_type = query
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let download_name = query.download_name.unwrap_or_else(|| storage_key.clone());

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    let disposition = format!("inline; filename=\"{}\"", download_name.replace('"', ""));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition).unwrap_or_else(|_| HeaderValue::from_static("inline")),
    );

    Ok((headers, data).into_response())
}

/// DELETE /media/:storage_key
///
/// Deleting an already-absent key is a 404, not a crash; callers
/// compensating a failed upload can safely retry or race this.
pub async fn delete_media(
    State(state): State<AppState>,
    Path(storage_key): Path<String>,
) -> Result<Json<MediaDeleteResponse>, MediaError> {
    if state.store.remove(&storage_key).await? {
        info!(storage_key = %storage_key, "Deleted media");
        Ok(Json(MediaDeleteResponse { deleted: true }))
    } else {
        Err(MediaError::NotFound)
    }
}
