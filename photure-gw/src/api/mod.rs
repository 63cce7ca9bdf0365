//! HTTP handlers for the gateway surface
//!
//! Handlers stay thin: they unpack transport details (headers, multipart
//! fields, query strings) and delegate to the orchestrator, which owns
//! the cross-service sequencing.

use crate::error::{GatewayError, GatewayResult};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use photure_common::api::types::{
    MessageResponse, PhotoListResponse, PhotoResponse, ServiceHealth,
};
use serde::Deserialize;

/// GET /health
pub async fn health() -> Json<ServiceHealth> {
    Json(ServiceHealth::ok("api-gateway", "Ready"))
}

fn bearer_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// POST /api/upload
///
/// Accepts one multipart `file` field. The declared content type and
/// filename ride along to the orchestrator; everything else about the
/// stored blob comes back from the media store.
pub async fn upload_photo(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> GatewayResult<Json<PhotoResponse>> {
    let bearer = bearer_header(&headers);

    let mut file: Option<(String, String, Bytes)> = None;
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
        file.ok_or_else(|| GatewayError::Validation("Missing file field".to_string()))?;

    // Run the sequence on its own task: a client disconnect drops this
    // handler future, but the stores may already hold partial state, and
    // the compensation rule is unconditional on client presence.
    let orchestrator = state.orchestrator.clone();
    let bearer = bearer.map(str::to_string);
    let photo = tokio::spawn(async move {
        orchestrator
            .upload(bearer.as_deref(), &filename, &content_type, data)
            .await
    })
    .await
    .map_err(|e| GatewayError::Internal(format!("Upload task failed: {}", e)))??;

    Ok(Json(photo))
}

fn multipart_error(err: MultipartError) -> GatewayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge("File exceeds max upload size".to_string())
    } else {
        GatewayError::Validation(err.body_text())
    }
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

/// GET /api/photos?skip=&limit=
pub async fn list_photos(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> GatewayResult<Json<PhotoListResponse>> {
    let bearer = bearer_header(&headers);
    let page = state
        .orchestrator
        .list(bearer, query.skip, query.limit)
        .await?;
    Ok(Json(page))
}

/// GET /api/serve/:photo_id
///
/// Streams the photo bytes back with the record's content type and an
/// inline-disposition filename.
pub async fn serve_photo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(photo_id): Path<String>,
) -> GatewayResult<(HeaderMap, Bytes)> {
    let bearer = bearer_header(&headers);
    let served = state.orchestrator.serve(bearer, &photo_id).await?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&served.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    // Strip quotes from the display name rather than attempting full
    // RFC 5987 escaping; the original name is a hint, not an identifier
    let disposition = format!(
        "inline; filename=\"{}\"",
        served.original_name.replace('"', "")
    );
    response_headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition).unwrap_or_else(|_| HeaderValue::from_static("inline")),
    );

    Ok((response_headers, served.data))
}

/// DELETE /api/photos/:photo_id
pub async fn delete_photo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(photo_id): Path<String>,
) -> GatewayResult<Json<MessageResponse>> {
    let bearer = bearer_header(&headers);
    let result = state.orchestrator.delete(bearer, &photo_id).await?;
    Ok(Json(result))
}
