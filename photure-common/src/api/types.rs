//! Shared API request/response types
//!
//! Types crossing a service boundary live here so both sides of each
//! boundary agree on the wire shape:
//! - photure-gw (API Gateway) consumes all of them
//! - photure-auth (Identity Verifier) produces [`VerifyResponse`]
//! - photure-media (Media Store) produces [`MediaUploadResponse`]
//! - photure-gallery (Gallery Catalog) produces [`PhotoRecord`] and friends

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ========================================
// Health
// ========================================

/// Health check response, served by every Photure service at `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub name: String,
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceHealth {
    /// Healthy response for the named service
    pub fn ok(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            message: Some(message.into()),
        }
    }
}

// ========================================
// Identity Verifier
// ========================================

/// Verified identity returned by `POST /verify`
///
/// `user_id` is opaque to the rest of the system; it scopes and stamps
/// gallery records but is never persisted by the gateway itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

// ========================================
// Media Store
// ========================================

/// Result of a successful media upload
///
/// The store, not the uploading client, is authoritative for every field
/// here once the upload succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaUploadResponse {
    /// Opaque server-assigned blob key, unique and never reused
    pub storage_key: String,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
}

/// Result of a media delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaDeleteResponse {
    pub deleted: bool,
}

// ========================================
// Gallery Catalog
// ========================================

/// Durable photo metadata record, owned by the gallery catalog
///
/// A record's `storage_key` must reference a blob that exists in the media
/// store; the gateway establishes that at creation time and avoids leaving
/// it dangling at deletion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    pub filename: String,
    pub original_name: String,
    pub content_type: String,
    pub size: i64,
    pub user_id: String,
    pub upload_date: DateTime<Utc>,
    pub storage_key: String,
}

/// Request body for `POST /gallery/photos`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePhotoRequest {
    pub storage_key: String,
    pub filename: String,
    pub original_name: String,
    pub content_type: String,
    pub size: i64,
    pub user_id: String,
}

/// One page of an owner's records, newest first, plus the owner's full
/// record count (independent of the page size)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecordPage {
    pub photos: Vec<PhotoRecord>,
    pub total: i64,
}

/// Result of a gallery delete: the storage key the removed record
/// referenced, so the caller can release the blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePhotoResult {
    pub storage_key: String,
    #[serde(default = "default_true")]
    pub deleted: bool,
}

fn default_true() -> bool {
    true
}

// ========================================
// Gateway responses
// ========================================

/// A photo record hydrated with its derived fetch URL
///
/// `url` is computed from `id` on every response and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoResponse {
    #[serde(flatten)]
    pub record: PhotoRecord,
    pub url: String,
}

/// Gateway list response: hydrated page plus owner's total count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoListResponse {
    pub photos: Vec<PhotoResponse>,
    pub total: i64,
}

/// Generic success message body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ========================================
// Error body
// ========================================

/// Error response body shared by every Photure service
///
/// Serialized as `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Machine-readable code plus human-readable message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    /// Create a new error body
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    /// The human-readable message
    pub fn message(&self) -> &str {
        &self.error.message
    }
}

// ========================================
// Tests
// ========================================
