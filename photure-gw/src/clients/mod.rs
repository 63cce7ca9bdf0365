//! Leaf service clients
//!
//! The gateway depends on three collaborators it does not implement: the
//! identity verifier, the media store, and the gallery catalog. Each is a
//! trait here so the orchestrator takes injected client handles and tests
//! substitute fakes per leaf; the HTTP implementations share one
//! `reqwest::Client` built at startup with a uniform per-call timeout.

use async_trait::async_trait;
use bytes::Bytes;
use photure_common::api::types::{
    CreatePhotoRequest, DeletePhotoResult, ErrorBody, MediaUploadResponse, PhotoRecord,
    PhotoRecordPage, VerifyResponse,
};
use thiserror::Error;

pub mod auth_client;
pub mod gallery_client;
pub mod media_client;

pub use auth_client::AuthClient;
pub use gallery_client::GalleryClient;
pub use media_client::MediaClient;

/// A leaf call resolves to a value or one of two failure shapes. The
/// distinction matters: "we could not ask" and "we asked and were told
/// no" surface differently and drive different compensation decisions.
#[derive(Debug, Error)]
pub enum LeafError {
    /// Connection failure or timeout; the leaf never answered
    #[error("service unreachable: {0}")]
    Unreachable(String),

    /// The leaf answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl LeafError {
    /// Whether this is an upstream 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, LeafError::Rejected { status: 404, .. })
    }

    /// Build a `Rejected` from a non-success response, preserving the
    /// upstream status and extracting the message from the shared error
    /// body shape (falling back to raw text for foreign upstreams)
    pub(crate) async fn from_response(response: reqwest::Response) -> LeafError {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(text) => match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => body.message().to_string(),
                Err(_) if !text.is_empty() => text,
                Err(_) => format!("upstream returned status {}", status),
            },
            Err(_) => format!("upstream returned status {}", status),
        };
        LeafError::Rejected { status, message }
    }

    /// Build from a transport-level reqwest error (connect, timeout)
    pub(crate) fn from_request(err: reqwest::Error) -> LeafError {
        LeafError::Unreachable(err.to_string())
    }

    /// A success response whose body does not parse is neither a clean
    /// answer nor silence; surface it as a 502-shaped rejection
    pub(crate) fn invalid_response(service: &str, err: reqwest::Error) -> LeafError {
        LeafError::Rejected {
            status: 502,
            message: format!("Invalid response from {}: {}", service, err),
        }
    }
}

/// Result type for leaf calls
pub type LeafResult<T> = Result<T, LeafError>;

/// Identity verifier contract: turn a bearer credential into a verified
/// identity or a rejection
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify the full `Authorization` header value
    async fn verify(&self, bearer: &str) -> LeafResult<VerifyResponse>;
}

/// Media store contract: binary blobs addressed by opaque storage key
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload bytes; the response is authoritative for key, filename,
    /// content type and size
    async fn upload(
        &self,
        data: Bytes,
        content_type: &str,
        filename: &str,
    ) -> LeafResult<MediaUploadResponse>;

    /// Fetch a blob's bytes, passing display hints through to the store
    async fn fetch(
        &self,
        storage_key: &str,
        download_name: &str,
        content_type: &str,
    ) -> LeafResult<Bytes>;

    /// Delete by key; an already-absent key is a 404 rejection, not a
    /// crash
    async fn delete(&self, storage_key: &str) -> LeafResult<()>;
}

/// Gallery catalog contract: per-owner photo records keyed by id
#[async_trait]
pub trait GalleryCatalog: Send + Sync {
    /// Create a record; the catalog assigns id and upload date
    async fn create(&self, request: &CreatePhotoRequest) -> LeafResult<PhotoRecord>;

    /// One page of the owner's records, newest first, with total count
    async fn list(&self, owner: &str, skip: i64, limit: i64) -> LeafResult<PhotoRecordPage>;

    /// Fetch one record scoped to its owner
    async fn get(&self, photo_id: &str, owner: &str) -> LeafResult<PhotoRecord>;

    /// Delete one record scoped to its owner, returning the storage key
    /// it referenced
    async fn delete(&self, photo_id: &str, owner: &str) -> LeafResult<DeletePhotoResult>;
}
