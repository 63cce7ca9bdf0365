//! Cross-service orchestration
//!
//! The four user-facing operations (upload, list, serve, delete) each
//! sequence calls to the identity verifier, media store, and gallery
//! catalog. The two stores share no transaction, so the sequencing rules
//! here are what keep them in agreement:
//!
//! - Upload writes the media store first and the catalog last, so the
//!   only compensation direction is "delete an orphan blob" — safe and
//!   idempotent. The catalog is the source of truth for which blobs are
//!   live, so it must be written last.
//! - Delete removes the catalog record first; a media delete failure
//!   afterwards leaves an orphan blob, never a dangling record, and is
//!   tolerated rather than retried.
//!
//! Leaf calls within one operation are strictly sequential; each later
//! call needs the previous one's result. No call is retried — the
//! compensation reasoning assumes at most one attempt per call.

use crate::clients::{GalleryCatalog, IdentityVerifier, LeafError, MediaStore};
use crate::error::{GatewayError, GatewayResult};
use bytes::Bytes;
use photure_common::api::types::{
    CreatePhotoRequest, MessageResponse, PhotoListResponse, PhotoRecord, PhotoResponse,
    VerifyResponse,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Largest accepted `limit` for list pagination
pub const MAX_PAGE_LIMIT: i64 = 100;

/// A fetched photo ready to stream back to the client
#[derive(Debug)]
pub struct ServedPhoto {
    pub data: Bytes,
    pub content_type: String,
    pub original_name: String,
}

/// The gateway's orchestration core
///
/// Holds one injected client handle per leaf; construction happens once
/// at startup and tests substitute fakes for any subset of leaves.
pub struct Orchestrator {
    verifier: Arc<dyn IdentityVerifier>,
    media: Arc<dyn MediaStore>,
    gallery: Arc<dyn GalleryCatalog>,
    max_upload_bytes: usize,
}

impl Orchestrator {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        media: Arc<dyn MediaStore>,
        gallery: Arc<dyn GalleryCatalog>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            verifier,
            media,
            gallery,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Resolve the inbound credential to a verified identity
    ///
    /// Fails closed on a missing credential without touching any leaf.
    /// An unreachable verifier is service-unavailable, distinct from a
    /// rejection, which propagates the verifier's status and message
    /// verbatim.
    async fn verify_identity(&self, bearer: Option<&str>) -> GatewayResult<VerifyResponse> {
        let bearer = bearer.ok_or_else(|| {
            GatewayError::Authentication("Missing Authorization header".to_string())
        })?;

        self.verifier
            .verify(bearer)
            .await
            .map_err(|e| GatewayError::from_leaf("auth-service", e))
    }

    /// Upload one image: verify, store bytes, create the catalog record
    ///
    /// Either every step succeeds, or the failure leaves no catalog
    /// record behind. A record-creation failure after the blob was
    /// stored triggers a compensating blob delete, dispatched off the
    /// response path.
    pub async fn upload(
        &self,
        bearer: Option<&str>,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> GatewayResult<PhotoResponse> {
        let user = self.verify_identity(bearer).await?;

        // Local preconditions, checked before any store call
        if !content_type.starts_with("image/") {
            return Err(GatewayError::Validation(
                "Only image files are allowed".to_string(),
            ));
        }
        if data.len() > self.max_upload_bytes {
            return Err(GatewayError::PayloadTooLarge(
                "File exceeds max upload size".to_string(),
            ));
        }

        let media = self
            .media
            .upload(data, content_type, filename)
            .await
            .map_err(|e| GatewayError::from_leaf("media-service", e))?;

        // The store is authoritative for key, filename, type, and size
        // from here on; the client-declared name survives only as
        // original_name.
        let request = CreatePhotoRequest {
            storage_key: media.storage_key.clone(),
            original_name: if filename.is_empty() {
                media.filename.clone()
            } else {
                filename.to_string()
            },
            filename: media.filename,
            content_type: media.content_type,
            size: media.size,
            user_id: user.user_id.clone(),
        };

        match self.gallery.create(&request).await {
            Ok(record) => {
                info!(
                    photo_id = %record.id,
                    user_id = %record.user_id,
                    size = record.size,
                    "Photo uploaded"
                );
                Ok(hydrate(record))
            }
            Err(err) => {
                // The blob is stored but no record references it. Roll the
                // blob back so it does not linger as an orphan; the rollback
                // runs off the response path and its own failure is logged,
                // never surfaced. The caller gets the original creation
                // failure either way.
                error!(
                    storage_key = %media.storage_key,
                    error = %err,
                    "Record creation failed after media upload, rolling back blob"
                );
                let media_store = Arc::clone(&self.media);
                let storage_key = media.storage_key;
                tokio::spawn(async move {
                    if let Err(e) = media_store.delete(&storage_key).await {
                        error!(
                            storage_key = %storage_key,
                            error = %e,
                            "Compensating media delete failed; blob orphaned"
                        );
                    }
                });
                Err(GatewayError::from_leaf("gallery-service", err))
            }
        }
    }

    /// List one page of the caller's photos, newest first
    ///
    /// Pagination bounds are rejected before any leaf call, including
    /// the verifier.
    pub async fn list(
        &self,
        bearer: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> GatewayResult<PhotoListResponse> {
        if skip < 0 {
            return Err(GatewayError::Validation(
                "skip must be non-negative".to_string(),
            ));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(GatewayError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }

        let user = self.verify_identity(bearer).await?;

        let page = self
            .gallery
            .list(&user.user_id, skip, limit)
            .await
            .map_err(|e| GatewayError::from_leaf("gallery-service", e))?;

        Ok(PhotoListResponse {
            photos: page.photos.into_iter().map(hydrate).collect(),
            total: page.total,
        })
    }

    /// Fetch one photo's bytes for serving
    ///
    /// Unowned and absent ids are indistinguishable to the caller. Once
    /// the record is confirmed, a media failure is a server-side problem:
    /// the record exists, so "not found" would be a lie.
    pub async fn serve(&self, bearer: Option<&str>, photo_id: &str) -> GatewayResult<ServedPhoto> {
        let user = self.verify_identity(bearer).await?;

        let record = self.get_owned_record(photo_id, &user.user_id).await?;

        let data = self
            .media
            .fetch(
                &record.storage_key,
                &record.original_name,
                &record.content_type,
            )
            .await
            .map_err(|e| match e {
                LeafError::Unreachable(_) => GatewayError::from_leaf("media-service", e),
                LeafError::Rejected { status, message } => {
                    error!(
                        photo_id = %record.id,
                        storage_key = %record.storage_key,
                        status,
                        message = %message,
                        "Live record's media could not be served"
                    );
                    GatewayError::Inconsistent {
                        photo_id: record.id.clone(),
                    }
                }
            })?;

        Ok(ServedPhoto {
            data,
            content_type: record.content_type,
            original_name: record.original_name,
        })
    }

    /// Delete one photo: catalog record first, then the blob
    ///
    /// Once the record is gone the operation has succeeded from the
    /// caller's perspective; a blob-delete failure leaves an orphan,
    /// the lesser inconsistency, and is only logged.
    pub async fn delete(
        &self,
        bearer: Option<&str>,
        photo_id: &str,
    ) -> GatewayResult<MessageResponse> {
        let user = self.verify_identity(bearer).await?;

        let removed = self
            .gallery
            .delete(photo_id, &user.user_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    GatewayError::NotFound("Photo not found".to_string())
                } else {
                    GatewayError::from_leaf("gallery-service", e)
                }
            })?;

        if let Err(e) = self.media.delete(&removed.storage_key).await {
            warn!(
                storage_key = %removed.storage_key,
                error = %e,
                "Failed to delete media after metadata removal; blob orphaned"
            );
        }

        info!(photo_id = %photo_id, user_id = %user.user_id, "Photo deleted");
        Ok(MessageResponse {
            message: "Photo deleted successfully".to_string(),
        })
    }

    async fn get_owned_record(&self, photo_id: &str, owner: &str) -> GatewayResult<PhotoRecord> {
        self.gallery.get(photo_id, owner).await.map_err(|e| {
            if e.is_not_found() {
                GatewayError::NotFound("Photo not found".to_string())
            } else {
                GatewayError::from_leaf("gallery-service", e)
            }
        })
    }
}

/// Derive the response-only fetch URL from the record id
fn hydrate(record: PhotoRecord) -> PhotoResponse {
    let url = format!("/api/serve/{}", record.id);
    PhotoResponse { record, url }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_hydrate_derives_url_from_id() {
        let record = PhotoRecord {
            id: "abc-123".to_string(),
            filename: "x.png".to_string(),
            original_name: "x.png".to_string(),
            content_type: "image/png".to_string(),
            size: 1,
            user_id: "u1".to_string(),
            upload_date: Utc::now(),
            storage_key: "k".to_string(),
        };
        let hydrated = hydrate(record);
        assert_eq!(hydrated.url, "/api/serve/abc-123");
        assert_eq!(hydrated.record.id, "abc-123");
    }
}
